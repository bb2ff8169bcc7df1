use serde::Serialize;

/// Seedlings planted in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MonthlyTrend {
    /// Short month name, e.g. `Mar`.
    pub month: String,
    /// `YYYY-MM`, the bucket the rows were truncated to.
    pub period: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SpeciesCount {
    pub species: String,
    pub count: i64,
}

/// Seedlings grouped by the beneficiary's free-text address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RegionCount {
    pub region: String,
    pub count: i64,
}

/// Seedling sums over the scoped trees. `alive + dead <= total`;
/// replanted seedlings only count towards `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct SeedlingTotals {
    pub total: i64,
    pub alive: i64,
    pub dead: i64,
}

/// Point-in-time planting and survival metrics shown on every dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_trees: i64,
    pub alive: i64,
    pub dead: i64,
    pub avg_survival_rate: f64,
    pub total_sites: i64,
    pub total_beneficiaries: i64,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub species_distribution: Vec<SpeciesCount>,
    pub top_regions: Vec<RegionCount>,
}

/// Which trees a summary covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    /// Beneficiary address contains this text, case-insensitively.
    County(String),
}
