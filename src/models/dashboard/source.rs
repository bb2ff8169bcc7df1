use async_trait::async_trait;
use sqlx::PgPool;

use super::types::{MonthlyTrend, RegionCount, Scope, SeedlingTotals, SpeciesCount};
use crate::errors::AppError;

/// Read side of the tree/beneficiary store, as consumed by the summary service.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn seedling_totals(&self, scope: &Scope) -> Result<SeedlingTotals, AppError>;

    async fn count_sites(&self) -> Result<i64, AppError>;

    async fn count_beneficiaries(&self) -> Result<i64, AppError>;

    /// Chronological, one row per month that has plantings.
    async fn monthly_trends(&self, scope: &Scope) -> Result<Vec<MonthlyTrend>, AppError>;

    /// Descending by count.
    async fn species_distribution(&self, scope: &Scope) -> Result<Vec<SpeciesCount>, AppError>;

    /// Descending by count, at most `limit` rows.
    async fn top_regions(&self, scope: &Scope, limit: i64) -> Result<Vec<RegionCount>, AppError>;
}

/// Escape `%`, `_` and `\` so a county name matches literally inside ILIKE.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Value bound to `$1` in the scoped queries; NULL disables the address filter.
fn scope_filter(scope: &Scope) -> Option<String> {
    match scope {
        Scope::Global => None,
        Scope::County(county) => Some(like_pattern(county)),
    }
}

const SCOPED_TREES: &str = "\
    FROM trees t \
    JOIN beneficiaries b ON b.id = t.beneficiary_id \
    WHERE ($1::TEXT IS NULL OR b.address ILIKE $1)";

/// PostgreSQL-backed metrics.
#[derive(Clone)]
pub struct PgMetrics {
    pool: PgPool,
}

impl PgMetrics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsSource for PgMetrics {
    async fn seedling_totals(&self, scope: &Scope) -> Result<SeedlingTotals, AppError> {
        let sql = format!(
            "SELECT COALESCE(SUM(t.number_of_seedlings), 0)::BIGINT AS total, \
                    COALESCE(SUM(t.number_of_seedlings) FILTER (WHERE t.status = 'alive'), 0)::BIGINT AS alive, \
                    COALESCE(SUM(t.number_of_seedlings) FILTER (WHERE t.status = 'dead'), 0)::BIGINT AS dead \
             {SCOPED_TREES}"
        );
        let totals = sqlx::query_as::<_, SeedlingTotals>(&sql)
            .bind(scope_filter(scope))
            .fetch_one(&self.pool)
            .await?;
        Ok(totals)
    }

    async fn count_sites(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM planting_sites")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn count_beneficiaries(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM beneficiaries")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn monthly_trends(&self, scope: &Scope) -> Result<Vec<MonthlyTrend>, AppError> {
        let sql = format!(
            "SELECT TO_CHAR(DATE_TRUNC('month', t.planting_date), 'Mon') AS month, \
                    TO_CHAR(DATE_TRUNC('month', t.planting_date), 'YYYY-MM') AS period, \
                    COALESCE(SUM(t.number_of_seedlings), 0)::BIGINT AS count \
             {SCOPED_TREES} \
             GROUP BY DATE_TRUNC('month', t.planting_date) \
             ORDER BY DATE_TRUNC('month', t.planting_date)"
        );
        let rows = sqlx::query_as::<_, MonthlyTrend>(&sql)
            .bind(scope_filter(scope))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn species_distribution(&self, scope: &Scope) -> Result<Vec<SpeciesCount>, AppError> {
        let rows = sqlx::query_as::<_, SpeciesCount>(
            "SELECT COALESCE(s.name, 'Unknown') AS species, \
                    COALESCE(SUM(t.number_of_seedlings), 0)::BIGINT AS count \
             FROM trees t \
             JOIN beneficiaries b ON b.id = t.beneficiary_id \
             LEFT JOIN tree_species s ON s.id = t.species_id \
             WHERE ($1::TEXT IS NULL OR b.address ILIKE $1) \
             GROUP BY s.name \
             ORDER BY count DESC, species",
        )
        .bind(scope_filter(scope))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn top_regions(&self, scope: &Scope, limit: i64) -> Result<Vec<RegionCount>, AppError> {
        let sql = format!(
            "SELECT COALESCE(NULLIF(b.address, ''), 'Unknown') AS region, \
                    COALESCE(SUM(t.number_of_seedlings), 0)::BIGINT AS count \
             {SCOPED_TREES} \
             GROUP BY b.address \
             ORDER BY count DESC, region \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, RegionCount>(&sql)
            .bind(scope_filter(scope))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("Nairobi"), "%Nairobi%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn global_scope_binds_null() {
        assert_eq!(scope_filter(&Scope::Global), None);
        assert_eq!(
            scope_filter(&Scope::County("Kisumu".into())).as_deref(),
            Some("%Kisumu%")
        );
    }
}
