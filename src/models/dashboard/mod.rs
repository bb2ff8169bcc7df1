//! Dashboard metrics: aggregation over trees and beneficiaries, and the
//! short-lived snapshot cache in front of it.

pub mod cache;
pub mod service;
pub mod source;
pub mod types;

pub use cache::{cache_key, invalidate_summaries, SummaryCache, TtlCache};
pub use service::{
    cached_summary, compute_summary, dashboard_summary, ranked_regions, scope_for, survival_rate,
};
pub use source::{MetricsSource, PgMetrics};
pub use types::{DashboardSummary, MonthlyTrend, RegionCount, Scope, SeedlingTotals, SpeciesCount};
