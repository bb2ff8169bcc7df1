use std::sync::Arc;
use std::time::Duration;

use super::cache::{cache_key, SummaryCache};
use super::source::MetricsSource;
use super::types::{DashboardSummary, RegionCount, Scope};
use crate::auth::session::CurrentUser;
use crate::errors::AppError;
use crate::models::role::Role;

/// Regions shown in the "top regions" panel.
pub const TOP_REGIONS: usize = 5;

/// Trees a viewer may see: field officers with a known county are narrowed to
/// it, everyone else gets the global picture.
pub fn scope_for(user: Option<&CurrentUser>) -> Scope {
    match user {
        Some(u) if u.role() == Some(Role::FieldOfficer) => match u.county.as_deref().map(str::trim) {
            Some(county) if !county.is_empty() => Scope::County(county.to_string()),
            _ => Scope::Global,
        },
        _ => Scope::Global,
    }
}

/// `round(alive / total * 100, 2)`, or `0.0` with no trees.
pub fn survival_rate(alive: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = alive as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Busiest regions first, at most `TOP_REGIONS` of them.
pub async fn ranked_regions(
    source: &dyn MetricsSource,
    scope: &Scope,
) -> Result<Vec<RegionCount>, AppError> {
    let mut regions = source.top_regions(scope, TOP_REGIONS as i64).await?;
    regions.sort_by(|a, b| b.count.cmp(&a.count));
    regions.truncate(TOP_REGIONS);
    Ok(regions)
}

/// Compute the summary, propagating the first source error.
pub async fn compute_summary(
    source: &dyn MetricsSource,
    user: Option<&CurrentUser>,
) -> Result<DashboardSummary, AppError> {
    let scope = scope_for(user);

    let totals = source.seedling_totals(&scope).await?;
    let total_sites = source.count_sites().await?;
    let total_beneficiaries = source.count_beneficiaries().await?;
    let monthly_trends = source.monthly_trends(&scope).await?;
    let species_distribution = source.species_distribution(&scope).await?;

    let top_regions = ranked_regions(source, &scope).await?;

    Ok(DashboardSummary {
        total_trees: totals.total,
        alive: totals.alive,
        dead: totals.dead,
        avg_survival_rate: survival_rate(totals.alive, totals.total),
        total_sites,
        total_beneficiaries,
        monthly_trends,
        species_distribution,
        top_regions,
    })
}

/// Fail-open summary: a store that is down or not yet migrated yields the
/// all-zero snapshot instead of an error.
pub async fn dashboard_summary(
    source: &dyn MetricsSource,
    user: Option<&CurrentUser>,
) -> DashboardSummary {
    match compute_summary(source, user).await {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("Dashboard summary unavailable, serving empty snapshot: {e}");
            DashboardSummary::default()
        }
    }
}

/// Cached, fail-open summary for `user` under `{prefix}{user_id|anon}`.
///
/// A hit returns the stored snapshot without touching `source`. The zeroed
/// fallback is returned but not cached, so a recovering store is picked up on
/// the next request.
pub async fn cached_summary(
    cache: &SummaryCache,
    source: &dyn MetricsSource,
    user: Option<&CurrentUser>,
    prefix: &str,
    ttl: Duration,
) -> Arc<DashboardSummary> {
    let key = cache_key(prefix, user.map(|u| u.user_id));
    if let Some(hit) = cache.get(&key) {
        return hit;
    }
    match compute_summary(source, user).await {
        Ok(summary) => {
            let summary = Arc::new(summary);
            cache.set(&key, Arc::clone(&summary), ttl);
            summary
        }
        Err(e) => {
            log::warn!("Dashboard summary unavailable for {key}, serving empty snapshot: {e}");
            Arc::new(DashboardSummary::default())
        }
    }
}
