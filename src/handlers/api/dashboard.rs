use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::{api_user, success};
use crate::errors::{ApiError, AppError};
use crate::models::dashboard::cache::SUMMARY_API_PREFIX;
use crate::models::dashboard::{cached_summary, ranked_regions, scope_for, MetricsSource};
use crate::state::AppState;

/// GET /dashboard/api/summary
pub async fn summary(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = api_user(&session)?;
    let summary = cached_summary(
        &state.summaries,
        state.metrics.as_ref(),
        Some(&user),
        SUMMARY_API_PREFIX,
        state.dashboard.summary_ttl,
    )
    .await;
    Ok(success(summary.as_ref()))
}

// The breakdown endpoints run one query each and read straight through; only
// the summary is cached. A failing store yields an empty list.

fn or_empty<T>(what: &str, rows: Result<Vec<T>, AppError>) -> Vec<T> {
    rows.unwrap_or_else(|e| {
        log::warn!("Dashboard {what} unavailable, serving empty list: {e}");
        Vec::new()
    })
}

/// GET /dashboard/api/trends
pub async fn trends(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = api_user(&session)?;
    let scope = scope_for(Some(&user));
    let rows = state.metrics.monthly_trends(&scope).await;
    Ok(success(or_empty("trends", rows)))
}

/// GET /dashboard/api/species
pub async fn species(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = api_user(&session)?;
    let scope = scope_for(Some(&user));
    let rows = state.metrics.species_distribution(&scope).await;
    Ok(success(or_empty("species", rows)))
}

/// GET /dashboard/api/regions
pub async fn regions(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = api_user(&session)?;
    let scope = scope_for(Some(&user));
    let rows = ranked_regions(state.metrics.as_ref(), &scope).await;
    Ok(success(or_empty("regions", rows)))
}
