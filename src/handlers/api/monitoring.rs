use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use super::{api_user, success};
use crate::errors::ApiError;
use crate::models::monitoring::{self, MonitoringReportView};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub limit: Option<i64>,
}

/// GET /api/monitoring/reports?limit=N (default 20, at most 100)
pub async fn recent_reports(
    session: Session,
    pool: web::Data<PgPool>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    api_user(&session)?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let reports: Vec<MonitoringReportView> = monitoring::find_recent(&pool, limit)
        .await?
        .into_iter()
        .map(MonitoringReportView::from)
        .collect();
    Ok(success(reports))
}
