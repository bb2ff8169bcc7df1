use serde::Serialize;
use sqlx::PgPool;

/// Survival snapshot for a site and/or tree.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonitoringReport {
    pub id: i64,
    pub site_name: Option<String>,
    pub tree_code: Option<String>,
    pub date: String,
    pub total_planted: i32,
    pub surviving: i32,
    pub health_status: String,
}

impl MonitoringReport {
    /// `round(surviving / total_planted * 100, 2)`; `None` when nothing was planted.
    pub fn survival_rate(&self) -> Option<f64> {
        if self.total_planted <= 0 {
            return None;
        }
        let pct = self.surviving as f64 / self.total_planted as f64 * 100.0;
        Some((pct * 100.0).round() / 100.0)
    }

    /// Site name, tree code, or a generic label.
    pub fn subject(&self) -> &str {
        self.site_name
            .as_deref()
            .or(self.tree_code.as_deref())
            .unwrap_or("Report")
    }

    /// Survival rate formatted for templates, `n/a` when undefined.
    pub fn survival_label(&self) -> String {
        match self.survival_rate() {
            Some(rate) => format!("{rate:.2}%"),
            None => "n/a".to_string(),
        }
    }
}

/// JSON shape served by `GET /api/monitoring/reports`.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringReportView {
    pub id: i64,
    pub subject: String,
    pub date: String,
    pub total_planted: i32,
    pub surviving: i32,
    pub survival_rate: Option<f64>,
    pub health_status: String,
}

impl From<MonitoringReport> for MonitoringReportView {
    fn from(r: MonitoringReport) -> Self {
        MonitoringReportView {
            survival_rate: r.survival_rate(),
            subject: r.subject().to_string(),
            id: r.id,
            date: r.date,
            total_planted: r.total_planted,
            surviving: r.surviving,
            health_status: r.health_status,
        }
    }
}

/// Most recent reports first.
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<MonitoringReport>, sqlx::Error> {
    sqlx::query_as::<_, MonitoringReport>(
        "SELECT m.id, s.name AS site_name, t.tree_id AS tree_code, m.date::TEXT AS date, \
                m.total_planted, m.surviving, m.health_status \
         FROM monitoring_reports m \
         LEFT JOIN planting_sites s ON s.id = m.site_id \
         LEFT JOIN trees t ON t.id = m.tree_id \
         ORDER BY m.date DESC, m.created_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
