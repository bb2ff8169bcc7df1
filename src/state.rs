use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::models::dashboard::{MetricsSource, SummaryCache};

/// Shared per-process state handed to every handler as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<dyn MetricsSource>,
    pub summaries: SummaryCache,
    pub dashboard: DashboardConfig,
}

impl AppState {
    pub fn new(metrics: Arc<dyn MetricsSource>, dashboard: DashboardConfig) -> Self {
        Self {
            metrics,
            summaries: SummaryCache::new(),
            dashboard,
        }
    }
}
