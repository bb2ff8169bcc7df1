use std::sync::Arc;

use askama::Template;

use super::PageContext;
use crate::models::dashboard::DashboardSummary;
use crate::models::monitoring::MonitoringReport;
use crate::models::notification::Notification;
use crate::models::task::Task;

#[derive(Template)]
#[template(path = "dashboard/index.html")]
pub struct OverviewTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub summary: Arc<DashboardSummary>,
}

#[derive(Template)]
#[template(path = "dashboard/admin.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub summary: Arc<DashboardSummary>,
}

#[derive(Template)]
#[template(path = "dashboard/field.html")]
pub struct FieldDashboardTemplate {
    pub ctx: PageContext,
    pub summary: Arc<DashboardSummary>,
    /// Label of the county the numbers are scoped to, if any.
    pub scope_label: Option<String>,
    pub tasks: Vec<Task>,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub recent_reports: Vec<MonitoringReport>,
}

/// Volunteer and partner dashboards: summary plus the user's work items.
#[derive(Template)]
#[template(path = "dashboard/member.html")]
pub struct MemberDashboardTemplate {
    pub ctx: PageContext,
    pub heading: String,
    pub summary: Arc<DashboardSummary>,
    pub tasks: Vec<Task>,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Project manager and community dashboards.
#[derive(Template)]
#[template(path = "dashboard/summary.html")]
pub struct SummaryDashboardTemplate {
    pub ctx: PageContext,
    pub heading: String,
    pub summary: Arc<DashboardSummary>,
}

#[derive(Template)]
#[template(path = "dashboard/insights.html")]
pub struct InsightsTemplate {
    pub ctx: PageContext,
    pub summary: Arc<DashboardSummary>,
}

/// Public page; rendered without the authenticated layout.
#[derive(Template)]
#[template(path = "dashboard/guest.html")]
pub struct GuestDashboardTemplate {
    pub app_name: String,
    pub signed_in: bool,
    pub total_users: i64,
    pub summary: Arc<DashboardSummary>,
}

#[derive(Template)]
#[template(path = "dashboard/tasks.html")]
pub struct TaskListTemplate {
    pub ctx: PageContext,
    pub tasks: Vec<Task>,
}
