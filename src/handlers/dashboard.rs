use std::sync::Arc;
use std::time::Duration;

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Local, Timelike};
use sqlx::PgPool;

use crate::auth::access::{require_login, require_role};
use crate::auth::session::{current_user, CurrentUser};
use crate::errors::{render, AppError};
use crate::models::dashboard::cache::{
    BACKGROUND_KEY, GUEST_VIEW_PREFIX, INSIGHTS_VIEW_PREFIX, SUMMARY_VIEW_PREFIX,
};
use crate::models::dashboard::{cached_summary, scope_for, DashboardSummary, Scope};
use crate::models::monitoring::{self, MonitoringReport};
use crate::models::notification::{self, Notification};
use crate::models::role::Role;
use crate::models::task::{self, Task};
use crate::models::user;
use crate::state::AppState;
use crate::templates_structs::{
    AdminDashboardTemplate, FieldDashboardTemplate, GuestDashboardTemplate, InsightsTemplate,
    MemberDashboardTemplate, OverviewTemplate, PageContext, SummaryDashboardTemplate,
    TaskListTemplate, APP_NAME,
};

const ADMIN_VIEW: &[Role] = &[Role::Admin];
const FIELD_VIEW: &[Role] = &[Role::FieldOfficer, Role::Admin];
const VOLUNTEER_VIEW: &[Role] = &[Role::Volunteer, Role::Admin];
const PARTNER_VIEW: &[Role] = &[Role::Partner, Role::Admin];
const PROJECT_VIEW: &[Role] = &[Role::ProjectManager, Role::Admin];
const COMMUNITY_VIEW: &[Role] = &[Role::Community, Role::Admin];
const INSIGHTS_VIEW: &[Role] = &[Role::Admin, Role::ProjectManager];

const TASK_PREVIEW: i64 = 10;
const NOTIFICATION_PREVIEW: i64 = 5;
const REPORT_PREVIEW: i64 = 5;

fn time_greeting(username: &str) -> String {
    let period = match Local::now().hour() {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{period}, {username}")
}

async fn summary_for(
    state: &AppState,
    user: Option<&CurrentUser>,
    prefix: &str,
    ttl: Duration,
) -> Arc<DashboardSummary> {
    cached_summary(&state.summaries, state.metrics.as_ref(), user, prefix, ttl).await
}

// Collaborator lists are decoration: a failing query renders an empty panel.

async fn tasks_for(pool: &PgPool, user_id: i64, limit: i64) -> Vec<Task> {
    task::find_for_user(pool, user_id, limit)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Tasks unavailable for user {user_id}: {e}");
            Vec::new()
        })
}

async fn notifications_for(pool: &PgPool, user_id: i64) -> Vec<Notification> {
    notification::find_for_user(pool, user_id, NOTIFICATION_PREVIEW)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Notifications unavailable for user {user_id}: {e}");
            Vec::new()
        })
}

async fn recent_reports(pool: &PgPool) -> Vec<MonitoringReport> {
    monitoring::find_recent(pool, REPORT_PREVIEW)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Monitoring reports unavailable: {e}");
            Vec::new()
        })
}

/// GET /dashboard: landing page for any signed-in user.
pub async fn index(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = require_login(&session, &req)?;
    let summary = summary_for(&state, Some(&user), SUMMARY_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    render(OverviewTemplate {
        greeting: time_greeting(&user.username),
        ctx: PageContext::build(&session, &user, "/dashboard"),
        summary,
    })
}

pub async fn admin(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, &req, ADMIN_VIEW)?;
    let summary = summary_for(&state, Some(&user), SUMMARY_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    render(AdminDashboardTemplate {
        greeting: time_greeting(&user.username),
        ctx: PageContext::build(&session, &user, "/dashboard/admin"),
        summary,
    })
}

pub async fn field(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, &req, FIELD_VIEW)?;
    let summary = summary_for(&state, Some(&user), SUMMARY_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    let scope_label = match scope_for(Some(&user)) {
        Scope::County(county) => Some(county),
        Scope::Global => None,
    };
    let tasks = tasks_for(&pool, user.user_id, TASK_PREVIEW).await;
    let notifications = notifications_for(&pool, user.user_id).await;
    let recent_reports = recent_reports(&pool).await;

    render(FieldDashboardTemplate {
        ctx: PageContext::build(&session, &user, "/dashboard/field"),
        summary,
        scope_label,
        tasks,
        unread_count: notification::unread_count(&notifications),
        notifications,
        recent_reports,
    })
}

/// GET /dashboard/field/tasks: everything assigned to the current user.
pub async fn assigned_tasks(
    req: HttpRequest,
    session: Session,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = require_login(&session, &req)?;
    let tasks = tasks_for(&pool, user.user_id, 200).await;
    render(TaskListTemplate {
        ctx: PageContext::build(&session, &user, "/dashboard/field/tasks"),
        tasks,
    })
}

async fn member_dashboard(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    pool: web::Data<PgPool>,
    allowed: &[Role],
    heading: &str,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, &req, allowed)?;
    let summary = summary_for(&state, Some(&user), SUMMARY_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    let tasks = tasks_for(&pool, user.user_id, TASK_PREVIEW).await;
    let notifications = notifications_for(&pool, user.user_id).await;
    render(MemberDashboardTemplate {
        ctx: PageContext::build(&session, &user, req.path()),
        heading: heading.to_string(),
        summary,
        tasks,
        unread_count: notification::unread_count(&notifications),
        notifications,
    })
}

pub async fn volunteer(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    member_dashboard(req, session, state, pool, VOLUNTEER_VIEW, "Volunteer dashboard").await
}

pub async fn partner(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    member_dashboard(req, session, state, pool, PARTNER_VIEW, "Partner dashboard").await
}

async fn summary_dashboard(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    allowed: &[Role],
    heading: &str,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, &req, allowed)?;
    let summary = summary_for(&state, Some(&user), SUMMARY_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    render(SummaryDashboardTemplate {
        ctx: PageContext::build(&session, &user, req.path()),
        heading: heading.to_string(),
        summary,
    })
}

pub async fn project(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    summary_dashboard(req, session, state, PROJECT_VIEW, "Project dashboard").await
}

pub async fn community(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    summary_dashboard(req, session, state, COMMUNITY_VIEW, "Community dashboard").await
}

pub async fn insights(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, &req, INSIGHTS_VIEW)?;
    let summary = summary_for(&state, Some(&user), INSIGHTS_VIEW_PREFIX, state.dashboard.summary_ttl).await;
    render(InsightsTemplate {
        ctx: PageContext::build(&session, &user, "/dashboard/insights"),
        summary,
    })
}

/// GET /dashboard/guest: public counts; anonymous visitors get the
/// background snapshot when one is warm.
pub async fn guest(
    session: Session,
    state: web::Data<AppState>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let viewer = current_user(&session);
    let warm = match viewer {
        None => state.summaries.get(BACKGROUND_KEY),
        Some(_) => None,
    };
    let summary = match warm {
        Some(summary) => summary,
        None => summary_for(&state, viewer.as_ref(), GUEST_VIEW_PREFIX, state.dashboard.guest_ttl).await,
    };
    let total_users = user::count(&pool).await.unwrap_or_else(|e| {
        log::warn!("User count unavailable: {e}");
        0
    });
    render(GuestDashboardTemplate {
        app_name: APP_NAME.to_string(),
        signed_in: viewer.is_some(),
        total_users,
        summary,
    })
}
