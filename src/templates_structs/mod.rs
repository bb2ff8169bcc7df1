// Template context structures for Askama templates, organized by page family.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::CurrentUser;

pub const APP_NAME: &str = "Tawi";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.role_label`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub role_label: String,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, user: &CurrentUser, current_path: &str) -> Self {
        let avatar_initial = user
            .username
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string();
        Self {
            username: user.username.clone(),
            avatar_initial,
            role_label: user.role_label().to_string(),
            app_name: APP_NAME.to_string(),
            csrf_token: csrf::get_or_create_token(session),
            current_path: current_path.to_string(),
        }
    }
}

mod common;
mod dashboard;

pub use self::common::LoginTemplate;
pub use self::dashboard::{
    AdminDashboardTemplate, FieldDashboardTemplate, GuestDashboardTemplate, InsightsTemplate,
    MemberDashboardTemplate, OverviewTemplate, SummaryDashboardTemplate, TaskListTemplate,
};
