use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::access::{require_login, safe_next};
use crate::auth::session::{current_user, establish, CurrentUser};
use crate::auth::{csrf, password, rate_limit::LoginThrottle};
use crate::errors::{render, AppError};
use crate::models::role::landing_path;
use crate::models::user;
use crate::templates_structs::{LoginTemplate, APP_NAME};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

fn login_form(session: &Session, error: Option<&str>, next: &str) -> Result<HttpResponse, AppError> {
    render(LoginTemplate {
        error: error.map(String::from),
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(session),
        next: next.to_string(),
    })
}

/// Where a freshly authenticated user goes: a safe local `next` wins,
/// otherwise the role/superuser/group landing page.
pub fn post_login_target(user: &CurrentUser, next: Option<&str>) -> String {
    if let Some(next) = safe_next(next) {
        log::info!("login redirect user={} target={next} reason=next", user.username);
        return next.to_string();
    }
    let target = landing_path(user.role(), user.is_superuser, &user.groups);
    log::info!(
        "login redirect user={} role={} superuser={} groups={:?} target={target}",
        user.username,
        user.role,
        user.is_superuser,
        user.groups
    );
    target.to_string()
}

pub async fn login_page(
    session: Session,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, AppError> {
    let next = safe_next(query.next.as_deref()).unwrap_or_default();
    // Already logged in: skip the form
    if let Some(user) = current_user(&session) {
        let target = post_login_target(&user, Some(next));
        return Ok(see_other(&target));
    }
    login_form(&session, None, next)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let next = safe_next(Some(form.next.as_str())).unwrap_or_default();

    // Throttle check before any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if throttle.is_blocked(ip) {
        log::warn!("login throttled ip={ip}");
        return login_form(
            &session,
            Some("Too many failed login attempts. Please try again later."),
            next,
        );
    }

    let found = user::find_by_login(&pool, form.username.trim()).await?;
    let Some(account) = found else {
        throttle.record_failure(ip);
        return login_form(&session, Some("Invalid username or password"), next);
    };
    if !password::verify_password(&form.password, &account.password)? {
        throttle.record_failure(ip);
        log::info!("login failed user={}", account.username);
        return login_form(&session, Some("Invalid username or password"), next);
    }

    throttle.clear(ip);
    let groups = user::find_group_names(&pool, account.id).await?;
    let current = account.into_current(groups);
    establish(&session, &current)?;

    let target = post_login_target(&current, Some(next));
    Ok(see_other(&target))
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(see_other("/login"))
}

/// GET /accounts/redirect: send the current user to their landing page.
pub async fn post_login_redirect(
    req: HttpRequest,
    session: Session,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, AppError> {
    let user = require_login(&session, &req)?;
    let target = post_login_target(&user, query.next.as_deref());
    Ok(see_other(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, superuser: bool, groups: &[&str]) -> CurrentUser {
        CurrentUser {
            user_id: 1,
            username: "wanjiru".to_string(),
            role: role.to_string(),
            is_superuser: superuser,
            groups: groups.iter().map(|g| g.to_string()).collect(),
            county: None,
        }
    }

    #[test]
    fn safe_next_beats_role_landing() {
        let u = user("volunteer", false, &[]);
        assert_eq!(post_login_target(&u, Some("/dashboard/field/tasks")), "/dashboard/field/tasks");
        assert_eq!(post_login_target(&u, Some("https://evil.example")), "/dashboard/volunteer");
    }

    #[test]
    fn falls_back_through_superuser_and_groups() {
        assert_eq!(post_login_target(&user("", true, &[]), None), "/dashboard/admin");
        assert_eq!(
            post_login_target(&user("", false, &["Volunteers", "Partners"]), None),
            "/dashboard/partner"
        );
        assert_eq!(post_login_target(&user("", false, &[]), None), "/dashboard");
    }
}
