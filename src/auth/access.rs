//! Role gate for dashboard views.
//!
//! A flat check evaluated per request:
//!
//! ```text
//! no session            -> redirect to /login?next=<path>
//! superuser             -> allow
//! role in allow-list    -> allow   (aliases resolved via models::role)
//! group in allow-list   -> allow   (legacy "Admins", "Field Officers", ...)
//! otherwise             -> 403
//! ```

use actix_session::Session;
use actix_web::HttpRequest;

use crate::auth::session::{current_user, CurrentUser};
use crate::errors::AppError;
use crate::models::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Login,
    Forbid,
}

/// Evaluate the gate without touching the request.
pub fn decide(user: Option<&CurrentUser>, allowed: &[Role]) -> Decision {
    let Some(user) = user else {
        return Decision::Login;
    };
    if user.is_superuser {
        return Decision::Allow;
    }
    if user.role().is_some_and(|r| allowed.contains(&r)) {
        return Decision::Allow;
    }
    let via_group = user
        .groups
        .iter()
        .filter_map(|g| Role::from_group(g))
        .any(|r| allowed.contains(&r));
    if via_group {
        Decision::Allow
    } else {
        Decision::Forbid
    }
}

/// Path plus query string, used as the login `next` target.
pub fn requested_path(req: &HttpRequest) -> String {
    match req.uri().path_and_query() {
        Some(pq) => pq.as_str().to_string(),
        None => req.path().to_string(),
    }
}

/// Handler guard: returns the current user or the error that renders the
/// login redirect / forbidden page.
pub fn require_role(
    session: &Session,
    req: &HttpRequest,
    allowed: &[Role],
) -> Result<CurrentUser, AppError> {
    let user = current_user(session);
    match decide(user.as_ref(), allowed) {
        Decision::Allow => user.ok_or_else(|| AppError::Unauthenticated(requested_path(req))),
        Decision::Login => Err(AppError::Unauthenticated(requested_path(req))),
        Decision::Forbid => {
            let who = user.map(|u| u.username).unwrap_or_default();
            Err(AppError::PermissionDenied(format!("{who} -> {}", req.path())))
        }
    }
}

/// Handler guard for views open to any logged-in user.
pub fn require_login(session: &Session, req: &HttpRequest) -> Result<CurrentUser, AppError> {
    current_user(session).ok_or_else(|| AppError::Unauthenticated(requested_path(req)))
}

/// Only accept local absolute paths as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
