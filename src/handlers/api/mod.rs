//! JSON endpoints under `/dashboard/api`, `/accounts/api` and `/api`.

pub mod accounts;
pub mod dashboard;
pub mod monitoring;
pub mod trees;

use actix_session::Session;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpResponse,
};
use serde::Serialize;

use crate::auth::access::{decide, Decision};
use crate::auth::session::{current_user, CurrentUser};
use crate::errors::{ApiError, AppError};
use crate::models::role::Role;

/// `{"status": "success", "data": ...}`
pub fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "success", "data": data }))
}

/// Signed-in user or a 401.
pub fn api_user(session: &Session) -> Result<CurrentUser, ApiError> {
    current_user(session).ok_or_else(|| ApiError(AppError::Unauthenticated(String::new())))
}

/// Same gate as the HTML views, answered with 401/403 JSON.
pub fn api_role(session: &Session, allowed: &[Role]) -> Result<CurrentUser, ApiError> {
    let user = current_user(session);
    match (decide(user.as_ref(), allowed), user) {
        (Decision::Allow, Some(user)) => Ok(user),
        (Decision::Forbid, Some(user)) => Err(ApiError(AppError::PermissionDenied(user.username))),
        _ => Err(ApiError(AppError::Unauthenticated(String::new()))),
    }
}

/// Mutations must be sent as JSON. A browser cannot post cross-origin JSON
/// with cookies through a plain form, so this stands in for a CSRF token.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "status": "error",
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
