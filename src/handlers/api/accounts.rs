use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::api_user;
use crate::errors::{ApiError, AppError};
use crate::models::role::Role;
use crate::models::user::{self, ChangeRoleRequest, RoleCheckRequest, RoleCheckResponse};

/// POST /accounts/api/role-check
///
/// Public. Accepts a JSON or form body; anything unparseable is treated as an
/// empty request and answers "does not exist".
pub async fn role_check(
    pool: web::Data<PgPool>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request: RoleCheckRequest = serde_json::from_slice(&body)
        .or_else(|_| serde_urlencoded::from_bytes(&body))
        .unwrap_or_default();
    let username = request.username.as_deref().map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Ok(HttpResponse::Ok().json(RoleCheckResponse::missing()));
    }

    let answer = match user::find_by_login(&pool, username).await? {
        Some(found) => RoleCheckResponse::for_user(&found.role, request.role.as_deref()),
        None => RoleCheckResponse::missing(),
    };
    Ok(HttpResponse::Ok().json(answer))
}

/// POST /accounts/api/change-role: superusers only.
pub async fn change_role(
    session: Session,
    pool: web::Data<PgPool>,
    body: web::Json<ChangeRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = api_user(&session)?;
    if !actor.is_superuser {
        return Err(ApiError(AppError::PermissionDenied(actor.username)));
    }

    let (Some(username), Some(requested)) = (body.username.as_deref(), body.role.as_deref()) else {
        return Err(ApiError(AppError::Validation("username and role required".to_string())));
    };
    let role = Role::ALL
        .into_iter()
        .find(|r| r.as_str() == requested.trim())
        .ok_or_else(|| ApiError(AppError::Validation(format!("invalid role: {requested}"))))?;

    let target = user::find_by_username(&pool, username.trim())
        .await?
        .ok_or(ApiError(AppError::NotFound))?;
    user::update_role(&pool, target.id, role.as_str()).await?;
    log::info!(
        "role changed user={} from={} to={} by={}",
        target.username,
        target.role,
        role.as_str(),
        actor.username
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "username": target.username,
        "role": role.as_str(),
    })))
}
