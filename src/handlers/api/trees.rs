use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::api_role;
use crate::errors::{ApiError, AppError};
use crate::models::dashboard::invalidate_summaries;
use crate::models::role::Role;
use crate::models::tree::{self, TreeForm, TreeUpdateForm};
use crate::state::AppState;

const TREE_WRITERS: &[Role] = &[Role::Admin, Role::FieldOfficer];

/// Foreign-key and check violations are the caller's fault, not ours.
fn constraint_to_validation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() || db.is_check_violation() || db.is_unique_violation() {
            return ApiError(AppError::Validation(db.message().to_string()));
        }
    }
    ApiError(AppError::Db(e))
}

/// POST /api/trees
pub async fn create(
    session: Session,
    pool: web::Data<PgPool>,
    state: web::Data<AppState>,
    body: web::Json<TreeForm>,
) -> Result<HttpResponse, ApiError> {
    let user = api_role(&session, TREE_WRITERS)?;
    let new_tree = body
        .into_inner()
        .validate()
        .map_err(|errors| ApiError(AppError::Validation(errors.join("; "))))?;

    let id = tree::create(&pool, &new_tree)
        .await
        .map_err(constraint_to_validation)?;
    log::info!("tree created id={id} tree_id={} by={}", new_tree.tree_id, user.username);
    invalidate_summaries(&state.summaries);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": "success",
        "data": { "id": id, "tree_id": new_tree.tree_id },
    })))
}

/// POST /api/trees/{id}/updates
pub async fn add_update(
    session: Session,
    pool: web::Data<PgPool>,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TreeUpdateForm>,
) -> Result<HttpResponse, ApiError> {
    let user = api_role(&session, TREE_WRITERS)?;
    let tree_id = path.into_inner();
    if body.height_cm.is_some_and(|h| h < 0.0) {
        return Err(ApiError(AppError::Validation("height_cm must not be negative".to_string())));
    }

    let update_id = tree::record_update(&pool, tree_id, &body)
        .await
        .map_err(constraint_to_validation)?
        .ok_or(ApiError(AppError::NotFound))?;
    log::info!(
        "tree update recorded tree={tree_id} status={} by={}",
        body.status.as_str(),
        user.username
    );
    invalidate_summaries(&state.summaries);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": "success",
        "data": { "id": update_id, "tree": tree_id, "status": body.status },
    })))
}
