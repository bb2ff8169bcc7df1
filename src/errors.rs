use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Template(askama::Error),
    Hash(String),
    Session(String),
    /// Carries the originally requested path for the login `next` parameter.
    Unauthenticated(String),
    PermissionDenied(String),
    Validation(String),
    Csrf,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Unauthenticated(next) => write!(f, "Authentication required for {next}"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Validation(msg) => write!(f, "Invalid input: {msg}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

/// Build the `/login?next=...` location for an unauthenticated request.
pub fn login_location(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) if !next.is_empty() => format!("/login?{query}"),
        _ => "/login".to_string(),
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(include_str!("../templates/errors/404.html")),
            AppError::Unauthenticated(next) => HttpResponse::SeeOther()
                .insert_header(("Location", login_location(next)))
                .finish(),
            AppError::PermissionDenied(what) => {
                log::info!("Forbidden: {what}");
                HttpResponse::Forbidden()
                    .content_type("text/html; charset=utf-8")
                    .body(include_str!("../templates/errors/403.html"))
            }
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Validation(msg) => HttpResponse::BadRequest().body(msg.clone()),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an Askama template into an HTML response.
pub fn render<T: askama::Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// JSON flavour of [`AppError`] for `/api` and `/dashboard/api` handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = |msg: &str| serde_json::json!({ "status": "error", "error": msg });
        match &self.0 {
            AppError::Unauthenticated(_) | AppError::Session(_) => {
                HttpResponse::Unauthorized().json(body("authentication required"))
            }
            AppError::PermissionDenied(_) => HttpResponse::Forbidden().json(body("forbidden")),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(body(msg)),
            AppError::NotFound => HttpResponse::NotFound().json(body("not found")),
            AppError::Csrf => HttpResponse::Forbidden().json(body("invalid csrf token")),
            other => {
                log::error!("{other}");
                HttpResponse::InternalServerError().json(body("internal server error"))
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError(AppError::Db(e))
    }
}
