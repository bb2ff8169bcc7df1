use actix_web::{middleware::from_fn, web, HttpResponse};

use crate::auth::middleware::require_auth;
use crate::handlers::api::{self, require_json_content_type};
use crate::handlers::{auth_handlers, dashboard};

/// Register every route. Shared by `main` and the HTTP tests.
///
/// The catch-all authenticated scope is registered last: once it matches,
/// later services are never consulted.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(actix_files::Files::new("/static", "./static"))
        // Public routes
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/dashboard"))
                .finish()
        }))
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/accounts/redirect", web::get().to(auth_handlers::post_login_redirect))
        .route("/dashboard/guest", web::get().to(dashboard::guest))
        // JSON APIs answer 401/403 themselves
        .service(
            web::scope("/accounts/api")
                .route("/role-check", web::post().to(api::accounts::role_check))
                .service(
                    web::resource("/change-role")
                        .wrap(from_fn(require_json_content_type))
                        .route(web::post().to(api::accounts::change_role)),
                ),
        )
        .service(
            web::scope("/dashboard/api")
                .route("/summary", web::get().to(api::dashboard::summary))
                .route("/trends", web::get().to(api::dashboard::trends))
                .route("/species", web::get().to(api::dashboard::species))
                .route("/regions", web::get().to(api::dashboard::regions)),
        )
        .service(
            web::scope("/api")
                .wrap(from_fn(require_json_content_type))
                .route("/trees", web::post().to(api::trees::create))
                .route("/trees/{id}/updates", web::post().to(api::trees::add_update))
                .route("/monitoring/reports", web::get().to(api::monitoring::recent_reports)),
        )
        // Role-gated views redirect with `next` or answer 403 on their own
        .route("/dashboard", web::get().to(dashboard::index))
        .route("/dashboard/admin", web::get().to(dashboard::admin))
        .route("/dashboard/field", web::get().to(dashboard::field))
        .route("/dashboard/volunteer", web::get().to(dashboard::volunteer))
        .route("/dashboard/partner", web::get().to(dashboard::partner))
        .route("/dashboard/project", web::get().to(dashboard::project))
        .route("/dashboard/community", web::get().to(dashboard::community))
        .route("/dashboard/insights", web::get().to(dashboard::insights))
        // Protected routes
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/dashboard/field/tasks", web::get().to(dashboard::assigned_tasks))
                .route("/logout", web::post().to(auth_handlers::logout)),
        );
}

/// Static 404 page, registered as the app's default service.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../templates/errors/404.html"))
}
