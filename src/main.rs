use std::io;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpServer};

use tawi::auth::rate_limit::LoginThrottle;
use tawi::config::AppConfig;
use tawi::models::dashboard::PgMetrics;
use tawi::state::AppState;
use tawi::{auth, db, routes, warmup};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = db::init_pool(&config.database_url, config.max_connections)
        .await
        .map_err(io::Error::other)?;
    db::run_migrations(&pool).await.map_err(io::Error::other)?;

    // Development superuser, only when a password is supplied
    if let Some(password) = config.admin_password.as_deref() {
        let hash = auth::password::hash_password(password).map_err(|e| io::Error::other(e.to_string()))?;
        db::seed_admin(&pool, &hash).await.map_err(io::Error::other)?;
    }

    // Session encryption key: load from SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let state = AppState::new(Arc::new(PgMetrics::new(pool.clone())), config.dashboard);
    let _warmup = warmup::spawn(state.clone());
    let throttle = LoginThrottle::default();

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(false)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(throttle.clone()))
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
