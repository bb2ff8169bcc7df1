use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::role::Role;
use crate::models::user::{self, NewUser};

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the development superuser `admin` when the users table is empty.
pub async fn seed_admin(pool: &PgPool, password_hash: &str) -> Result<(), sqlx::Error> {
    let existing = user::count(pool).await?;
    if existing > 0 {
        log::info!("Database already has {existing} users, skipping admin seed");
        return Ok(());
    }

    let admin = NewUser {
        username: "admin".to_string(),
        email: "admin@example.org".to_string(),
        password: password_hash.to_string(),
        role: Role::Admin.as_str().to_string(),
        is_superuser: true,
        county: String::new(),
    };
    let id = user::create(pool, &admin).await?;
    log::info!("Seeded superuser 'admin' (id={id})");
    Ok(())
}
