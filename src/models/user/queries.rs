use sqlx::PgPool;

use super::types::{NewUser, User};

const SELECT_USER: &str = "\
    SELECT u.id, u.username, u.email, u.password, u.role, u.is_superuser, \
           COALESCE(p.county, '') AS county \
    FROM users u \
    LEFT JOIN profiles p ON p.user_id = u.id";

/// Case-insensitive lookup by username.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("{SELECT_USER} WHERE LOWER(u.username) = LOWER($1)");
    sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Username first, then e-mail, both case-insensitive.
pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    if let Some(user) = find_by_username(pool, login).await? {
        return Ok(Some(user));
    }
    let sql = format!(
        "{SELECT_USER} WHERE u.email <> '' AND LOWER(u.email) = LOWER($1) ORDER BY u.id LIMIT 1"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(login)
        .fetch_optional(pool)
        .await
}

/// Names of the groups a user belongs to, alphabetical.
pub async fn find_group_names(pool: &PgPool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT g.name FROM groups g \
         JOIN user_groups ug ON ug.group_id = g.id \
         WHERE ug.user_id = $1 \
         ORDER BY g.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Insert a user and its profile in one transaction. Returns the new id.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (username, email, password, role, is_superuser) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password)
    .bind(&new.role)
    .bind(new.is_superuser)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query("INSERT INTO profiles (user_id, county) VALUES ($1, $2)")
        .bind(id)
        .bind(&new.county)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(id)
}

/// Set the stored role. Returns false when no such user exists.
pub async fn update_role(pool: &PgPool, user_id: i64, role: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(role)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
