use sqlx::PgPool;

/// Field assignment shown on role dashboards.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub status: String,
    pub deadline: Option<String>,
}

/// Tasks assigned to a user, latest deadline first.
pub async fn find_for_user(pool: &PgPool, user_id: i64, limit: i64) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT id, name, description, location, status, deadline::TEXT AS deadline \
         FROM tasks \
         WHERE assigned_to = $1 \
         ORDER BY deadline DESC NULLS LAST, created_at DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
