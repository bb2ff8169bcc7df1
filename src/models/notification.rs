use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub unread: bool,
    pub created_at: String,
}

/// Newest notifications addressed to a user.
pub async fn find_for_user(pool: &PgPool, user_id: i64, limit: i64) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT id, title, message, unread, created_at::TEXT AS created_at \
         FROM notifications \
         WHERE recipient_id = $1 \
         ORDER BY created_at DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| n.unread).count()
}
