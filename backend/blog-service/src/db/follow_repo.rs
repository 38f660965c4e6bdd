use crate::models::Follow;
use sqlx::PgPool;

/// Edges where `user_id` is the follower, optionally narrowed by username patterns.
///
/// Every pattern must match the followed user's username (`ILIKE ALL`); an
/// empty slice matches everything.
pub async fn list_follows(
    pool: &PgPool,
    user_id: i64,
    username_patterns: &[String],
) -> Result<Vec<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        SELECT f.id, f.user_id, u.username AS user_username,
               f.following_id, t.username AS following_username
        FROM follows f
        JOIN users u ON u.id = f.user_id
        JOIN users t ON t.id = f.following_id
        WHERE f.user_id = $1
          AND t.username ILIKE ALL($2)
        ORDER BY f.id
        "#,
    )
    .bind(user_id)
    .bind(username_patterns)
    .fetch_all(pool)
    .await
}

pub async fn follow_exists(
    pool: &PgPool,
    user_id: i64,
    following_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
    )
    .bind(user_id)
    .bind(following_id)
    .fetch_one(pool)
    .await
}

/// Insert a follow edge; returns `None` when the edge already exists.
pub async fn create_follow(
    pool: &PgPool,
    user_id: i64,
    following_id: i64,
) -> Result<Option<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        WITH inserted AS (
            INSERT INTO follows (user_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, following_id) DO NOTHING
            RETURNING id, user_id, following_id
        )
        SELECT f.id, f.user_id, u.username AS user_username,
               f.following_id, t.username AS following_username
        FROM inserted f
        JOIN users u ON u.id = f.user_id
        JOIN users t ON t.id = f.following_id
        "#,
    )
    .bind(user_id)
    .bind(following_id)
    .fetch_optional(pool)
    .await
}
