use crate::models::Comment;
use sqlx::PgPool;

/// Get all comments for a post, oldest first
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.text, c.created, c.author_id,
               u.username AS author_username, c.post_id
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Get a single comment, only if it belongs to `post_id`
pub async fn get_comment(
    pool: &PgPool,
    post_id: i64,
    comment_id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.text, c.created, c.author_id,
               u.username AS author_username, c.post_id
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1 AND c.post_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, text, created, author_id, post_id
        )
        SELECT c.id, c.text, c.created, c.author_id,
               u.username AS author_username, c.post_id
        FROM inserted c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await
}

/// Update comment text
pub async fn update_comment(
    pool: &PgPool,
    post_id: i64,
    comment_id: i64,
    text: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        WITH updated AS (
            UPDATE comments
            SET text = $3
            WHERE id = $1 AND post_id = $2
            RETURNING id, text, created, author_id, post_id
        )
        SELECT c.id, c.text, c.created, c.author_id,
               u.username AS author_username, c.post_id
        FROM updated c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .bind(text)
    .fetch_optional(pool)
    .await
}

pub async fn delete_comment(
    pool: &PgPool,
    post_id: i64,
    comment_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2")
        .bind(comment_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
