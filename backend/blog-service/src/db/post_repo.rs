use crate::models::{Post, PostData};
use sqlx::PgPool;

/// List all posts, newest first
pub async fn list_posts(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.text, p.pub_date, p.image, p.author_id,
               u.username AS author_username, p.group_id
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.pub_date DESC, p.id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.text, p.pub_date, p.image, p.author_id,
               u.username AS author_username, p.group_id
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Create a new post owned by `author_id`
pub async fn create_post(
    pool: &PgPool,
    author_id: i64,
    data: &PostData,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (text, image, author_id, group_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, pub_date, image, author_id, group_id
        )
        SELECT p.id, p.text, p.pub_date, p.image, p.author_id,
               u.username AS author_username, p.group_id
        FROM inserted p
        JOIN users u ON u.id = p.author_id
        "#,
    )
    .bind(&data.text)
    .bind(&data.image)
    .bind(author_id)
    .bind(data.group_id)
    .fetch_one(pool)
    .await
}

/// Replace the writable fields of a post; `None` when the post is gone
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    data: &PostData,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        WITH updated AS (
            UPDATE posts
            SET text = $2, image = $3, group_id = $4
            WHERE id = $1
            RETURNING id, text, pub_date, image, author_id, group_id
        )
        SELECT p.id, p.text, p.pub_date, p.image, p.author_id,
               u.username AS author_username, p.group_id
        FROM updated p
        JOIN users u ON u.id = p.author_id
        "#,
    )
    .bind(post_id)
    .bind(&data.text)
    .bind(&data.image)
    .bind(data.group_id)
    .fetch_optional(pool)
    .await
}

/// Delete a post (comments cascade)
pub async fn delete_post(pool: &PgPool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
