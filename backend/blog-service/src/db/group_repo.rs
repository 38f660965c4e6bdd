use crate::models::{Group, NewGroup};
use sqlx::PgPool;

pub async fn create_group(pool: &PgPool, group: &NewGroup) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (title, slug, description)
        VALUES ($1, $2, $3)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(&group.title)
    .bind(&group.slug)
    .bind(&group.description)
    .fetch_one(pool)
    .await
}

pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_group_by_id(pool: &PgPool, group_id: i64) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(pool)
        .await
}
