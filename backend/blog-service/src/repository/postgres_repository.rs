use crate::db::{comment_repo, follow_repo, group_repo, post_repo, user_repo};
use crate::error::Result;
use crate::models::{Comment, Follow, Group, NewGroup, Post, PostData, User};
use crate::repository::{ilike_patterns, BlogRepository};
use sqlx::PgPool;
use tracing::debug;

/// PostgreSQL repository (source of truth)
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BlogRepository for PostgresRepository {
    async fn create_user(&self, username: &str) -> Result<User> {
        let user = user_repo::create_user(&self.pool, username).await?;
        debug!(user_id = user.id, %username, "Created user in PostgreSQL");
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        Ok(user_repo::find_user_by_id(&self.pool, user_id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(user_repo::find_user_by_username(&self.pool, username).await?)
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        Ok(group_repo::create_group(&self.pool, group).await?)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(group_repo::list_groups(&self.pool).await?)
    }

    async fn find_group(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(group_repo::find_group_by_id(&self.pool, group_id).await?)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool).await?)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(post_repo::find_post_by_id(&self.pool, post_id).await?)
    }

    async fn create_post(&self, author_id: i64, data: &PostData) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, author_id, data).await?)
    }

    async fn update_post(&self, post_id: i64, data: &PostData) -> Result<Option<Post>> {
        Ok(post_repo::update_post(&self.pool, post_id, data).await?)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id).await?)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id).await?)
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment(&self.pool, post_id, comment_id).await?)
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        Ok(comment_repo::create_comment(&self.pool, post_id, author_id, text).await?)
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>> {
        Ok(comment_repo::update_comment(&self.pool, post_id, comment_id, text).await?)
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, post_id, comment_id).await?)
    }

    async fn list_follows(&self, user_id: i64, search_terms: &[String]) -> Result<Vec<Follow>> {
        let patterns = ilike_patterns(search_terms);
        Ok(follow_repo::list_follows(&self.pool, user_id, &patterns).await?)
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool> {
        Ok(follow_repo::follow_exists(&self.pool, user_id, following_id).await?)
    }

    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Option<Follow>> {
        Ok(follow_repo::create_follow(&self.pool, user_id, following_id).await?)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
