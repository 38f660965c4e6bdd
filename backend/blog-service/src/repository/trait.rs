use crate::error::Result;
use crate::models::{Comment, Follow, Group, NewGroup, Post, PostData, User};

/// Storage seam shared by the services.
///
/// `PostgresRepository` is the production implementation; `InMemoryRepository`
/// backs local runs without a database and the HTTP tests.
#[async_trait::async_trait]
pub trait BlogRepository: Send + Sync {
    /// Create a user; duplicate usernames are a `Conflict`
    async fn create_user(&self, username: &str) -> Result<User>;

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>>;

    /// Exact, case-sensitive username lookup
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Create a group; duplicate slugs are a `Conflict`
    async fn create_group(&self, group: &NewGroup) -> Result<Group>;

    /// All groups ordered by id
    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn find_group(&self, group_id: i64) -> Result<Option<Group>>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>>;

    async fn create_post(&self, author_id: i64, data: &PostData) -> Result<Post>;

    /// Replace writable fields; `None` if the post does not exist
    async fn update_post(&self, post_id: i64, data: &PostData) -> Result<Option<Post>>;

    /// Delete a post and its comments; false if it did not exist
    async fn delete_post(&self, post_id: i64) -> Result<bool>;

    /// Comments of one post, oldest first
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// A comment, only when it belongs to `post_id`
    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>>;

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment>;

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>>;

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool>;

    /// Edges followed by `user_id` whose target username contains every term
    /// (case-insensitive), ordered by edge id
    async fn list_follows(&self, user_id: i64, search_terms: &[String]) -> Result<Vec<Follow>>;

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool>;

    /// Atomically insert an edge; `None` when it already exists
    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Option<Follow>>;

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name for logs and readiness output
    fn backend_name(&self) -> &'static str;
}
