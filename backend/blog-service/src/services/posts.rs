/// Post service - handles post creation, retrieval, updates and deletion
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_author;
use crate::models::{PatchPostRequest, Post, PostData, PostRequest};
use crate::repository::BlogRepository;
use std::sync::Arc;
use validator::Validate;

pub struct PostService {
    repo: Arc<dyn BlogRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.repo.list_posts().await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post", post_id))
    }

    /// Create a post authored by `author_id`
    pub async fn create_post(&self, author_id: i64, req: PostRequest) -> Result<Post> {
        let data = req.into_data()?;
        data.validate()?;
        self.ensure_group_exists(data.group_id).await?;

        let post = self.repo.create_post(author_id, &data).await?;
        tracing::info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    /// Full replacement (PUT)
    pub async fn update_post(&self, caller_id: i64, post_id: i64, req: PostRequest) -> Result<Post> {
        let post = self.get_post(post_id).await?;
        check_author(caller_id, post.author_id, "post")?;
        self.save(post_id, req.into_data()?).await
    }

    /// Partial update (PATCH); absent fields keep their current value
    pub async fn patch_post(
        &self,
        caller_id: i64,
        post_id: i64,
        patch: PatchPostRequest,
    ) -> Result<Post> {
        let post = self.get_post(post_id).await?;
        check_author(caller_id, post.author_id, "post")?;
        let data = patch.apply(&post);
        self.save(post_id, data).await
    }

    pub async fn delete_post(&self, caller_id: i64, post_id: i64) -> Result<()> {
        let post = self.get_post(post_id).await?;
        check_author(caller_id, post.author_id, "post")?;

        if !self.repo.delete_post(post_id).await? {
            return Err(AppError::not_found("Post", post_id));
        }
        tracing::info!(post_id, author_id = caller_id, "post deleted");
        Ok(())
    }

    async fn save(&self, post_id: i64, data: PostData) -> Result<Post> {
        data.validate()?;
        self.ensure_group_exists(data.group_id).await?;

        self.repo
            .update_post(post_id, &data)
            .await?
            .ok_or_else(|| AppError::not_found("Post", post_id))
    }

    async fn ensure_group_exists(&self, group_id: Option<i64>) -> Result<()> {
        let Some(group_id) = group_id else {
            return Ok(());
        };
        match self.repo.find_group(group_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation(format!(
                "group: Invalid pk \"{}\" - object does not exist.",
                group_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewGroup;
    use crate::repository::InMemoryRepository;

    async fn setup() -> (PostService, Arc<dyn BlogRepository>, i64, i64) {
        let repo: Arc<dyn BlogRepository> = Arc::new(InMemoryRepository::new());
        let leo = repo.create_user("leo").await.unwrap();
        let mia = repo.create_user("mia").await.unwrap();
        (PostService::new(repo.clone()), repo, leo.id, mia.id)
    }

    fn text(text: &str) -> PostRequest {
        PostRequest {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unknown_group_is_validation_error() {
        let (service, _, leo, _) = setup().await;
        let mut data = text("hi");
        data.group = Some(404);

        let err = service.create_post(leo, data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_with_existing_group() {
        let (service, repo, leo, _) = setup().await;
        let group = repo
            .create_group(&NewGroup {
                title: "Cats".into(),
                slug: "cats".into(),
                description: String::new(),
            })
            .await
            .unwrap();

        let mut data = text("hi");
        data.group = Some(group.id);
        let post = service.create_post(leo, data).await.unwrap();
        assert_eq!(post.group_id, Some(group.id));
        assert_eq!(post.author_username, "leo");
    }

    #[tokio::test]
    async fn forbidden_is_checked_before_validation() {
        let (service, _, leo, mia) = setup().await;
        let post = service.create_post(leo, text("mine")).await.unwrap();

        let err = service
            .update_post(mia, post.id, text(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn put_without_text_is_rejected_after_author_check() {
        let (service, _, leo, mia) = setup().await;
        let post = service.create_post(leo, text("mine")).await.unwrap();

        let err = service
            .update_post(mia, post.id, PostRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = service
            .update_post(leo, post.id, PostRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_post_is_checked_before_author() {
        let (service, _, _, mia) = setup().await;
        let err = service.delete_post(mia, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn author_can_delete() {
        let (service, _, leo, _) = setup().await;
        let post = service.create_post(leo, text("bye")).await.unwrap();

        service.delete_post(leo, post.id).await.unwrap();
        assert!(matches!(
            service.get_post(post.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
