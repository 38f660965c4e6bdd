/// Comment service - comments scoped to a parent post
///
/// Every operation resolves the parent post first, so a missing post is a 404
/// even for collection reads.
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_author;
use crate::models::{Comment, CommentData, CommentRequest, PatchCommentRequest};
use crate::repository::BlogRepository;
use std::sync::Arc;
use validator::Validate;

pub struct CommentService {
    repo: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Comments of a post, oldest first
    pub async fn get_post_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.ensure_post(post_id).await?;
        self.repo.list_comments(post_id).await
    }

    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.ensure_post(post_id).await?;
        self.find(post_id, comment_id).await
    }

    pub async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        req: CommentRequest,
    ) -> Result<Comment> {
        self.ensure_post(post_id).await?;
        let data = req.into_data()?;
        data.validate()?;

        let comment = self.repo.create_comment(post_id, author_id, &data.text).await?;
        tracing::info!(comment_id = comment.id, post_id, author_id, "comment created");
        Ok(comment)
    }

    /// Replace the comment text (PUT)
    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        caller_id: i64,
        req: CommentRequest,
    ) -> Result<Comment> {
        self.modify(post_id, comment_id, caller_id, |_| req.into_data())
            .await
    }

    /// Partial update (PATCH); an absent `text` keeps the current one
    pub async fn patch_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        caller_id: i64,
        patch: PatchCommentRequest,
    ) -> Result<Comment> {
        self.modify(post_id, comment_id, caller_id, |current| {
            Ok(CommentData {
                text: patch.text.unwrap_or_else(|| current.text.clone()),
            })
        })
        .await
    }

    pub async fn delete_comment(&self, post_id: i64, comment_id: i64, caller_id: i64) -> Result<()> {
        self.ensure_post(post_id).await?;
        let comment = self.find(post_id, comment_id).await?;
        check_author(caller_id, comment.author_id, "comment")?;

        if !self.repo.delete_comment(post_id, comment_id).await? {
            return Err(AppError::not_found("Comment", comment_id));
        }
        tracing::info!(comment_id, post_id, author_id = caller_id, "comment deleted");
        Ok(())
    }

    async fn modify<F>(
        &self,
        post_id: i64,
        comment_id: i64,
        caller_id: i64,
        build: F,
    ) -> Result<Comment>
    where
        F: FnOnce(&Comment) -> Result<CommentData>,
    {
        self.ensure_post(post_id).await?;
        let comment = self.find(post_id, comment_id).await?;
        check_author(caller_id, comment.author_id, "comment")?;

        let data = build(&comment)?;
        data.validate()?;

        self.repo
            .update_comment(post_id, comment_id, &data.text)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", comment_id))
    }

    async fn ensure_post(&self, post_id: i64) -> Result<()> {
        match self.repo.find_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Post", post_id)),
        }
    }

    async fn find(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.repo
            .find_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", comment_id))
    }
}
