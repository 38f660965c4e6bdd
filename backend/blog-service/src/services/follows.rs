/// Follow service - follow creation rules and follow search
///
/// Creation checks, in order: the target resolves, it is not the caller,
/// the edge does not exist yet. The store re-enforces the last two, so a
/// concurrent duplicate still surfaces as `AlreadyFollowing`.
use crate::error::{AppError, Result};
use crate::metrics::record_follow_create;
use crate::models::Follow;
use crate::repository::BlogRepository;
use std::sync::Arc;

pub struct FollowService {
    repo: Arc<dyn BlogRepository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Edges created by `user_id`, narrowed by a free-text search
    pub async fn list_follows(&self, user_id: i64, search: Option<&str>) -> Result<Vec<Follow>> {
        let terms = search.map(search_terms).unwrap_or_default();
        self.repo.list_follows(user_id, &terms).await
    }

    /// Make `caller_id` follow the user named `following`
    pub async fn follow(&self, caller_id: i64, following: Option<&str>) -> Result<Follow> {
        let result = self.try_follow(caller_id, following).await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(AppError::InvalidFollowTarget) => "invalid_target",
            Err(AppError::SelfFollow) => "self_follow",
            Err(AppError::AlreadyFollowing) => "already_following",
            Err(_) => "error",
        };
        record_follow_create(outcome);

        match &result {
            Ok(follow) => tracing::info!(
                user_id = caller_id,
                following_id = follow.following_id,
                "follow created"
            ),
            Err(err) => tracing::info!(user_id = caller_id, outcome, error = %err, "follow rejected"),
        }

        result
    }

    async fn try_follow(&self, caller_id: i64, following: Option<&str>) -> Result<Follow> {
        let username = following
            .filter(|name| !name.is_empty())
            .ok_or(AppError::InvalidFollowTarget)?;

        let target = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or(AppError::InvalidFollowTarget)?;

        if target.id == caller_id {
            return Err(AppError::SelfFollow);
        }

        if self.repo.follow_exists(caller_id, target.id).await? {
            return Err(AppError::AlreadyFollowing);
        }

        self.repo
            .create_follow(caller_id, target.id)
            .await?
            .ok_or(AppError::AlreadyFollowing)
    }
}

/// Split a `search` value into terms on whitespace and commas.
pub fn search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
