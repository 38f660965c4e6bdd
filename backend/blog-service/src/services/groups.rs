/// Group service - read-only access to groups
use crate::error::{AppError, Result};
use crate::models::Group;
use crate::repository::BlogRepository;
use std::sync::Arc;

pub struct GroupService {
    repo: Arc<dyn BlogRepository>,
}

impl GroupService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.repo.list_groups().await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Group> {
        self.repo
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group", group_id))
    }
}
