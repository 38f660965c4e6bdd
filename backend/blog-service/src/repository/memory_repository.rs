use crate::error::{AppError, Result};
use crate::models::{Comment, Follow, Group, NewGroup, Post, PostData, User};
use crate::repository::BlogRepository;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct PostRow {
    id: i64,
    text: String,
    pub_date: DateTime<Utc>,
    image: Option<String>,
    author_id: i64,
    group_id: Option<i64>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: i64,
    text: String,
    created: DateTime<Utc>,
    author_id: i64,
    post_id: i64,
}

#[derive(Debug, Clone, Copy)]
struct FollowRow {
    id: i64,
    user_id: i64,
    following_id: i64,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    follows: BTreeMap<i64, FollowRow>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, user_id: i64) -> Result<String> {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| AppError::Internal(format!("user {} does not exist", user_id)))
    }

    fn ensure_group(&self, group_id: Option<i64>) -> Result<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => {
                Err(AppError::Internal(format!("group {} does not exist", id)))
            }
            _ => Ok(()),
        }
    }

    fn post(&self, row: &PostRow) -> Result<Post> {
        Ok(Post {
            id: row.id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            image: row.image.clone(),
            author_id: row.author_id,
            author_username: self.username(row.author_id)?,
            group_id: row.group_id,
        })
    }

    fn comment(&self, row: &CommentRow) -> Result<Comment> {
        Ok(Comment {
            id: row.id,
            text: row.text.clone(),
            created: row.created,
            author_id: row.author_id,
            author_username: self.username(row.author_id)?,
            post_id: row.post_id,
        })
    }

    fn follow(&self, row: &FollowRow) -> Result<Follow> {
        Ok(Follow {
            id: row.id,
            user_id: row.user_id,
            user_username: self.username(row.user_id)?,
            following_id: row.following_id,
            following_username: self.username(row.following_id)?,
        })
    }
}

/// Process-local repository.
///
/// All tables live behind one `RwLock`, so check-then-insert sequences such
/// as follow creation are atomic. Ids come from a single shared sequence.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlogRepository for InMemoryRepository {
    async fn create_user(&self, username: &str) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "user with username {} already exists",
                username
            )));
        }

        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict(format!(
                "group with slug {} already exists",
                group.slug
            )));
        }

        let created = Group {
            id: tables.next_id(),
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        };
        tables.groups.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.tables.read().await.groups.values().cloned().collect())
    }

    async fn find_group(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(self.tables.read().await.groups.get(&group_id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&PostRow> = tables.posts.values().collect();
        rows.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        rows.into_iter().map(|row| tables.post(row)).collect()
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        let tables = self.tables.read().await;
        tables.posts.get(&post_id).map(|row| tables.post(row)).transpose()
    }

    async fn create_post(&self, author_id: i64, data: &PostData) -> Result<Post> {
        let mut tables = self.tables.write().await;
        tables.username(author_id)?;
        tables.ensure_group(data.group_id)?;

        let row = PostRow {
            id: tables.next_id(),
            text: data.text.clone(),
            pub_date: Utc::now(),
            image: data.image.clone(),
            author_id,
            group_id: data.group_id,
        };
        tables.posts.insert(row.id, row.clone());
        tables.post(&row)
    }

    async fn update_post(&self, post_id: i64, data: &PostData) -> Result<Option<Post>> {
        let mut tables = self.tables.write().await;
        tables.ensure_group(data.group_id)?;

        let Some(row) = tables.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        row.text = data.text.clone();
        row.image = data.image.clone();
        row.group_id = data.group_id;

        let row = row.clone();
        tables.post(&row).map(Some)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != post_id);
        Ok(true)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&CommentRow> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        rows.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        rows.into_iter().map(|row| tables.comment(row)).collect()
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .map(|row| tables.comment(row))
            .transpose()
    }

    async fn create_comment(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        tables.username(author_id)?;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::Internal(format!("post {} does not exist", post_id)));
        }

        let row = CommentRow {
            id: tables.next_id(),
            text: text.to_string(),
            created: Utc::now(),
            author_id,
            post_id,
        };
        tables.comments.insert(row.id, row.clone());
        tables.comment(&row)
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .comments
            .get_mut(&comment_id)
            .filter(|c| c.post_id == post_id)
        else {
            return Ok(None);
        };
        row.text = text.to_string();

        let row = row.clone();
        tables.comment(&row).map(Some)
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.comments.get(&comment_id) {
            Some(c) if c.post_id == post_id => {
                tables.comments.remove(&comment_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_follows(&self, user_id: i64, search_terms: &[String]) -> Result<Vec<Follow>> {
        let tables = self.tables.read().await;
        let terms: Vec<String> = search_terms.iter().map(|t| t.to_lowercase()).collect();

        let mut follows = Vec::new();
        for row in tables.follows.values().filter(|f| f.user_id == user_id) {
            let follow = tables.follow(row)?;
            let target = follow.following_username.to_lowercase();
            if terms.iter().all(|term| target.contains(term.as_str())) {
                follows.push(follow);
            }
        }
        Ok(follows)
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }

    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Option<Follow>> {
        if user_id == following_id {
            return Err(AppError::SelfFollow);
        }

        let mut tables = self.tables.write().await;
        tables.username(user_id)?;
        tables.username(following_id)?;

        if tables
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.following_id == following_id)
        {
            return Ok(None);
        }

        let row = FollowRow {
            id: tables.next_id(),
            user_id,
            following_id,
        };
        tables.follows.insert(row.id, row);
        tables.follow(&row).map(Some)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
