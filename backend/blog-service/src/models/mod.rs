/// Data models for blog-service
///
/// Row types (`User`, `Group`, `Post`, `Comment`, `Follow`) mirror the database
/// schema; post/comment/follow rows carry the usernames they reference so the
/// wire representations can be built without extra lookups.
///
/// Request and response types describe the JSON payloads of the API.
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// ============================================================================
// Rows
// ============================================================================

/// Identity principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Community group that posts can be filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub post_id: i64,
}

/// Directed follow edge: `user` follows `following`
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub user_username: String,
    pub following_id: i64,
    pub following_username: String,
}

// ============================================================================
// Write models
// ============================================================================

/// Full set of writable post fields, after PUT/PATCH merging
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PostData {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<i64>,
}

/// Writable comment fields
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CommentData {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

/// Group fields supplied by the admin CLI
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewGroup {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50), custom(function = "validate_slug"))]
    pub slug: String,
    pub description: String,
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        let mut err = ValidationError::new("slug");
        err.message = Some("Enter a valid slug of letters, numbers, underscores or hyphens.".into());
        return Err(err);
    }
    Ok(())
}

fn required(field: &str) -> AppError {
    AppError::Validation(format!("{}: This field is required.", field))
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /posts/` and `PUT /posts/{id}/`
///
/// `text` is optional at the parsing stage so that a missing field is reported
/// as a validation error after the permission checks.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PostRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub group: Option<i64>,
}

impl PostRequest {
    pub fn into_data(self) -> Result<PostData, AppError> {
        Ok(PostData {
            text: self.text.ok_or_else(|| required("text"))?,
            image: self.image,
            group_id: self.group,
        })
    }
}

/// Body of `PATCH /posts/{id}/`; absent fields keep their value, `null` clears
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchPostRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub group: Option<Option<i64>>,
}

impl PatchPostRequest {
    /// Overlay the patch on an existing post
    pub fn apply(self, post: &Post) -> PostData {
        PostData {
            text: self.text.unwrap_or_else(|| post.text.clone()),
            image: self.image.unwrap_or_else(|| post.image.clone()),
            group_id: self.group.unwrap_or(post.group_id),
        }
    }
}

/// Body of comment create/PUT
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub text: Option<String>,
}

impl CommentRequest {
    pub fn into_data(self) -> Result<CommentData, AppError> {
        Ok(CommentData {
            text: self.text.ok_or_else(|| required("text"))?,
        })
    }
}

/// Body of comment PATCH
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchCommentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `POST /follow/`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FollowRequest {
    /// Username of the user to follow
    #[serde(default)]
    pub following: Option<String>,
}

/// Query string of `GET /follow/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowSearchParams {
    pub search: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    /// Username of the author
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    /// Group id, if the post is filed under a group
    pub group: Option<i64>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        PostResponse {
            id: post.id,
            author: post.author_username,
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            group: post.group_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    /// Username of the author
    pub author: String,
    /// Parent post id
    pub post: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentResponse {
            id: comment.id,
            author: comment.author_username,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    /// Follower username
    pub user: String,
    /// Followed username
    pub following: String,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        FollowResponse {
            user: follow.user_username,
            following: follow.following_username,
        }
    }
}
