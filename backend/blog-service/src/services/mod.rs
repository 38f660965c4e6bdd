/// Business logic layer for blog-service
///
/// Each service wraps the shared repository handle and applies the
/// resolve (404) → author (403) → validate (400) order of checks:
/// - Post service: post CRUD with the author rule and group resolution
/// - Group service: read-only group access
/// - Comment service: comments scoped to a parent post
/// - Follow service: follow creation rules and search
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;

pub use comments::CommentService;
pub use follows::{search_terms, FollowService};
pub use groups::GroupService;
pub use posts::PostService;
