/// Database access layer
///
/// Plain sqlx query functions per table. Queries that return posts, comments
/// or follows join `users` so rows carry the referenced usernames.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
