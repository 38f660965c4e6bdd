/// Author-or-read-only rule for posts and comments
///
/// Reads are open; updates and deletes are limited to the author of the
/// object. Callers resolve the object (404) before applying this check (403).
use crate::error::AppError;

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Check that the caller wrote the object they are about to modify
pub fn check_author(caller_id: i64, author_id: i64, what: &str) -> PermissionResult {
    if caller_id == author_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Changing another user's {} is forbidden!",
            what
        )))
    }
}
