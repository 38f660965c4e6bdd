mod memory_repository;
mod postgres_repository;
mod r#trait;

pub use memory_repository::InMemoryRepository;
pub use postgres_repository::PostgresRepository;
pub use r#trait::BlogRepository;

/// Turn free-text search terms into `ILIKE` substring patterns.
///
/// `%`, `_` and `\` inside a term are escaped so they match literally.
pub fn ilike_patterns(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
        .collect()
}
