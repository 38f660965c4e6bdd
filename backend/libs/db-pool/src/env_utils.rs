//! Environment variable parsing utilities
//!
//! Unlike a plain `.parse().ok().unwrap_or(default)` chain, a variable that is
//! set but cannot be parsed is reported as an error instead of silently
//! falling back to the default.

use std::str::FromStr;

/// Read a string variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable with a default fallback
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_or("PORT", 8080)?;
/// ```
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, val)),
        Err(_) => Ok(default),
    }
}

/// Parse an environment variable that must be present
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("Environment variable {} not found", key))?
        .trim()
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn parse_env_or_uses_default_when_unset() {
        std::env::remove_var("DB_POOL_TEST_UNSET");
        let result: u32 = parse_env_or("DB_POOL_TEST_UNSET", 42).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_or_rejects_garbage() {
        std::env::set_var("DB_POOL_TEST_PORT", "eighty");
        let result = parse_env_or::<u16>("DB_POOL_TEST_PORT", 3000);
        assert!(result.is_err());

        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        assert_eq!(parse_env_or::<u16>("DB_POOL_TEST_PORT", 3000), Ok(8080));
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_required_reports_missing() {
        std::env::remove_var("DB_POOL_TEST_REQ");
        assert!(parse_env_required::<u32>("DB_POOL_TEST_REQ").is_err());

        std::env::set_var("DB_POOL_TEST_REQ", "456");
        assert_eq!(parse_env_required::<u32>("DB_POOL_TEST_REQ"), Ok(456));
        std::env::remove_var("DB_POOL_TEST_REQ");
    }
}
