/// Configuration management for Blog Service
///
/// Configuration is read from environment variables (after `dotenvy` has
/// loaded any `.env` file). Production deployments must provide explicit CORS
/// origins and a strong JWT secret.
use db_pool::{env_or, parse_env_or, DbConfig};
use jwt_security::{validate_secret_strength, SecretStrength, MAX_ACCESS_TOKEN_TTL_SECS};
use std::fmt;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "development-only-jwt-secret-do-not-use-in-production";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Storage backend selection
    pub storage: StorageBackend,
    /// Usernames created at startup by the memory backend
    pub seed_users: Vec<String>,
    /// Database pool configuration (used by the postgres backend)
    pub database: DbConfig,
    /// Token settings
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        is_production(&self.env)
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    /// Accept weak secrets (never in production)
    pub allow_weak_secret: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("allow_weak_secret", &self.allow_weak_secret)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = env_or("APP_ENV", "development");
        let production = is_production(&app_env);

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: env_or("BLOG_SERVICE_HOST", "0.0.0.0"),
                port: parse_env_or("BLOG_SERVICE_PORT", 8080)?,
                workers: parse_env_or("BLOG_SERVICE_WORKERS", 4)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            storage: env_or("STORAGE_BACKEND", "postgres").parse()?,
            seed_users: env_or("MEMORY_SEED_USERS", "")
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            database: DbConfig::from_env("blog-service")?,
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(secret) if !secret.trim().is_empty() => secret,
                    _ if production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => DEV_JWT_SECRET.to_string(),
                };

                if production {
                    let strength =
                        validate_secret_strength(&jwt_secret).map_err(|e| e.to_string())?;
                    if strength == SecretStrength::Weak {
                        return Err("JWT_SECRET is too weak for production".to_string());
                    }
                }

                let access_token_ttl_secs: i64 = parse_env_or("JWT_ACCESS_TOKEN_TTL_SECS", 86_400)?;
                if !(1..=MAX_ACCESS_TOKEN_TTL_SECS).contains(&access_token_ttl_secs) {
                    return Err(format!(
                        "JWT_ACCESS_TOKEN_TTL_SECS must be between 1 and {}",
                        MAX_ACCESS_TOKEN_TTL_SECS
                    ));
                }

                AuthConfig {
                    jwt_secret,
                    access_token_ttl_secs,
                    allow_weak_secret: !production,
                }
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn is_production(env: &str) -> bool {
    env.eq_ignore_ascii_case("production") || env.eq_ignore_ascii_case("prod")
}
