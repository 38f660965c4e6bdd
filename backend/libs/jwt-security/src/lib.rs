//! JWT issuing and validation for the blog services
//!
//! **Security Features**:
//! - HS256 signing with a shared secret loaded from configuration
//! - Secret strength validation (minimum 32 bytes, entropy and pattern checks)
//! - Expiry, not-before and issued-at checks with bounded clock skew
//! - Token type enforcement (only `access` tokens authenticate requests)

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod secret_validation;

pub use secret_validation::{validate_secret_strength, SecretStrength};

const DEFAULT_VALIDATION_LEEWAY: u64 = 30; // 30 seconds clock skew tolerance
const MAX_IAT_FUTURE_SKEW_SECS: i64 = 300; // 5 minutes max future iat
const ACCESS_TOKEN_TYPE: &str = "access";

/// Upper bound for access token lifetimes (10 years)
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (numeric user ID rendered as a string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Not before timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Token type, always "access" for tokens minted here
    pub token_type: String,
    /// Username at the time of issuing
    pub username: String,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .with_context(|| format!("Invalid user ID in token subject: {}", self.sub))
    }
}

/// HS256 token manager shared by the HTTP middleware and the admin CLI
#[derive(Clone)]
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_token_ttl: Duration,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

impl JwtManager {
    /// Build a manager from a shared secret.
    ///
    /// Weak secrets are rejected unless `allow_weak` is set (development only).
    pub fn new(secret: &str, access_token_ttl_secs: i64, allow_weak: bool) -> Result<Self> {
        match validate_secret_strength(secret)? {
            SecretStrength::Weak if !allow_weak => {
                return Err(anyhow!(
                    "JWT secret is too weak - use at least 32 random bytes"
                ));
            }
            strength => debug!(?strength, "JWT secret strength checked"),
        }

        if !(1..=MAX_ACCESS_TOKEN_TTL_SECS).contains(&access_token_ttl_secs) {
            return Err(anyhow!(
                "Access token TTL must be between 1 and {} seconds",
                MAX_ACCESS_TOKEN_TTL_SECS
            ));
        }
        let access_token_ttl = Duration::try_seconds(access_token_ttl_secs)
            .ok_or_else(|| anyhow!("Access token TTL out of range"))?;

        info!(ttl_secs = access_token_ttl_secs, "JWT manager initialized with HS256");

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
        })
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: i64, username: &str) -> Result<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.access_token_ttl)
            .ok_or_else(|| anyhow!("Token expiry out of range"))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: Some(now.timestamp()),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to encode JWT token")
    }

    /// Validate and decode an access token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = DEFAULT_VALIDATION_LEEWAY;

        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| anyhow!("Token validation failed: {}", e))?;

        validate_claims(&token_data.claims)?;
        Ok(token_data)
    }
}

/// Validate claims beyond what `jsonwebtoken` checks
fn validate_claims(claims: &Claims) -> Result<()> {
    let now = Utc::now().timestamp();
    if claims.iat > now + MAX_IAT_FUTURE_SKEW_SECS {
        return Err(anyhow!(
            "Token issued in future - possible clock skew or tampering"
        ));
    }

    if claims.token_type != ACCESS_TOKEN_TYPE {
        return Err(anyhow!("Invalid token type: {}", claims.token_type));
    }

    claims.user_id()?;
    Ok(())
}
