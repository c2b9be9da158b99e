//! Authentication and security configuration

use serde::{Deserialize, Serialize};

/// Required byte length for the AES-256 at-rest encryption key
pub const AES_KEY_LENGTH: usize = 32;

/// JWT authentication configuration
///
/// Access and refresh tokens are signed with separate secrets so the two
/// token kinds can be invalidated independently and a leaked secret only
/// compromises one of them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing access tokens
    pub access_secret: String,

    /// Secret key for signing refresh tokens
    pub refresh_secret: String,

    /// Access token expiry time in milliseconds
    pub access_token_expiry_ms: i64,

    /// Refresh token expiry time in milliseconds
    pub refresh_token_expiry_ms: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_token_expiry_ms: 3_600_000,      // 1 hour
            refresh_token_expiry_ms: 604_800_000,   // 7 days
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in milliseconds
    pub fn with_access_expiry_ms(mut self, ms: i64) -> Self {
        self.access_token_expiry_ms = ms;
        self
    }

    /// Set refresh token expiry in milliseconds
    pub fn with_refresh_expiry_ms(mut self, ms: i64) -> Self {
        self.refresh_token_expiry_ms = ms;
        self
    }

    /// Whether the access signing secret is present
    pub fn has_access_secret(&self) -> bool {
        !self.access_secret.is_empty()
    }
}

/// At-rest encryption configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Symmetric key for auxiliary at-rest encryption (must be exactly 32 bytes)
    pub aes_secret_key: String,
}

impl SecurityConfig {
    /// Check if the configured key has the required length
    pub fn has_valid_key_length(&self) -> bool {
        self.aes_secret_key.len() == AES_KEY_LENGTH
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            aes_secret_key: String::new(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// At-rest encryption configuration
    #[serde(default)]
    pub security: SecurityConfig,
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// Missing secrets stay empty here; the token service refuses to start
    /// without an access secret, so there is no insecure fallback value.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("JWT_SECRET").unwrap_or_default();
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET").unwrap_or_default();
        let access_token_expiry_ms = std::env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "3600000".to_string())
            .parse()
            .unwrap_or(3_600_000);
        let refresh_token_expiry_ms = std::env::var("JWT_REFRESH_EXPIRATION")
            .unwrap_or_else(|_| "604800000".to_string())
            .parse()
            .unwrap_or(604_800_000);
        let aes_secret_key = std::env::var("AES_SECRET_KEY").unwrap_or_default();

        Self {
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_token_expiry_ms,
                refresh_token_expiry_ms,
            },
            security: SecurityConfig { aes_secret_key },
        }
    }
}
