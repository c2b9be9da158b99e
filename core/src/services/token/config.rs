//! Configuration for the token service

use sf_shared::config::JwtConfig;

/// Configuration for the token service
///
/// Access and refresh tokens use separate signing secrets. Only the access
/// secret is contractually required at construction; see
/// [`TokenService::new`](super::TokenService::new).
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// Access token expiry in milliseconds
    pub access_token_expiry_ms: i64,
    /// Refresh token expiry in milliseconds
    pub refresh_token_expiry_ms: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_token_expiry_ms: 3_600_000,      // 1 hour
            refresh_token_expiry_ms: 604_800_000,   // 7 days
        }
    }
}

impl From<JwtConfig> for TokenServiceConfig {
    fn from(config: JwtConfig) -> Self {
        Self {
            access_secret: config.access_secret,
            refresh_secret: config.refresh_secret,
            access_token_expiry_ms: config.access_token_expiry_ms,
            refresh_token_expiry_ms: config.refresh_token_expiry_ms,
        }
    }
}
