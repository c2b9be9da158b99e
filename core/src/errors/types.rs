//! Error type definitions for authentication, tokens, configuration, and
//! resilience infrastructure.
//!
//! Every variant maps to a stable machine-readable code via the
//! [`ErrorResponse`] conversions so the HTTP layer never has to inspect
//! error internals.

use sf_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

use super::DomainError;

/// Authentication-related errors
///
/// `InvalidCredentials` deliberately carries the same surface message
/// whether the email was unknown or the password was wrong, so callers
/// cannot enumerate accounts.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Account is temporarily locked due to failed login attempts")]
    AccountLocked,

    #[error("User with this email already exists")]
    EmailAlreadyRegistered,

    #[error("Password does not meet strength requirements: {}", violations.join(", "))]
    WeakPassword { violations: Vec<String> },

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User not found or access denied")]
    AccessDenied,
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token is not a {expected} token")]
    InvalidTokenType { expected: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Configuration errors, fatal at service construction
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT access signing secret is not configured")]
    MissingJwtSecret,

    #[error("AES secret key must be exactly {expected} bytes, got {actual}")]
    InvalidAesKeyLength { expected: usize, actual: usize },
}

/// Errors raised by the resilience infrastructure
#[derive(Error, Debug)]
pub enum ResilienceError {
    #[error("Circuit breaker '{name}' is open, rejecting request")]
    CircuitOpen { name: String },

    #[error("All {attempts} attempts failed: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Circuit breaker with name '{name}' already exists")]
    DuplicateBreaker { name: String },

    #[error("Circuit breaker with name '{name}' not found")]
    BreakerNotFound { name: String },

    #[error("Invalid retry configuration: {}", problems.join(", "))]
    InvalidRetryConfig { problems: Vec<String> },
}

/// Convert AuthError to ErrorResponse
impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let error_code = match &err {
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::AccountDeactivated => error_codes::ACCOUNT_DEACTIVATED,
            AuthError::EmailNotVerified => error_codes::EMAIL_NOT_VERIFIED,
            AuthError::AccountLocked => error_codes::ACCOUNT_LOCKED,
            AuthError::EmailAlreadyRegistered => error_codes::EMAIL_ALREADY_REGISTERED,
            AuthError::WeakPassword { .. } => error_codes::WEAK_PASSWORD,
            AuthError::AuthenticationRequired => error_codes::UNAUTHORIZED,
            AuthError::InsufficientPermissions => error_codes::FORBIDDEN,
            AuthError::AccessDenied => error_codes::ACCESS_DENIED,
        };

        let response = ErrorResponse::new(error_code, err.to_string());
        match err {
            AuthError::WeakPassword { violations } => response.add_detail("violations", violations),
            _ => response,
        }
    }
}

/// Convert TokenError to ErrorResponse
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let error_code = match &err {
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidTokenFormat => error_codes::TOKEN_INVALID,
            TokenError::InvalidSignature => error_codes::TOKEN_INVALID,
            TokenError::InvalidTokenType { .. } => error_codes::TOKEN_INVALID,
            TokenError::TokenGenerationFailed => error_codes::TOKEN_GENERATION_FAILED,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert ConfigError to ErrorResponse
impl From<ConfigError> for ErrorResponse {
    fn from(err: ConfigError) -> Self {
        ErrorResponse::new(error_codes::CONFIG_ERROR, err.to_string())
    }
}

/// Convert ResilienceError to ErrorResponse
impl From<ResilienceError> for ErrorResponse {
    fn from(err: ResilienceError) -> Self {
        let error_code = match &err {
            ResilienceError::CircuitOpen { .. } => error_codes::CIRCUIT_OPEN,
            ResilienceError::RetryExhausted { .. } => error_codes::RETRY_EXHAUSTED,
            ResilienceError::DuplicateBreaker { .. } => error_codes::DUPLICATE_BREAKER,
            ResilienceError::BreakerNotFound { .. } => error_codes::BREAKER_NOT_FOUND,
            ResilienceError::InvalidRetryConfig { .. } => error_codes::INVALID_RETRY_CONFIG,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert the umbrella DomainError to ErrorResponse
impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Auth(e) => e.into(),
            DomainError::Token(e) => e.into(),
            DomainError::Config(e) => e.into(),
            DomainError::Resilience(e) => e.into(),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message)
            }
            DomainError::NotFound { resource } => ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("Resource not found: {}", resource),
            ),
            DomainError::Internal { .. } => {
                // Never leak internals across the public boundary
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}
