//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{AccessClaims, RefreshClaims, TokenPair, REFRESH_TOKEN_TYPE};
pub use user::{
    User, UserRole, LOCKOUT_DURATION_MINUTES, MAX_EMAIL_LENGTH, MAX_FAILED_LOGIN_ATTEMPTS,
    MAX_NAME_LENGTH,
};
