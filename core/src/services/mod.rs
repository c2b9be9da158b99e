//! Service layer implementing the authentication and security workflows

pub mod auth;
pub mod encryption;
pub mod password;
pub mod token;

pub use auth::{AuthService, AuthServiceConfig};
pub use encryption::EncryptionService;
pub use password::{PasswordService, StrengthAssessment};
pub use token::{TokenService, TokenServiceConfig};
