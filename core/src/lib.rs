//! # Storefront Core
//!
//! Core business logic and domain layer for the Storefront backend.
//! This crate contains domain entities, the authentication services,
//! repository interfaces, resilience infrastructure, and error types that
//! form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod resilience;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{AccessClaims, RefreshClaims, TokenPair};
pub use domain::entities::user::{User, UserRole};
pub use domain::value_objects::auth_response::{AuthResponse, AuthenticatedUser, UserProfile};
pub use errors::{
    AuthError, ConfigError, DomainError, DomainResult, ResilienceError, TokenError,
};
pub use repositories::{MockUserRepository, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, EncryptionService, PasswordService, StrengthAssessment,
    TokenService, TokenServiceConfig,
};
