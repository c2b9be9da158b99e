//! Shared utilities and common types for the Storefront server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Validation utilities
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AuthConfig, Environment, JwtConfig, LoggingConfig, SecurityConfig};
pub use errors::{error_codes, ApiResult, ErrorResponse};
pub use types::ApiResponse;
pub use utils::validation;
