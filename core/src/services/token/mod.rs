//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access token issuance and verification (HMAC-SHA-512)
//! - Refresh token issuance and verification with a separate secret
//! - Token pair generation for login, registration, and refresh flows

mod config;
mod service;

pub use config::TokenServiceConfig;
pub use service::TokenService;
