//! Authentication service module
//!
//! Coordinates credential verification, registration, account lockout and
//! token lifecycle on top of the password and token services.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
