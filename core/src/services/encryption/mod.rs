//! Encryption service module for sensitive data at rest

mod service;

pub use service::EncryptionService;
