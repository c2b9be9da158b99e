//! Password policy module
//!
//! Handles one-way password hashing, verification, and strength assessment.

mod service;

pub use service::{PasswordService, StrengthAssessment, BCRYPT_COST};
