//! Password hashing and strength policy implementation

use crate::errors::{DomainError, DomainResult};

/// Bcrypt cost factor for production hashing; intentionally slow
pub const BCRYPT_COST: u32 = 12;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length
const MAX_PASSWORD_LENGTH: usize = 128;

/// Symbols accepted as "special characters" by the strength policy
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Common weak passwords rejected outright (case-insensitive)
const WEAK_PASSWORDS: [&str; 10] = [
    "password",
    "123456",
    "12345678",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
];

/// Result of a password strength assessment
///
/// Every violated rule is reported, not just the first one, so callers can
/// show the complete list to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthAssessment {
    pub valid: bool,
    pub violations: Vec<String>,
}

/// Service enforcing the password policy
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    /// Create a password service with the production cost factor
    pub fn new() -> Self {
        Self { cost: BCRYPT_COST }
    }

    /// Create a password service with a custom cost factor (tests use a low
    /// cost to stay fast)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a plain password with a salted one-way function
    ///
    /// Fails before hashing if the password is empty or shorter than the
    /// minimum length.
    pub fn hash(&self, plain_password: &str) -> DomainResult<String> {
        if plain_password.is_empty() {
            return Err(DomainError::Validation {
                message: "Password cannot be empty".to_string(),
            });
        }
        if plain_password.len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::Validation {
                message: format!(
                    "Password must be at least {} characters long",
                    MIN_PASSWORD_LENGTH
                ),
            });
        }

        bcrypt::hash(plain_password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
    }

    /// Verifies a plain password against a stored hash
    ///
    /// Never errors: empty input on either side, or an undecodable hash,
    /// yields `false`.
    pub fn verify(&self, plain_password: &str, password_hash: &str) -> bool {
        if plain_password.is_empty() || password_hash.is_empty() {
            return false;
        }

        bcrypt::verify(plain_password, password_hash).unwrap_or(false)
    }

    /// Assesses password strength against the full rule set
    pub fn assess_strength(&self, password: &str) -> StrengthAssessment {
        let mut violations = Vec::new();

        if password.is_empty() {
            return StrengthAssessment {
                valid: false,
                violations: vec!["Password is required".to_string()],
            };
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            violations.push(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ));
        }
        if password.len() > MAX_PASSWORD_LENGTH {
            violations.push(format!(
                "Password cannot exceed {} characters",
                MAX_PASSWORD_LENGTH
            ));
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Password must contain at least one number".to_string());
        }
        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            violations.push("Password must contain at least one special character".to_string());
        }

        let lowered = password.to_lowercase();
        if WEAK_PASSWORDS.contains(&lowered.as_str()) {
            violations.push("Password is too common and weak".to_string());
        }

        StrengthAssessment {
            valid: violations.is_empty(),
            violations,
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}
