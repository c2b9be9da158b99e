//! User entity representing a registered account in the Storefront system.
//!
//! The entity owns the account-security state machine: the failed-attempt
//! counter and the lockout window are only ever mutated through the methods
//! below, and invariants are re-checked after every mutation that can break
//! them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use sf_shared::utils::validation::{validators, Validate, ValidationErrors};

/// Number of consecutive failed logins that locks the account
pub const MAX_FAILED_LOGIN_ATTEMPTS: u32 = 5;

/// Duration of the lockout window in minutes
pub const LOCKOUT_DURATION_MINUTES: i64 = 30;

/// Maximum email length accepted by the entity
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum first/last name length accepted by the entity
pub const MAX_NAME_LENGTH: usize = 50;

/// Role tags assigned to a user; every user carries at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// Regular customer
    User,
    /// Merchant selling through the platform
    Provider,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::User => write!(f, "USER"),
            UserRole::Provider => write!(f, "PROVIDER"),
        }
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, unique across accounts
    pub email: String,

    /// One-way password hash; never compared directly
    pub password_hash: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Role tags; never empty
    pub roles: Vec<UserRole>,

    /// Whether the account is active
    pub active: bool,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Consecutive failed login attempts since the last success
    pub failed_login_attempts: u32,

    /// Lockout expiry; None when the account is not locked
    pub locked_until: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User with default security state
    ///
    /// New accounts start active and verified so they can sign in right
    /// away, with zero failed attempts and no lock. Fails with a
    /// validation error if any invariant does not hold.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
        roles: Vec<UserRole>,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        let user = Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            roles,
            active: true,
            email_verified: true,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        user.validate_invariants()?;
        Ok(user)
    }

    fn validate_invariants(&self) -> DomainResult<()> {
        self.validate().map_err(|errors| {
            let message = errors
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            DomainError::Validation { message }
        })
    }

    // Role management

    /// Checks whether the user carries the given role
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Checks whether the user carries any of the given roles
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    /// Adds a role if not already present
    pub fn add_role(&mut self, role: UserRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
            self.updated_at = Utc::now();
        }
    }

    /// Removes a role; refuses to empty the role set
    pub fn remove_role(&mut self, role: UserRole) -> DomainResult<()> {
        if self.roles.len() == 1 && self.roles[0] == role {
            return Err(DomainError::Validation {
                message: "User must have at least one role".to_string(),
            });
        }
        self.roles.retain(|r| *r != role);
        self.updated_at = Utc::now();
        Ok(())
    }

    // Account management

    /// Activates the account
    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Deactivates the account
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Marks the email address as verified
    pub fn verify_email(&mut self) {
        self.email_verified = true;
        self.updated_at = Utc::now();
    }

    /// Replaces the password hash
    pub fn update_password(&mut self, new_password_hash: impl Into<String>) -> DomainResult<()> {
        self.password_hash = new_password_hash.into();
        self.updated_at = Utc::now();
        self.validate_invariants()
    }

    // Security state machine

    /// Records a successful login: resets the failure counter, clears any
    /// lock, and stamps `last_login_at`. Always legal.
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Records a failed login attempt.
    ///
    /// The lock window is set only by the threshold-crossing failure;
    /// further failures while locked keep incrementing the counter but do
    /// not extend the window.
    pub fn record_failed_login(&mut self) {
        self.failed_login_attempts += 1;
        self.updated_at = Utc::now();

        if self.failed_login_attempts == MAX_FAILED_LOGIN_ATTEMPTS {
            self.locked_until = Some(Utc::now() + Duration::minutes(LOCKOUT_DURATION_MINUTES));
            tracing::warn!(
                user_id = %self.id,
                failed_attempts = self.failed_login_attempts,
                lockout_minutes = LOCKOUT_DURATION_MINUTES,
                "Account locked after repeated failed login attempts"
            );
        }
    }

    /// Checks whether the account is currently locked.
    ///
    /// An expired lock is treated as absent: the check lazily clears the
    /// failure counter and the lock timestamp instead of relying on a
    /// background sweep.
    pub fn is_locked(&mut self) -> bool {
        let Some(locked_until) = self.locked_until else {
            return false;
        };

        if Utc::now() > locked_until {
            self.locked_until = None;
            self.failed_login_attempts = 0;
            self.updated_at = Utc::now();
            return false;
        }

        true
    }

    /// Administrative override: clears the lock and the failure counter
    pub fn unlock(&mut self) {
        self.locked_until = None;
        self.failed_login_attempts = 0;
        self.updated_at = Utc::now();
        tracing::info!(user_id = %self.id, "Account manually unlocked");
    }

    /// True iff the account is active, verified, and not locked
    pub fn can_login(&mut self) -> bool {
        self.active && self.email_verified && !self.is_locked()
    }

    // Utility

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// True until the first successful login
    pub fn is_new_user(&self) -> bool {
        self.last_login_at.is_none()
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::is_valid_email(&self.email) {
            errors.add_error("email", "Invalid email format", "INVALID_FORMAT");
        }
        if self.email.len() > MAX_EMAIL_LENGTH {
            errors.add_error(
                "email",
                format!("Email cannot exceed {} characters", MAX_EMAIL_LENGTH),
                "INVALID_LENGTH",
            );
        }
        if !validators::not_empty(&self.first_name) {
            errors.add_error("first_name", "First name cannot be empty", "REQUIRED");
        }
        if !validators::not_empty(&self.last_name) {
            errors.add_error("last_name", "Last name cannot be empty", "REQUIRED");
        }
        if self.first_name.len() > MAX_NAME_LENGTH || self.last_name.len() > MAX_NAME_LENGTH {
            errors.add_error(
                "name",
                format!("Names cannot exceed {} characters", MAX_NAME_LENGTH),
                "INVALID_LENGTH",
            );
        }
        if self.password_hash.is_empty() {
            errors.add_error("password_hash", "Password hash cannot be empty", "REQUIRED");
        }
        if self.roles.is_empty() {
            errors.add_error("roles", "User must have at least one role", "REQUIRED");
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}
