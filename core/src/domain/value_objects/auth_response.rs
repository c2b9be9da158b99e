//! Authentication value objects returned to HTTP-layer collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserRole};

/// User profile exposed through API responses; excludes the password hash
/// and internal security counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub roles: Vec<UserRole>,
    pub active: bool,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_new_user: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            roles: user.roles.clone(),
            active: user.active,
            email_verified: user.email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            is_new_user: user.is_new_user(),
        }
    }
}

/// Response returned after successful login, registration, or token refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Authenticated user profile
    pub user: UserProfile,

    /// Freshly issued token pair
    pub tokens: TokenPair,
}

impl AuthResponse {
    /// Creates a new authentication response
    pub fn new(user: &User, tokens: TokenPair) -> Self {
        Self {
            user: UserProfile::from(user),
            tokens,
        }
    }
}

/// Identity resolved from a bearer token by the authentication hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<UserRole>,
}

impl AuthenticatedUser {
    /// Checks whether the identity carries any of the given roles
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_excludes_sensitive_fields() {
        let user = User::new(
            "jane@example.com",
            "Jane",
            "Doe",
            "secret-hash",
            vec![UserRole::User],
        )
        .unwrap();

        let profile = UserProfile::from(&user);
        assert_eq!(profile.full_name, "Jane Doe");
        assert!(profile.is_new_user);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("failed_login_attempts"));
    }

    #[test]
    fn authenticated_user_role_check() {
        let identity = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            roles: vec![UserRole::Provider],
        };
        assert!(identity.has_any_role(&[UserRole::Provider, UserRole::Admin]));
        assert!(!identity.has_any_role(&[UserRole::Admin]));
    }
}
