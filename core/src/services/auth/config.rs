//! Configuration for the authentication service

use crate::domain::entities::user::UserRole;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Roles assigned to newly registered accounts
    pub default_roles: Vec<UserRole>,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            default_roles: vec![UserRole::User],
        }
    }
}
