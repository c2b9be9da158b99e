//! Token entities for JWT-based authentication.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type marker carried by refresh tokens so they can never be accepted in
/// place of an access token (or vice versa)
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims embedded in signed access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Email address of the authenticated user
    pub email: String,

    /// Role tags of the authenticated user
    pub roles: Vec<String>,

    /// Issued at timestamp (Unix seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Creates claims for a new access token expiring `expiry_ms`
    /// milliseconds from now
    pub fn new(user_id: Uuid, email: String, roles: Vec<String>, expiry_ms: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            roles,
            iat: now,
            exp: now + expiry_ms / 1000,
        }
    }

    /// Parses the subject claim as a user ID
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Claims embedded in signed refresh tokens
///
/// Refresh tokens carry only the user ID and a type marker; they are signed
/// with a separate secret from access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Token type marker, always "refresh"
    #[serde(rename = "type")]
    pub token_type: String,

    /// Issued at timestamp (Unix seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl RefreshClaims {
    /// Creates claims for a new refresh token expiring `expiry_ms`
    /// milliseconds from now
    pub fn new(user_id: Uuid, expiry_ms: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            iat: now,
            exp: now + expiry_ms / 1000,
        }
    }

    /// Parses the subject claim as a user ID
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// An access/refresh token pair returned to callers after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Milliseconds until the access token expires
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_round_trip_user_id() {
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(
            user_id,
            "a@x.com".to_string(),
            vec!["USER".to_string()],
            3_600_000,
        );
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn refresh_claims_carry_type_marker() {
        let claims = RefreshClaims::new(Uuid::new_v4(), 604_800_000);
        assert_eq!(claims.token_type, REFRESH_TOKEN_TYPE);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
    }
}
