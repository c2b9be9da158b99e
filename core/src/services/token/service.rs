//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims, TokenPair, REFRESH_TOKEN_TYPE};
use crate::domain::entities::user::User;
use crate::errors::{ConfigError, DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service issuing and verifying signed token pairs
///
/// Stateless apart from its keys: verification is pure and safe to run from
/// any number of concurrent tasks. Tokens are signed with HMAC-SHA-512; the
/// refresh secret is distinct from the access secret so one token kind can
/// never be verified as the other.
pub struct TokenService {
    config: TokenServiceConfig,
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service
    ///
    /// Fails with `ConfigError::MissingJwtSecret` when the access signing
    /// secret is absent. An absent refresh secret is tolerated here; refresh
    /// verification then fails closed for any token minted elsewhere.
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.access_secret.is_empty() {
            return Err(DomainError::Config(ConfigError::MissingJwtSecret));
        }

        let access_encoding_key = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding_key = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding_key = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding_key = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            config,
            access_encoding_key,
            access_decoding_key,
            refresh_encoding_key,
            refresh_decoding_key,
            validation,
        })
    }

    /// Issues a fresh access/refresh token pair for a user
    pub fn issue_token_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        let roles = user.roles.iter().map(|r| r.to_string()).collect();
        let access_claims = AccessClaims::new(
            user.id,
            user.email.clone(),
            roles,
            self.config.access_token_expiry_ms,
        );
        let refresh_claims = RefreshClaims::new(user.id, self.config.refresh_token_expiry_ms);

        let header = Header::new(Algorithm::HS512);
        let access_token = encode(&header, &access_claims, &self.access_encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;
        let refresh_token = encode(&header, &refresh_claims, &self.refresh_encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_ms,
        ))
    }

    /// Verifies an access token and returns the decoded claims
    ///
    /// Fails for empty, malformed, mis-signed, or expired tokens, including
    /// tokens signed with the refresh secret.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, DomainError> {
        if token.is_empty() {
            return Err(DomainError::Token(TokenError::InvalidTokenFormat));
        }

        let token_data = decode::<AccessClaims>(token, &self.access_decoding_key, &self.validation)
            .map_err(map_jwt_error)?;

        Ok(token_data.claims)
    }

    /// Verifies a refresh token and returns the user ID it belongs to
    ///
    /// Rejects any token whose type marker is not "refresh", which includes
    /// every access token even under a shared secret.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Uuid, DomainError> {
        if token.is_empty() {
            return Err(DomainError::Token(TokenError::InvalidTokenFormat));
        }

        let token_data =
            decode::<RefreshClaims>(token, &self.refresh_decoding_key, &self.validation)
                .map_err(map_jwt_error)?;

        if token_data.claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(DomainError::Token(TokenError::InvalidTokenType {
                expected: REFRESH_TOKEN_TYPE.to_string(),
            }));
        }

        token_data
            .claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))
    }

    /// Access token lifetime in milliseconds
    pub fn access_token_expiry_ms(&self) -> i64 {
        self.config.access_token_expiry_ms
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> DomainError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            DomainError::Token(TokenError::TokenExpired)
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            DomainError::Token(TokenError::InvalidSignature)
        }
        _ => DomainError::Token(TokenError::InvalidTokenFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;

    fn test_config() -> TokenServiceConfig {
        TokenServiceConfig {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
            ..Default::default()
        }
    }

    fn test_user() -> User {
        User::new(
            "jane@example.com",
            "Jane",
            "Doe",
            "hash",
            vec![UserRole::User, UserRole::Provider],
        )
        .unwrap()
    }

    #[test]
    fn construction_fails_without_access_secret() {
        let config = TokenServiceConfig {
            access_secret: String::new(),
            refresh_secret: "present".to_string(),
            ..Default::default()
        };
        let result = TokenService::new(config);
        assert!(matches!(
            result,
            Err(DomainError::Config(ConfigError::MissingJwtSecret))
        ));
    }

    #[test]
    fn issue_then_verify_round_trips_all_claims() {
        let service = TokenService::new(test_config()).unwrap();
        let user = test_user();

        let pair = service.issue_token_pair(&user).unwrap();
        assert_eq!(pair.expires_in, 3_600_000);

        let claims = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.roles, vec!["USER".to_string(), "PROVIDER".to_string()]);
        assert!(claims.exp > claims.iat);

        let user_id = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(user_id, user.id);
    }

    #[test]
    fn token_kinds_cannot_be_cross_used() {
        let service = TokenService::new(test_config()).unwrap();
        let pair = service.issue_token_pair(&test_user()).unwrap();

        // A refresh token must not verify as an access token
        assert!(service.verify_access_token(&pair.refresh_token).is_err());
        // An access token must not verify as a refresh token
        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn rejects_access_tokens_even_with_shared_secret() {
        // Same secret for both kinds: the type marker must still reject
        let config = TokenServiceConfig {
            access_secret: "shared-secret".to_string(),
            refresh_secret: "shared-secret".to_string(),
            ..Default::default()
        };
        let service = TokenService::new(config).unwrap();
        let pair = service.issue_token_pair(&test_user()).unwrap();

        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn rejects_empty_and_malformed_tokens() {
        let service = TokenService::new(test_config()).unwrap();

        for token in ["", "garbage", "a.b.c", "header.payload"] {
            assert!(
                service.verify_access_token(token).is_err(),
                "{token:?} should be rejected"
            );
            assert!(service.verify_refresh_token(token).is_err());
        }
    }

    #[test]
    fn rejects_tampered_signature() {
        let service = TokenService::new(test_config()).unwrap();
        let pair = service.issue_token_pair(&test_user()).unwrap();

        let mut tampered = pair.access_token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(service.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn rejects_expired_access_token() {
        let config = TokenServiceConfig {
            access_token_expiry_ms: -10_000,
            ..test_config()
        };
        let service = TokenService::new(config).unwrap();
        let pair = service.issue_token_pair(&test_user()).unwrap();

        let result = service.verify_access_token(&pair.access_token);
        assert!(matches!(
            result,
            Err(DomainError::Token(TokenError::TokenExpired))
        ));
    }

    #[test]
    fn rejects_expired_refresh_token() {
        let config = TokenServiceConfig {
            refresh_token_expiry_ms: -10_000,
            ..test_config()
        };
        let service = TokenService::new(config).unwrap();
        let pair = service.issue_token_pair(&test_user()).unwrap();

        assert!(service.verify_refresh_token(&pair.refresh_token).is_err());
    }
}
