//! Core authentication service orchestrating credential checks, registration
//! and token lifecycle against the user repository.

use std::sync::Arc;

use crate::domain::entities::token::AccessClaims;
use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::auth_response::{AuthResponse, AuthenticatedUser};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::UserRepository;
use crate::services::password::PasswordService;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Scheme prefix expected on the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Authentication service coordinating login, registration and token refresh.
///
/// The service is generic over the user repository so tests can inject
/// in-memory implementations while production wires a persistent store.
pub struct AuthService<U: UserRepository> {
    user_repository: Arc<U>,
    token_service: Arc<TokenService>,
    password_service: Arc<PasswordService>,
    config: AuthServiceConfig,
}

impl<U: UserRepository> AuthService<U> {
    /// Creates a new authentication service with default configuration.
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        password_service: Arc<PasswordService>,
    ) -> Self {
        Self::with_config(
            user_repository,
            token_service,
            password_service,
            AuthServiceConfig::default(),
        )
    }

    /// Creates a new authentication service with explicit configuration.
    pub fn with_config(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        password_service: Arc<PasswordService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            password_service,
            config,
        }
    }

    /// Authenticates a user with email and password.
    ///
    /// The password is always verified before any account-state checks so
    /// that a caller cannot probe lockout or activation state without
    /// knowing the credential. A wrong password on an existing account
    /// increments the failed-attempt counter and may lock the account.
    ///
    /// # Arguments
    /// * `email` - Email address entered at login
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// * `Ok(AuthResponse)` - Profile and token pair on success
    /// * `Err(DomainError)` - `InvalidCredentials`, `AccountLocked`,
    ///   `AccountDeactivated` or `EmailNotVerified`
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = email.trim().to_lowercase();

        let mut user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(email = %email, "Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.password_service.verify(password, &user.password_hash) {
            user.record_failed_login();
            tracing::warn!(
                user_id = %user.id,
                failed_attempts = user.failed_login_attempts,
                "Login failed: invalid password"
            );
            self.user_repository.save(user).await?;
            return Err(AuthError::InvalidCredentials.into());
        }

        if user.is_locked() {
            tracing::warn!(user_id = %user.id, "Login rejected: account locked");
            // Persist in case the lock check lazily cleared an expired lock.
            self.user_repository.save(user).await?;
            return Err(AuthError::AccountLocked.into());
        }

        if !user.active {
            tracing::warn!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(AuthError::AccountDeactivated.into());
        }

        if !user.email_verified {
            tracing::warn!(user_id = %user.id, "Login rejected: email not verified");
            return Err(AuthError::EmailNotVerified.into());
        }

        user.record_login();
        let user = self.user_repository.save(user).await?;

        let tokens = self.token_service.issue_token_pair(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse::new(&user, tokens))
    }

    /// Registers a new user account and signs it in.
    ///
    /// The email must be unused and the password must satisfy the strength
    /// policy; all strength violations are reported together. The new
    /// account starts with the configured default roles and a clean
    /// security record, and the returned tokens are immediately usable.
    ///
    /// # Arguments
    /// * `email` - Email address for the new account
    /// * `password` - Plaintext password, checked against the strength policy
    /// * `first_name` - Given name
    /// * `last_name` - Family name
    ///
    /// # Returns
    /// * `Ok(AuthResponse)` - Profile and token pair for the new account
    /// * `Err(DomainError)` - `EmailAlreadyRegistered` or `WeakPassword`
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> DomainResult<AuthResponse> {
        let email = email.trim().to_lowercase();

        if self.user_repository.exists_by_email(&email).await? {
            tracing::warn!(email = %email, "Registration rejected: email already in use");
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let strength = self.password_service.assess_strength(password);
        if !strength.valid {
            return Err(AuthError::WeakPassword {
                violations: strength.violations,
            }
            .into());
        }

        let password_hash = self.password_service.hash(password)?;
        let user = User::new(
            &email,
            first_name,
            last_name,
            password_hash,
            self.config.default_roles.clone(),
        )?;

        let user = self.user_repository.save(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        let tokens = self.token_service.issue_token_pair(&user)?;
        Ok(AuthResponse::new(&user, tokens))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The subject account is re-loaded and must still be able to sign in;
    /// a refresh token outlives many account-state changes and must not
    /// bypass deactivation, verification or lockout.
    pub async fn refresh_token(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let user_id = self.token_service.verify_refresh_token(refresh_token)?;

        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccessDenied)?;

        if !user.can_login() {
            tracing::warn!(user_id = %user.id, "Refresh rejected: account cannot sign in");
            return Err(AuthError::AccessDenied.into());
        }

        let tokens = self.token_service.issue_token_pair(&user)?;
        tracing::debug!(user_id = %user.id, "Token pair refreshed");

        Ok(AuthResponse::new(&user, tokens))
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access_token(&self, token: &str) -> DomainResult<AccessClaims> {
        let claims = self.token_service.verify_access_token(token)?;
        Ok(claims)
    }

    /// Authenticates a request from its `Authorization` header value.
    ///
    /// Expects the `Bearer <token>` scheme. The token subject is re-loaded
    /// from the repository and must still be able to sign in, so revoked or
    /// locked accounts lose access as soon as their state changes.
    ///
    /// # Returns
    /// * `Ok(AuthenticatedUser)` - Identity derived from the current account
    /// * `Err(DomainError)` - `AuthenticationRequired`, a token error, or
    ///   `AccessDenied`
    pub async fn authenticate_bearer(&self, header: &str) -> DomainResult<AuthenticatedUser> {
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::AuthenticationRequired)?;

        let claims = self.token_service.verify_access_token(token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccessDenied)?;

        if !user.can_login() {
            tracing::warn!(user_id = %user.id, "Bearer auth rejected: account cannot sign in");
            return Err(AuthError::AccessDenied.into());
        }

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
        })
    }

    /// Checks that an authenticated identity holds at least one of the
    /// required roles. An empty requirement list admits everyone.
    pub fn require_any_role(
        identity: &AuthenticatedUser,
        required: &[UserRole],
    ) -> DomainResult<()> {
        if required.is_empty() || identity.has_any_role(required) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %identity.id,
                required = ?required,
                "Access denied: missing required role"
            );
            Err(DomainError::from(AuthError::InsufficientPermissions))
        }
    }
}
