//! End-to-end authentication flow through the public crate surface:
//! register, login, bearer authentication, refresh and lockout.

use std::sync::Arc;

use sf_core::domain::entities::user::MAX_FAILED_LOGIN_ATTEMPTS;
use sf_core::{
    AuthError, AuthService, DomainError, MockUserRepository, PasswordService, TokenService,
    TokenServiceConfig, UserRepository, UserRole,
};

const PASSWORD: &str = "Corr3ct-H0rse!";

fn build_service(repo: Arc<MockUserRepository>) -> AuthService<MockUserRepository> {
    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig {
            access_secret: "integration-access-secret".to_string(),
            refresh_secret: "integration-refresh-secret".to_string(),
            ..TokenServiceConfig::default()
        })
        .expect("valid token config"),
    );
    AuthService::new(repo, token_service, Arc::new(PasswordService::with_cost(4)))
}

#[tokio::test]
async fn register_login_and_refresh_round_trip() {
    let repo = Arc::new(MockUserRepository::new());
    let service = build_service(repo.clone());

    let registered = service
        .register("shopper@example.com", PASSWORD, "Sam", "Shopper")
        .await
        .unwrap();
    assert_eq!(registered.user.roles, vec![UserRole::User]);
    assert!(registered.user.is_new_user);

    // The tokens handed out at registration already authenticate requests.
    let header = format!("Bearer {}", registered.tokens.access_token);
    let identity = service.authenticate_bearer(&header).await.unwrap();
    assert_eq!(identity.email, "shopper@example.com");

    let login = service.login("shopper@example.com", PASSWORD).await.unwrap();
    assert!(!login.user.is_new_user);
    assert!(login.user.last_login_at.is_some());

    // The refresh token buys a new pair.
    let refreshed = service
        .refresh_token(&login.tokens.refresh_token)
        .await
        .unwrap();
    assert_eq!(refreshed.user.id, registered.user.id);
}

#[tokio::test]
async fn lockout_engages_after_repeated_failures() {
    let repo = Arc::new(MockUserRepository::new());
    let service = build_service(repo.clone());

    let registered = service
        .register("shopper@example.com", PASSWORD, "Sam", "Shopper")
        .await
        .unwrap();

    for _ in 0..MAX_FAILED_LOGIN_ATTEMPTS {
        let err = service
            .login("shopper@example.com", "Wrong-Passw0rd!")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidCredentials)
        ));
    }

    let err = service
        .login("shopper@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::AccountLocked)));

    // Manual unlock restores access.
    let mut stored = repo
        .find_by_id(registered.user.id)
        .await
        .unwrap()
        .unwrap();
    stored.unlock();
    repo.save(stored).await.unwrap();

    service.login("shopper@example.com", PASSWORD).await.unwrap();
}
