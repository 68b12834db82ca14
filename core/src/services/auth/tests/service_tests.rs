//! Unit tests for authentication service

use std::sync::Arc;

use crate::domain::entities::user::{Role, User};
use crate::domain::value_objects::{RefreshIgnored, RefreshOutcome, Registration};
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::{MockTokenRepository, MockUserRepository, TokenRepository, UserRepository};
use crate::services::auth::{AuthService, BcryptPasswordHasher, PasswordHasher};

use super::mocks::*;

fn alice() -> Registration {
    Registration::new("Alice", "Liddell", "alice@example.com", "wonderland", Role::User)
}

async fn user_by_email(ctx: &TestContext, email: &str) -> User {
    ctx.users.find_by_email(email).await.unwrap().unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_register_records_single_valid_token() {
    let ctx = create_context();

    let response = ctx.service.register(alice()).await.unwrap();

    let user = user_by_email(&ctx, "alice@example.com").await;
    let records = ctx.tokens.tokens_for(user.id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token, response.access_token);
    assert!(records[0].is_valid());

    // Refresh tokens are never persisted
    assert!(ctx.tokens.find_by_token(&response.refresh_token).await.unwrap().is_none());
    assert_eq!(
        ctx.token_service.extract_subject(&response.refresh_token).unwrap(),
        "alice@example.com"
    );
}

#[tokio::test]
async fn test_register_hashes_password_and_normalizes_email() {
    let ctx = create_context();

    ctx.service
        .register(Registration::new(
            "Alice",
            "Liddell",
            " Alice@Example.com ",
            "wonderland",
            Role::Admin,
        ))
        .await
        .unwrap();

    let user = user_by_email(&ctx, "alice@example.com").await;
    assert_eq!(user.password_hash, "plain:wonderland");
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let ctx = create_context();
    ctx.service.register(alice()).await.unwrap();

    let result = ctx.service.register(alice()).await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_register_validates_input() {
    let ctx = create_context();

    let result = ctx
        .service
        .register(Registration::new("A", "B", "", "pw", Role::User))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));

    let result = ctx
        .service
        .register(Registration::new("A", "B", "not-an-email", "pw", Role::User))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail { .. }))
    ));

    let result = ctx
        .service
        .register(Registration::new("A", "B", "a@example.com", "", Role::User))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
    assert_eq!(ctx.tokens.count().await, 0);
}

#[tokio::test]
async fn test_register_rejects_malformed_emails() {
    let ctx = create_context();

    for email in ["a b@c.d", "x@.", "x@y..", "<x>@y.z", "@example.com", "alice@"] {
        let result = ctx
            .service
            .register(Registration::new("A", "B", email, "pw", Role::User))
            .await;
        assert!(
            matches!(
                result,
                Err(DomainError::ValidationErr(ValidationError::InvalidEmail { .. }))
            ),
            "{} should be rejected",
            email
        );
        assert!(ctx.users.find_by_email(email).await.unwrap().is_none());
    }
    assert_eq!(ctx.tokens.count().await, 0);
}

#[tokio::test]
async fn test_login_supersedes_previous_token() {
    let ctx = create_context();
    let first = ctx.service.register(alice()).await.unwrap();

    let second = ctx
        .service
        .authenticate("alice@example.com", "wonderland")
        .await
        .unwrap();

    assert_ne!(first.access_token, second.access_token);

    let old = ctx.tokens.find_by_token(&first.access_token).await.unwrap().unwrap();
    assert!(old.expired);
    assert!(old.revoked);

    let user = user_by_email(&ctx, "alice@example.com").await;
    let valid = ctx.tokens.find_all_valid_by_user(user.id).await.unwrap();
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].token, second.access_token);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let ctx = create_context();
    ctx.service.register(alice()).await.unwrap();

    let result = ctx.service.authenticate("ALICE@example.com", "wonderland").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();

    let result = ctx.service.authenticate("alice@example.com", "looking-glass").await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    // The existing session is left alone
    assert!(ctx.tokens.is_token_valid(&registered.access_token).await.unwrap());
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let ctx = create_context();

    let result = ctx.service.authenticate("nobody@example.com", "pw").await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_when_user_disappears_after_match() {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let service = AuthService::new(
        users,
        Arc::clone(&tokens),
        token_service_with_lifetimes(900, 604800),
        Arc::new(PlainPasswordHasher),
        Arc::new(FixedCredentialMatcher { accept: true }),
    );

    let result = service.authenticate("ghost@example.com", "pw").await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
    assert_eq!(tokens.count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_leave_one_valid_token() {
    let ctx = create_context();
    ctx.service.register(alice()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&ctx.service);
        handles.push(tokio::spawn(async move {
            service.authenticate("alice@example.com", "wonderland").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let user = user_by_email(&ctx, "alice@example.com").await;
    let valid = ctx.tokens.find_all_valid_by_user(user.id).await.unwrap();
    assert_eq!(valid.len(), 1);
    assert_eq!(ctx.tokens.tokens_for(user.id).await.len(), 17);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();

    let outcome = ctx
        .service
        .refresh(Some(&bearer(&registered.refresh_token)))
        .await
        .unwrap();

    let RefreshOutcome::Issued(response) = outcome else {
        panic!("expected a new token pair");
    };
    assert_eq!(response.refresh_token, registered.refresh_token);
    assert_ne!(response.access_token, registered.access_token);

    assert!(!ctx.tokens.is_token_valid(&registered.access_token).await.unwrap());
    assert!(ctx.tokens.is_token_valid(&response.access_token).await.unwrap());
}

#[tokio::test]
async fn test_refresh_without_header_is_ignored() {
    let ctx = create_context();
    ctx.service.register(alice()).await.unwrap();
    let before = ctx.tokens.count().await;

    let outcome = ctx.service.refresh(None).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Ignored(RefreshIgnored::MissingBearer));

    let outcome = ctx.service.refresh(Some("Basic abc")).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Ignored(RefreshIgnored::MissingBearer));

    assert_eq!(ctx.tokens.count().await, before);
}

#[tokio::test]
async fn test_refresh_with_expired_token_changes_nothing() {
    let ctx = create_context_with(token_service_with_lifetimes(900, -60));
    let registered = ctx.service.register(alice()).await.unwrap();

    let outcome = ctx
        .service
        .refresh(Some(&bearer(&registered.refresh_token)))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RefreshOutcome::Ignored(RefreshIgnored::InvalidRefreshToken)
    );
    assert_eq!(ctx.tokens.count().await, 1);
    assert!(ctx.tokens.is_token_valid(&registered.access_token).await.unwrap());
}

#[tokio::test]
async fn test_refresh_with_tampered_token() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();
    let tampered = format!("{}x", registered.refresh_token);

    let result = ctx.service.refresh(Some(&bearer(&tampered))).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[tokio::test]
async fn test_refresh_for_unknown_subject() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();
    let user = user_by_email(&ctx, "alice@example.com").await;
    ctx.users.remove(user.id).await;

    let result = ctx.service.refresh(Some(&bearer(&registered.refresh_token))).await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();

    let user = ctx
        .service
        .validate_access_token(&registered.access_token)
        .await
        .unwrap();
    assert_eq!(user.email, "alice@example.com");

    ctx.service.logout(&registered.access_token).await.unwrap();

    assert!(matches!(
        ctx.service.validate_access_token(&registered.access_token).await,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_logout_with_unknown_token() {
    let ctx = create_context();

    let result = ctx.service.logout("never-issued").await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[tokio::test]
async fn test_validate_rejects_refresh_and_unrecorded_tokens() {
    let ctx = create_context();
    let registered = ctx.service.register(alice()).await.unwrap();
    let user = user_by_email(&ctx, "alice@example.com").await;

    // Refresh tokens cannot be used on guarded routes
    assert!(ctx
        .service
        .validate_access_token(&registered.refresh_token)
        .await
        .is_err());

    // Authentic but never recorded
    let stray = ctx.token_service.generate_access_token(&user).unwrap();
    assert!(matches!(
        ctx.service.validate_access_token(&stray).await,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[tokio::test]
async fn test_bcrypt_hasher_round_trip() {
    let hasher = BcryptPasswordHasher::new(4);

    let hash = hasher.hash("wonderland").unwrap();

    assert_ne!(hash, "wonderland");
    assert!(hasher.verify("wonderland", &hash).unwrap());
    assert!(!hasher.verify("looking-glass", &hash).unwrap());
}
