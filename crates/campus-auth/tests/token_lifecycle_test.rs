mod common;

use std::time::Duration;

use campus_auth::{AuthError, TokenType};
use campus_entity::principal::Role;

use common::{ALICE_SECRET, context};

#[tokio::test]
async fn test_refresh_returns_distinct_access_token() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    let refreshed = ctx.manager.refresh(&tokens.refresh_token).await.unwrap();
    assert_ne!(refreshed.access_token, tokens.access_token);
    assert_eq!(refreshed.token_type, "Bearer");

    let claims = ctx.manager.authorize(&refreshed.access_token).await.unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.uid, Some(1));
    assert_eq!(claims.token_type, TokenType::Access);
    assert!(claims.has_authority("ROLE_TEACHER"));
}

#[tokio::test]
async fn test_refresh_after_logout_is_unauthorized() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    ctx.manager.logout(&tokens.access_token, 1).await;
    assert!(matches!(
        ctx.manager.refresh(&tokens.refresh_token).await,
        Err(AuthError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_logout_revokes_only_that_token() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    let unrelated = ctx.manager.refresh(&tokens.refresh_token).await.unwrap();

    ctx.manager.logout(&tokens.access_token, 1).await;
    assert!(ctx.manager.is_revoked(&tokens.access_token).await);
    assert!(!ctx.manager.is_revoked(&unrelated.access_token).await);

    assert!(matches!(
        ctx.manager.authorize(&tokens.access_token).await,
        Err(AuthError::Unauthorized(_))
    ));
    ctx.manager.authorize(&unrelated.access_token).await.unwrap();
}

#[tokio::test]
async fn test_logout_is_idempotent_and_tolerates_bad_tokens() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    ctx.manager.logout(&tokens.access_token, 1).await;
    ctx.manager.logout(&tokens.access_token, 1).await;
    ctx.manager.logout("garbage", 1).await;
    assert!(ctx.manager.is_revoked(&tokens.access_token).await);
    assert!(!ctx.manager.is_revoked("garbage").await);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    assert!(matches!(
        ctx.manager.refresh(&tokens.access_token).await,
        Err(AuthError::Unauthorized(_))
    ));
    assert!(matches!(
        ctx.manager.authorize(&tokens.refresh_token).await,
        Err(AuthError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_expired_and_forged_tokens_fail_alike() {
    let ctx = context().await;
    let short = ctx
        .manager
        .codec()
        .issue("alice", Some(1), &[], TokenType::Access, Duration::from_millis(1))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let expired = ctx.manager.authorize(&short.value).await.unwrap_err();
    let forged = ctx
        .manager
        .authorize(&format!("{}x", short.value))
        .await
        .unwrap_err();
    match (expired, forged) {
        (AuthError::Unauthorized(a), AuthError::Unauthorized(b)) => assert_eq!(a, b),
        other => panic!("expected two Unauthorized errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deactivated_principal_cannot_refresh() {
    let ctx = context().await;
    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();

    let mut alice = ctx.directory.get(1).await.unwrap();
    alice.active = false;
    ctx.directory.insert(alice).await;

    assert!(matches!(
        ctx.manager.refresh(&tokens.refresh_token).await,
        Err(AuthError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_authorities_follow_role() {
    let ctx = context().await;
    ctx.add_principal(3, "root", "Root-Console-88", Role::Admin, true)
        .await;
    let tokens = ctx.manager.authenticate("root", "Root-Console-88").await.unwrap();
    let claims = ctx.manager.authorize(&tokens.access_token).await.unwrap();
    assert!(claims.has_authority("ROLE_ADMIN"));
    assert!(claims.has_authority("user:manage"));
}
