mod common;

use std::time::Duration;

use campus_auth::{AuthError, LockoutState};
use campus_cache::keys;
use campus_core::traits::SecurityStore;
use campus_entity::principal::Role;

use common::{ALICE_SECRET, context, context_with, test_config};

#[tokio::test]
async fn test_four_failures_then_success_clears_counter() {
    let ctx = context().await;
    for _ in 0..4 {
        let err = ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    let tokens = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.expires_in_ms, ctx.config.access_token_ttl_ms);
    assert_eq!(tokens.principal.login, "alice");
    assert_eq!(tokens.principal.role, Role::Teacher);
    assert!(!tokens.principal.permissions.is_empty());

    assert_eq!(
        ctx.manager.lockout_status(1).await.unwrap(),
        LockoutState::Unlocked { attempts: 0 }
    );

    let registered = ctx
        .store
        .get(&keys::refresh_registration(1))
        .await
        .unwrap();
    assert_eq!(registered.as_deref(), Some(tokens.refresh_token.as_str()));
    let ttl = ctx
        .store
        .ttl(&keys::refresh_registration(1))
        .await
        .unwrap()
        .unwrap();
    let configured = Duration::from_millis(ctx.config.refresh_token_ttl_ms);
    assert!(ttl <= configured);
    assert!(ttl > configured - Duration::from_secs(1));

    let saved = ctx.directory.get(1).await.unwrap();
    assert!(saved.last_authenticated_at.is_some());
}

#[tokio::test]
async fn test_fifth_failure_locks_even_against_correct_secret() {
    let ctx = context().await;
    for _ in 0..4 {
        assert!(matches!(
            ctx.manager.authenticate("alice", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
    let fifth = ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
    assert!(matches!(fifth, AuthError::AccountLocked { .. }));

    for _ in 0..3 {
        match ctx.manager.authenticate("alice", ALICE_SECRET).await {
            Err(AuthError::AccountLocked { retry_after_ms }) => {
                let ms = retry_after_ms.unwrap();
                assert!(ms <= ctx.config.lockout_duration_ms);
                assert!(ms > 0);
            }
            other => panic!("expected AccountLocked, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_success_resets_streak_to_one() {
    let ctx = context().await;
    for _ in 0..3 {
        ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
    }
    ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();

    ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
    assert_eq!(
        ctx.manager.lockout_status(1).await.unwrap(),
        LockoutState::Unlocked { attempts: 1 }
    );
}

#[tokio::test]
async fn test_unknown_login_is_indistinguishable_and_uncounted() {
    let ctx = context().await;
    let unknown = ctx.manager.authenticate("nobody", "x").await.unwrap_err();
    let wrong = ctx.manager.authenticate("alice", "x").await.unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn test_inactive_principal_rejected() {
    let ctx = context().await;
    ctx.add_principal(2, "bob", "Bob-Secret-Key-9", Role::Viewer, false)
        .await;
    let err = ctx
        .manager
        .authenticate("bob", "Bob-Secret-Key-9")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AccountInactive));
}

#[tokio::test]
async fn test_lock_lapses_and_unlock_lifts_it() {
    let mut config = test_config();
    config.lockout_duration_ms = 50;
    let ctx = context_with(config).await;

    for _ in 0..5 {
        ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
    }
    assert!(matches!(
        ctx.manager.authenticate("alice", ALICE_SECRET).await,
        Err(AuthError::AccountLocked { .. })
    ));
    tokio::time::sleep(Duration::from_millis(80)).await;
    ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();

    for _ in 0..5 {
        ctx.manager.authenticate("alice", "wrong").await.unwrap_err();
    }
    ctx.manager.unlock(1).await.unwrap();
    ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
}

#[tokio::test]
async fn test_new_authentication_supersedes_refresh_token() {
    let ctx = context().await;
    let first = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    let second = ctx.manager.authenticate("alice", ALICE_SECRET).await.unwrap();
    assert_ne!(first.refresh_token, second.refresh_token);

    assert!(matches!(
        ctx.manager.refresh(&first.refresh_token).await,
        Err(AuthError::Unauthorized(_))
    ));
    ctx.manager.refresh(&second.refresh_token).await.unwrap();
}
