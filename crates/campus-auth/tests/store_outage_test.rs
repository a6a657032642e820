mod common;

use std::time::Duration;

use campus_auth::AuthError;

use common::{ALICE_SECRET, context, stalled_context};

const STORE_TIMEOUT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_authenticate_reports_unavailable_not_locked() {
    let ctx = stalled_context(STORE_TIMEOUT).await;
    let err = ctx
        .manager
        .authenticate("alice", ALICE_SECRET)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unavailable(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_wrong_secret_during_outage_is_unavailable() {
    let ctx = stalled_context(STORE_TIMEOUT).await;
    let err = ctx
        .manager
        .authenticate("alice", "not-the-secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn test_revocation_lookup_failure_counts_as_revoked() {
    let healthy = context().await;
    let tokens = healthy
        .manager
        .authenticate("alice", ALICE_SECRET)
        .await
        .unwrap();

    let ctx = stalled_context(STORE_TIMEOUT).await;
    assert!(ctx.manager.is_revoked(&tokens.access_token).await);
}

#[tokio::test]
async fn test_authorize_fails_when_store_is_down() {
    let healthy = context().await;
    let tokens = healthy
        .manager
        .authenticate("alice", ALICE_SECRET)
        .await
        .unwrap();

    let ctx = stalled_context(STORE_TIMEOUT).await;
    let err = ctx.manager.authorize(&tokens.access_token).await.unwrap_err();
    assert!(matches!(err, AuthError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn test_refresh_and_change_secret_fail_closed() {
    let healthy = context().await;
    let tokens = healthy
        .manager
        .authenticate("alice", ALICE_SECRET)
        .await
        .unwrap();

    let ctx = stalled_context(STORE_TIMEOUT).await;
    assert!(matches!(
        ctx.manager.refresh(&tokens.refresh_token).await,
        Err(AuthError::Unavailable(_))
    ));
    assert!(matches!(
        ctx.manager
            .change_secret(1, ALICE_SECRET, "Quarry-Beacon-93")
            .await,
        Err(AuthError::Unavailable(_))
    ));

    // Logout swallows store errors and still returns.
    ctx.manager.logout(&tokens.access_token, 1).await;
}
