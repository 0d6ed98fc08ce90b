//! Reconciliation pass integration tests.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{admin_path, session, user, TestEnv};

/// Deletes only the session without client bindings.
#[tokio::test]
async fn test_deletes_only_orphaned_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("u1", "alice")])).await;
    env.mount_sessions(
        "u1",
        json!([session("s1", &[]), session("s2", &[("app", "x")])]),
    )
    .await;
    env.expect_delete("s1", 204, 1).await;
    env.expect_delete("s2", 204, 0).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.users_scanned, 1);
    assert_eq!(summary.sessions_inspected, 2);
    assert_eq!(summary.orphans_found, 1);
    assert_eq!(summary.sessions_deleted, 1);
    assert_eq!(summary.deletions_failed, 0);
    env.server.verify().await;
    Ok(())
}

/// A failed user listing ends the pass without deletions.
#[tokio::test]
async fn test_user_listing_failure_fails_open() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    Mock::given(method("GET"))
        .and(path(admin_path("/users")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&env.server)
        .await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary, kc_reaper::ReconcileSummary::default());
    assert_eq!(env.delete_count().await, 0);
    Ok(())
}

/// Malformed user JSON is treated like a failed listing.
#[tokio::test]
async fn test_malformed_user_listing_fails_open() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!({ "error": "unexpected" })).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.users_scanned, 0);
    assert_eq!(env.delete_count().await, 0);
    Ok(())
}

/// Without a token nothing beyond the token exchange is attempted.
#[tokio::test]
async fn test_token_failure_ends_pass_quietly() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    Mock::given(method("POST"))
        .and(path(crate::common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .expect(1)
        .mount(&env.server)
        .await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.users_scanned, 0);
    let received = env.server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1, "only the token exchange should be sent");
    Ok(())
}

/// A user whose sessions cannot be listed does not stop later users.
#[tokio::test]
async fn test_session_listing_failure_is_isolated() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("a", "alice"), user("b", "bob")]))
        .await;
    env.fail_sessions("a", 503).await;
    env.mount_sessions("b", json!([session("sb", &[])])).await;
    env.expect_delete("sb", 204, 1).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.users_scanned, 2);
    assert_eq!(summary.sessions_deleted, 1);
    env.server.verify().await;
    Ok(())
}

/// A failed deletion is counted and later sessions and users still run.
#[tokio::test]
async fn test_delete_failure_is_isolated() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("a", "alice"), user("b", "bob")]))
        .await;
    env.mount_sessions("a", json!([session("sa1", &[]), session("sa2", &[])]))
        .await;
    env.mount_sessions("b", json!([session("sb", &[])])).await;
    env.expect_delete("sa1", 500, 1).await;
    env.expect_delete("sa2", 204, 1).await;
    env.expect_delete("sb", 204, 1).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.orphans_found, 3);
    assert_eq!(summary.sessions_deleted, 2);
    assert_eq!(summary.deletions_failed, 1);
    env.server.verify().await;
    Ok(())
}

/// Users are processed in directory order.
#[tokio::test]
async fn test_users_processed_in_directory_order() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("u2", "zed"), user("u1", "amy")]))
        .await;
    env.mount_sessions("u1", json!([])).await;
    env.mount_sessions("u2", json!([])).await;

    env.reconciler().run().await;

    let received = env.server.received_requests().await.unwrap_or_default();
    let session_paths: Vec<String> = received
        .iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| p.ends_with("/sessions"))
        .collect();
    assert_eq!(
        session_paths,
        vec![
            admin_path("/users/u2/sessions"),
            admin_path("/users/u1/sessions")
        ]
    );
    Ok(())
}

/// A second pass finds nothing left to delete.
#[tokio::test]
async fn test_second_pass_is_idempotent() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("u1", "alice")])).await;
    Mock::given(method("GET"))
        .and(path(admin_path("/users/u1/sessions")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([session("s1", &[]), session("s2", &[("app", "x")])])),
        )
        .up_to_n_times(1)
        .mount(&env.server)
        .await;
    env.mount_sessions("u1", json!([session("s2", &[("app", "x")])]))
        .await;
    env.expect_delete("s1", 204, 1).await;

    let mut reconciler = env.reconciler();
    let first = reconciler.run().await;
    let second = reconciler.run().await;

    assert_eq!(first.sessions_deleted, 1);
    assert_eq!(second.orphans_found, 0);
    assert_eq!(second.sessions_deleted, 0);
    assert_eq!(env.delete_count().await, 1);
    env.server.verify().await;
    Ok(())
}

/// Dry run reports orphans without deleting them.
#[tokio::test]
async fn test_dry_run_deletes_nothing() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("u1", "alice")])).await;
    env.mount_sessions("u1", json!([session("s1", &[]), session("s3", &[])]))
        .await;

    let summary = env.reconciler().with_dry_run(true).run().await;

    assert_eq!(summary.orphans_found, 2);
    assert_eq!(summary.sessions_deleted, 0);
    assert_eq!(env.delete_count().await, 0);
    Ok(())
}

/// Tests that sessions whose `clients` field is absent or null are kept.
#[tokio::test]
async fn test_missing_clients_field_is_kept() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("u1", "alice")])).await;
    env.mount_sessions(
        "u1",
        json!([
            { "id": "s9" },
            { "id": "s10", "clients": null },
            session("s11", &[]),
        ]),
    )
    .await;
    env.expect_delete("s9", 204, 0).await;
    env.expect_delete("s10", 204, 0).await;
    env.expect_delete("s11", 204, 1).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.sessions_inspected, 3);
    assert_eq!(summary.orphans_found, 1);
    assert_eq!(summary.sessions_deleted, 1);
    env.server.verify().await;
    Ok(())
}

/// Tests that user and session ids are percent-encoded into request paths.
#[tokio::test]
async fn test_ids_are_percent_encoded() -> anyhow::Result<()> {
    let env = TestEnv::new().await;
    env.mount_token("t1", 300, None).await;
    env.mount_users(json!([user("a/b c", "alice")])).await;
    env.mount_sessions("a%2Fb%20c", json!([session("s/1", &[])])).await;
    env.expect_delete("s%2F1", 204, 1).await;

    let summary = env.reconciler().run().await;

    assert_eq!(summary.sessions_inspected, 1);
    assert_eq!(summary.sessions_deleted, 1);
    env.server.verify().await;
    Ok(())
}
