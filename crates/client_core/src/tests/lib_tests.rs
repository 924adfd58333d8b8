use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::domain::PackageId;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct PortalServerState {
    user_reply: Arc<Mutex<(StatusCode, String)>>,
    leaderboard_reply: Arc<Mutex<(StatusCode, String)>>,
    packages_reply: Arc<Mutex<(StatusCode, String)>>,
    checkout_reply: Arc<Mutex<(StatusCode, String)>>,
    requested_usernames: Arc<Mutex<Vec<String>>>,
    checkout_tx: Arc<Mutex<Option<oneshot::Sender<CheckoutRequest>>>>,
}

fn alice_stats_reply() -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "success": true,
            "user": {
                "username": "alice",
                "tier": "silver",
                "daily_rate": 5.0,
                "total_referrals": 2,
                "total_earnings": 150.0,
                "affiliate_link": "https://rizzosai.com/?ref=alice",
                "referrals": [
                    {
                        "name": "Bob Smith",
                        "username": "bob",
                        "joined": "2024-01-01T10:00:00Z",
                        "tier": "bronze"
                    },
                    {
                        "name": "Carol Jones",
                        "username": "carol",
                        "joined": "2024-02-15 09:30:00",
                        "tier": "silver"
                    }
                ]
            }
        })
        .to_string(),
    )
}

fn leaderboard_reply() -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "leaderboard": [
                {"name": "Top Earner", "username": "top", "earnings": 30.0, "referrals": 12},
                {"name": "Runner Up", "username": "runner", "earnings": 12.5, "referrals": 4}
            ]
        })
        .to_string(),
    )
}

fn catalog_reply() -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "packages": [
                {"id": "p1", "name": "Starter", "price": 29.0},
                {"id": "p2", "name": "Pro", "price": 99.0},
                {"id": "p3", "name": "Enterprise", "price": 299.0}
            ]
        })
        .to_string(),
    )
}

fn checkout_reply() -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "checkout_url": "https://checkout.stripe.example/cs_test_123",
            "session_id": "cs_test_123"
        })
        .to_string(),
    )
}

async fn handle_user_stats(
    State(state): State<PortalServerState>,
    Path(username): Path<String>,
) -> (StatusCode, String) {
    state.requested_usernames.lock().await.push(username);
    state.user_reply.lock().await.clone()
}

async fn handle_leaderboard(State(state): State<PortalServerState>) -> (StatusCode, String) {
    state.leaderboard_reply.lock().await.clone()
}

async fn handle_packages(State(state): State<PortalServerState>) -> (StatusCode, String) {
    state.packages_reply.lock().await.clone()
}

async fn handle_checkout(
    State(state): State<PortalServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> (StatusCode, String) {
    if let Some(tx) = state.checkout_tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    state.checkout_reply.lock().await.clone()
}

async fn spawn_portal_server() -> Result<(String, PortalServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = PortalServerState {
        user_reply: Arc::new(Mutex::new(alice_stats_reply())),
        leaderboard_reply: Arc::new(Mutex::new(leaderboard_reply())),
        packages_reply: Arc::new(Mutex::new(catalog_reply())),
        checkout_reply: Arc::new(Mutex::new(checkout_reply())),
        requested_usernames: Arc::new(Mutex::new(Vec::new())),
        checkout_tx: Arc::new(Mutex::new(None)),
    };
    let app = Router::new()
        .route("/api/user/:username", get(handle_user_stats))
        .route("/api/leaderboard", get(handle_leaderboard))
        .route("/api/packages", get(handle_packages))
        .route("/api/create-checkout-session", post(handle_checkout))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[test]
fn base_url_trailing_slash_is_stripped() {
    let client = ApiClient::new("http://127.0.0.1:5000/");
    assert_eq!(client.base_url(), "http://127.0.0.1:5000");
}

#[tokio::test]
async fn user_stats_returns_account_for_successful_lookup() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    let client = ApiClient::new(server_url);
    let identity = Identity::parse("alice").expect("identity");

    let stats = client
        .fetch_user_stats(&identity)
        .await
        .expect("fetch user stats");

    assert_eq!(stats.username, "alice");
    assert_eq!(stats.tier, "silver");
    assert_eq!(stats.daily_rate, 5.0);
    assert_eq!(stats.total_referrals, 2);
    assert_eq!(stats.referrals.len(), 2);
    assert_eq!(stats.referrals[0].username, "bob");
    assert_eq!(
        *state.requested_usernames.lock().await,
        vec!["alice".to_string()]
    );
}

#[tokio::test]
async fn user_stats_rejection_carries_server_message() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.user_reply.lock().await = (
        StatusCode::NOT_FOUND,
        json!({"success": false, "error": "User not found"}).to_string(),
    );
    let client = ApiClient::new(server_url);
    let identity = Identity::parse("ghost").expect("identity");

    let err = client
        .fetch_user_stats(&identity)
        .await
        .expect_err("lookup should be rejected");

    match err {
        FetchError::Rejected { message } => {
            assert_eq!(message.as_deref(), Some("User not found"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn user_stats_rejects_ok_status_with_cleared_success_flag() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.user_reply.lock().await = (
        StatusCode::OK,
        json!({"success": false, "error": "account suspended"}).to_string(),
    );
    let client = ApiClient::new(server_url);
    let identity = Identity::parse("alice").expect("identity");

    let err = client
        .fetch_user_stats(&identity)
        .await
        .expect_err("cleared success flag should reject");

    match err {
        FetchError::Rejected { message } => {
            assert_eq!(message.as_deref(), Some("account suspended"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn user_stats_rejects_success_flag_without_user_payload() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.user_reply.lock().await = (StatusCode::OK, json!({"success": true}).to_string());
    let client = ApiClient::new(server_url);
    let identity = Identity::parse("alice").expect("identity");

    let err = client
        .fetch_user_stats(&identity)
        .await
        .expect_err("missing user payload should reject");

    match err {
        FetchError::Rejected { message } => assert!(message.is_none()),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn user_stats_undecodable_body_is_transport_error() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.user_reply.lock().await =
        (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>".to_string());
    let client = ApiClient::new(server_url);
    let identity = Identity::parse("alice").expect("identity");

    let err = client
        .fetch_user_stats(&identity)
        .await
        .expect_err("undecodable body should fail");

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn leaderboard_preserves_server_order() {
    let (server_url, _state) = spawn_portal_server().await.expect("spawn server");
    let client = ApiClient::new(server_url);

    let entries = client.fetch_leaderboard().await.expect("fetch leaderboard");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].username, "top");
    assert_eq!(entries[0].earnings, 30.0);
    assert_eq!(entries[1].username, "runner");
}

#[tokio::test]
async fn leaderboard_tolerates_reply_without_entries_field() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.leaderboard_reply.lock().await = (StatusCode::OK, "{}".to_string());
    let client = ApiClient::new(server_url);

    let entries = client.fetch_leaderboard().await.expect("fetch leaderboard");

    assert!(entries.is_empty());
}

#[tokio::test]
async fn leaderboard_http_failure_is_transport_error() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.leaderboard_reply.lock().await = (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"leaderboard": []}).to_string(),
    );
    let client = ApiClient::new(server_url);

    let err = client
        .fetch_leaderboard()
        .await
        .expect_err("server error should fail the fetch");

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn packages_decode_catalog_entries() {
    let (server_url, _state) = spawn_portal_server().await.expect("spawn server");
    let client = ApiClient::new(server_url);

    let packages = client.fetch_packages().await.expect("fetch packages");

    assert_eq!(packages.len(), 3);
    assert_eq!(packages[0].id, PackageId("p1".to_string()));
    assert_eq!(packages[0].name, "Starter");
    assert_eq!(packages[0].price, 29.0);
}

#[tokio::test]
async fn packages_reply_without_catalog_field_is_transport_error() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.packages_reply.lock().await = (StatusCode::OK, "{}".to_string());
    let client = ApiClient::new(server_url);

    let err = client
        .fetch_packages()
        .await
        .expect_err("missing catalog field should fail");

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn packages_decode_ignores_http_status() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    let (_, body) = catalog_reply();
    *state.packages_reply.lock().await = (StatusCode::INTERNAL_SERVER_ERROR, body);
    let client = ApiClient::new(server_url);

    let packages = client.fetch_packages().await.expect("fetch packages");

    assert_eq!(packages.len(), 3);
}

#[tokio::test]
async fn checkout_posts_selected_package_and_referrer() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    let (tx, rx) = oneshot::channel();
    *state.checkout_tx.lock().await = Some(tx);
    let client = ApiClient::new(server_url);
    let selection = CheckoutSelection {
        package_id: PackageId("p1".to_string()),
        referrer: "joe".to_string(),
    };

    let response = client
        .create_checkout_session(&selection)
        .await
        .expect("create checkout session");

    let request = rx.await.expect("captured checkout request");
    assert_eq!(request.package_id, PackageId("p1".to_string()));
    assert_eq!(request.referrer, "joe");
    assert_eq!(
        response.checkout_url.as_deref(),
        Some("https://checkout.stripe.example/cs_test_123")
    );
    assert_eq!(response.session_id.as_deref(), Some("cs_test_123"));
}

#[tokio::test]
async fn checkout_decodes_reply_without_redirect() {
    let (server_url, state) = spawn_portal_server().await.expect("spawn server");
    *state.checkout_reply.lock().await = (StatusCode::OK, "{}".to_string());
    let client = ApiClient::new(server_url);
    let selection = CheckoutSelection {
        package_id: PackageId("p2".to_string()),
        referrer: String::new(),
    };

    let response = client
        .create_checkout_session(&selection)
        .await
        .expect("create checkout session");

    assert!(response.checkout_url.is_none());
    assert!(response.session_id.is_none());
}
