//! Integration tests for the server, handler, and full connection flow.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use skygarden::prelude::*;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Starts a server on a random port with instant auth and the given
/// storage. Returns the address.
async fn start_server_with<S: Storage>(storage: S) -> String {
    let config = ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        login_latency_ms: 0,
        logout_latency_ms: 0,
        ..ServerConfig::default()
    };
    let auth = MockAuthenticator::new(config.auth());
    let server = SkygardenServerBuilder::new()
        .config(config)
        .build(auth, storage)
        .await
        .expect("server should build");

    let addr = server.local_addr().expect("should have local addr").to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn start_server() -> String {
    start_server_with(MemoryStorage::new()).await
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, msg: Value) {
    ws.send(Message::Text(msg.to_string().into()))
        .await
        .expect("send");
}

async fn recv(ws: &mut ClientWs) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("reply in time")
        .expect("stream open")
        .expect("recv");
    serde_json::from_str(msg.to_text().expect("text frame")).expect("json")
}

/// Says hello and returns the first frame.
async fn hello(ws: &mut ClientWs, client_id: &str) -> Value {
    send(ws, json!({"type": "hello", "client_id": client_id})).await;
    recv(ws).await
}

async fn login(ws: &mut ClientWs, email: &str) -> Value {
    send(ws, json!({"type": "login", "email": email, "password": "secret1"})).await;
    recv(ws).await
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_hello_first_frame_is_home() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    let env = hello(&mut ws, "tab-1").await;

    assert_eq!(env["seq"], 0);
    assert_eq!(env["payload"]["type"], "frame");
    assert_eq!(env["payload"]["path"], "/");
    assert_eq!(env["payload"]["view"]["kind"], "home");
    assert_eq!(env["payload"]["session"]["phase"], "ready");
}

#[tokio::test]
async fn test_message_before_hello_is_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send(&mut ws, json!({"type": "navigate", "path": "/dashboard"})).await;
    let env = recv(&mut ws).await;

    assert_eq!(env["payload"]["type"], "error");
    assert_eq!(env["payload"]["code"], 400);

    // The server closes the connection afterwards.
    let next = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("close in time");
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}

#[tokio::test]
async fn test_hello_with_invalid_client_id_is_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    let env = hello(&mut ws, "../etc").await;

    assert_eq!(env["payload"]["type"], "error");
    assert_eq!(env["payload"]["code"], 400);
}

#[tokio::test]
async fn test_hello_with_client_id_too_long_for_session_key_is_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    // Valid on its own, but "<id>.identity" exceeds the storage key limit.
    let env = hello(&mut ws, &"c".repeat(128)).await;

    assert_eq!(env["payload"]["type"], "error");
    assert_eq!(env["payload"]["code"], 400);
    let next = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("close in time");
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
}

#[tokio::test]
async fn test_login_lands_on_seller_dashboard() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;

    let env = login(&mut ws, "sam@shop.io").await;
    let frame = &env["payload"];

    assert_eq!(env["seq"], 1);
    assert_eq!(frame["path"], "/dashboard");
    assert_eq!(frame["view"]["kind"], "dashboard");
    assert_eq!(frame["view"]["variant"], "seller");
    assert_eq!(frame["view"]["user_name"], "sam");
    assert_eq!(frame["session"]["identity"]["role"], "seller");
}

#[tokio::test]
async fn test_bad_login_shows_error_on_home() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;

    send(&mut ws, json!({"type": "login", "email": "nope", "password": "secret1"})).await;
    let env = recv(&mut ws).await;

    assert_eq!(env["payload"]["path"], "/");
    assert_eq!(
        env["payload"]["view"]["auth_error"],
        "Invalid email or password. Password must be at least 6 characters."
    );
}

#[tokio::test]
async fn test_reconnect_same_client_id_stays_signed_in() {
    let addr = start_server().await;

    let mut first = connect(&addr).await;
    hello(&mut first, "tab-1").await;
    login(&mut first, "sam@shop.io").await;
    first.close(None).await.expect("close");

    let mut second = connect(&addr).await;
    let env = hello(&mut second, "tab-1").await;

    assert_eq!(env["payload"]["session"]["identity"]["email"], "sam@shop.io");
    // Home while signed in shows the dashboard.
    assert_eq!(env["payload"]["view"]["kind"], "dashboard");
}

#[tokio::test]
async fn test_other_client_id_is_signed_out() {
    let addr = start_server().await;

    let mut first = connect(&addr).await;
    hello(&mut first, "tab-1").await;
    login(&mut first, "sam@shop.io").await;

    let mut second = connect(&addr).await;
    let env = hello(&mut second, "tab-2").await;

    assert!(env["payload"]["session"]["identity"].is_null());
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    let addr = start_server_with(FileStorage::open(dir.path()).await.expect("open")).await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;
    login(&mut ws, "sam@shop.io").await;

    // A second server over the same directory.
    let addr = start_server_with(FileStorage::open(dir.path()).await.expect("open")).await;
    let mut ws = connect(&addr).await;
    let env = hello(&mut ws, "tab-1").await;

    assert_eq!(env["payload"]["session"]["identity"]["email"], "sam@shop.io");
}

#[tokio::test]
async fn test_switch_role_and_logout() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;
    login(&mut ws, "sam@shop.io").await;

    send(&mut ws, json!({"type": "switch_role", "role": "admin"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["view"]["variant"], "admin");

    send(&mut ws, json!({"type": "switch_role", "role": "owner"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["type"], "error");
    assert_eq!(env["payload"]["code"], 400);

    send(&mut ws, json!({"type": "logout"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["path"], "/");
    assert!(env["payload"]["session"]["identity"].is_null());
}

#[tokio::test]
async fn test_marketing_panel_round_trip() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;
    login(&mut ws, "sam@shop.io").await;

    send(&mut ws, json!({"type": "navigate", "path": "/marketing"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["view"]["tab"], "marketing");
    assert_eq!(env["payload"]["view"]["marketing"]["active"], "seo");

    send(&mut ws, json!({"type": "select_panel", "panel": "affiliate"})).await;
    recv(&mut ws).await;
    send(&mut ws, json!({"type": "edit_draft", "field": "cookie_days", "value": "45"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["view"]["marketing"]["affiliate"]["cookie_days"], 45);

    send(&mut ws, json!({"type": "select_panel", "panel": "social"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["type"], "error");
    assert_eq!(env["payload"]["code"], 422);
}

#[tokio::test]
async fn test_undecodable_message_keeps_connection_open() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    hello(&mut ws, "tab-1").await;

    send(&mut ws, json!({"type": "teleport"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["type"], "error");

    send(&mut ws, json!({"type": "refresh"})).await;
    let env = recv(&mut ws).await;
    assert_eq!(env["payload"]["type"], "frame");
}
