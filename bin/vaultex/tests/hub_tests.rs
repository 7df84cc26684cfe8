mod common;

use common::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, connect_async, MaybeTlsStream, WebSocketStream};
use vaultex_core::notifications::{ConnectionState, HubClient, HubClientConfig, ReconnectPolicy};
use vaultex_core::services::balance_service::{Actor, BalanceService, TransferDetails};
use vaultex_primitives::models::dtos::notification_dto::ServerEvent;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn connect(addr: SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("ws connect");
    socket
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::text(value.to_string()))
        .await
        .expect("ws send");
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = timeout(WAIT, socket.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .expect("socket error");

        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("json event");
        }
    }
}

async fn authenticate(socket: &mut Socket, user_id: uuid::Uuid, is_admin: bool) -> Value {
    send_json(
        socket,
        json!({ "type": "authenticate", "data": { "userId": user_id, "isAdmin": is_admin } }),
    )
    .await;
    next_json(socket).await
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    timeout(WAIT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition never became true");
}

async fn credit(state: &vaultex_core::AppState, user_id: uuid::Uuid, crypto_id: i32, amount: &str) {
    BalanceService::credit_wallet(
        state,
        user_id,
        crypto_id,
        amount,
        Actor::User(user_id),
        TransferDetails::default(),
    )
    .await
    .expect("credit");
}

#[tokio::test]
async fn authenticated_socket_receives_balance_and_transaction_updates() {
    let state = create_test_app_state();
    let user = seed_user(&state, "alice", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut socket = connect(addr).await;
    let ack = authenticate(&mut socket, user.id, false).await;
    assert_eq!(ack["type"], "authenticated");
    assert_eq!(ack["data"]["userId"], user.id.to_string());
    assert_eq!(ack["data"]["isAdmin"], false);

    credit(&state, user.id, ETH, "1.5").await;

    let first = next_json(&mut socket).await;
    assert_eq!(first["type"], "balance_update");
    assert_eq!(first["data"]["cryptoId"], ETH);
    assert_eq!(first["data"]["walletBalance"], "1.5");

    let second = next_json(&mut socket).await;
    assert_eq!(second["type"], "transaction_update");
    assert_eq!(second["data"]["type"], "deposit");
}

#[tokio::test]
async fn ping_gets_pong_and_garbage_gets_error() {
    let state = create_test_app_state();
    let addr = spawn_http_server(state).await;
    let mut socket = connect(addr).await;

    send_json(&mut socket, json!({ "type": "ping" })).await;
    assert_eq!(next_json(&mut socket).await, json!({ "type": "pong" }));

    socket
        .send(Message::text("definitely not json"))
        .await
        .unwrap();
    let error = next_json(&mut socket).await;
    assert_eq!(error["type"], "error");
    assert!(error["data"]["message"].is_string());
}

#[tokio::test]
async fn every_connection_of_a_user_is_notified_and_nobody_else() {
    let state = create_test_app_state();
    let alice = seed_user(&state, "alice", false);
    let bob = seed_user(&state, "bob", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut tab_one = connect(addr).await;
    let mut tab_two = connect(addr).await;
    let mut other = connect(addr).await;
    authenticate(&mut tab_one, alice.id, false).await;
    authenticate(&mut tab_two, alice.id, false).await;
    authenticate(&mut other, bob.id, false).await;

    assert_eq!(state.hub.user_connection_count(alice.id), 2);

    credit(&state, alice.id, BTC, "1").await;

    assert_eq!(next_json(&mut tab_one).await["type"], "balance_update");
    assert_eq!(next_json(&mut tab_two).await["type"], "balance_update");

    send_json(&mut other, json!({ "type": "ping" })).await;
    assert_eq!(next_json(&mut other).await["type"], "pong");
}

#[tokio::test]
async fn admin_connection_sees_admin_notifications() {
    let state = create_test_app_state();
    let admin = seed_user(&state, "root", true);
    let user = seed_user(&state, "carol", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut socket = connect(addr).await;
    authenticate(&mut socket, admin.id, true).await;

    credit(&state, user.id, BTC, "2").await;

    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "admin_notification");
    assert_eq!(event["data"]["userId"], user.id.to_string());
}

#[tokio::test]
async fn closing_a_socket_removes_it_from_the_hub() {
    let state = create_test_app_state();
    let user = seed_user(&state, "dave", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut socket = connect(addr).await;
    authenticate(&mut socket, user.id, false).await;
    assert_eq!(state.hub.user_connection_count(user.id), 1);

    socket.close(None).await.unwrap();

    wait_until(|| state.hub.connection_count() == 0).await;
    assert_eq!(state.hub.user_connection_count(user.id), 0);
}

#[tokio::test]
async fn token_mode_takes_identity_from_the_session() {
    let mut config = test_config(DEAD_FEED_URL);
    config.ws_require_token = true;
    let state = create_test_app_state_with(config);
    let admin = seed_user(&state, "root", true);
    let user = seed_user(&state, "erin", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut socket = connect(addr).await;
    let refused = authenticate(&mut socket, user.id, true).await;
    assert_eq!(refused["type"], "error");
    assert_eq!(state.hub.authenticated_count(), 0);

    // someone else's token
    send_json(
        &mut socket,
        json!({ "type": "authenticate", "data": {
            "userId": user.id, "isAdmin": true, "token": token_for(&state, &admin)
        }}),
    )
    .await;
    assert_eq!(next_json(&mut socket).await["type"], "error");

    send_json(
        &mut socket,
        json!({ "type": "authenticate", "data": {
            "userId": user.id, "isAdmin": true, "token": token_for(&state, &user)
        }}),
    )
    .await;
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "authenticated");
    assert_eq!(ack["data"]["isAdmin"], false);
}

#[tokio::test]
async fn hub_client_authenticates_and_delivers_events() {
    let state = create_test_app_state();
    let user = seed_user(&state, "frank", false);
    let addr = spawn_http_server(state.clone()).await;

    let mut client = HubClient::spawn(HubClientConfig {
        url: format!("ws://{}/ws", addr),
        user_id: user.id,
        is_admin: false,
        token: None,
        policy: ReconnectPolicy {
            base: Duration::from_millis(20),
            max_attempts: 3,
        },
    });

    let ack = timeout(WAIT, client.next_event()).await.unwrap().unwrap();
    match ack {
        ServerEvent::Authenticated(ack) => assert_eq!(ack.user_id, user.id),
        other => panic!("expected authenticated, got {:?}", other),
    }
    assert_eq!(client.state(), ConnectionState::Authenticated);

    credit(&state, user.id, BTC, "0.3").await;

    let update = timeout(WAIT, client.next_event()).await.unwrap().unwrap();
    match update {
        ServerEvent::BalanceUpdate(update) => assert_eq!(update.wallet_balance, dec!(0.3)),
        other => panic!("expected balance_update, got {:?}", other),
    }

    timeout(WAIT, client.close()).await.unwrap();
    wait_until(|| state.hub.connection_count() == 0).await;
}

#[tokio::test]
async fn hub_client_gives_up_after_its_retry_budget() {
    // bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HubClient::spawn(HubClientConfig {
        url: format!("ws://{}/ws", addr),
        user_id: uuid::Uuid::new_v4(),
        is_admin: false,
        token: None,
        policy: ReconnectPolicy {
            base: Duration::from_millis(10),
            max_attempts: 3,
        },
    });
    let mut watch = client.watch_state();

    timeout(WAIT, client.finished())
        .await
        .expect("client kept retrying past its budget");
    assert_eq!(*watch.borrow_and_update(), ConnectionState::Disconnected);
}

/// Server that reads the client's first message and then closes with `code`.
/// Returns its address and the number of connections it has accepted.
async fn spawn_closing_server(code: CloseCode) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let Ok(mut socket) = accept_async(stream).await else {
                    return;
                };
                let _ = socket.next().await;
                let _ = socket
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: "".into(),
                    })))
                    .await;
                while let Some(Ok(_)) = socket.next().await {}
            });
        }
    });

    (addr, accepted)
}

fn client_for(addr: SocketAddr) -> HubClient {
    HubClient::spawn(HubClientConfig {
        url: format!("ws://{}/ws", addr),
        user_id: uuid::Uuid::new_v4(),
        is_admin: false,
        token: None,
        policy: ReconnectPolicy {
            base: Duration::from_millis(10),
            max_attempts: 3,
        },
    })
}

#[tokio::test]
async fn hub_client_reconnects_after_an_error_close() {
    let (addr, accepted) = spawn_closing_server(CloseCode::Error).await;

    timeout(WAIT, client_for(addr).finished())
        .await
        .expect("client kept retrying past its budget");

    // first connection plus one per retry
    assert_eq!(accepted.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn hub_client_stops_after_a_normal_close() {
    let (addr, accepted) = spawn_closing_server(CloseCode::Normal).await;

    timeout(WAIT, client_for(addr).finished())
        .await
        .expect("client did not stop after a normal close");

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
