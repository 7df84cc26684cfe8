mod common;

use common::*;
use http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use vaultex_core::services::auth_service::RegisterService;
use vaultex_core::SecurityConfig;
use vaultex_primitives::models::dtos::auth_dto::RegisterRequest;
use vaultex_primitives::models::entities::{FiatCurrency, UpsertUser};

#[tokio::test]
async fn registration_opens_zero_wallets_and_fiat_balance() {
    let state = create_test_app_state();

    let request: RegisterRequest = serde_json::from_value(json!({
        "username": "satoshi",
        "email": "Satoshi@Example.com",
        "password": "hodl2024",
        "country": "ZA",
        "city": "Cape Town"
    }))
    .unwrap();

    let response = RegisterService::register(&state, request.normalize())
        .await
        .unwrap();

    let user_id = response.user.id;
    assert_eq!(response.user.email, "satoshi@example.com");
    assert!(!response.user.is_admin);

    let claims = SecurityConfig::verify_token(&state, &response.token).unwrap();
    assert_eq!(claims.sub, user_id.to_string());

    let wallets = state.ledger.list_user_wallets(user_id).unwrap();
    let cryptos = state.ledger.get_cryptocurrencies().unwrap();
    assert_eq!(wallets.len(), cryptos.len());
    assert!(wallets.iter().all(|w| w.balance == dec!(0)));

    let btc_wallet = wallets.iter().find(|w| w.crypto_id == BTC).unwrap();
    assert!(btc_wallet.address.starts_with("bc1q"));

    let fiat = state.ledger.list_user_fiat_balances(user_id).unwrap();
    assert_eq!(fiat.len(), 1);
    assert_eq!(fiat[0].currency, FiatCurrency::ZAR);
    assert_eq!(fiat[0].balance, dec!(0));

    assert!(state
        .ledger
        .list_user_transactions(user_id, None)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn register_then_login_over_http() {
    let state = create_test_app_state();
    let server = create_test_server(state);

    let (token, user) = register_user(&server, "alice", "password123").await;
    assert!(!token.is_empty());
    assert_eq!(user["username"], "alice");

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ALICE@example.com ", "password": "password123" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], user["id"]);

    let wrong = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "password124" }))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let unknown = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());

    register_user(&server, "bob", "password123").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "bobby",
            "email": "bob@example.com",
            "password": "password123"
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(state.ledger.list_users().unwrap().len(), 1);
}

#[tokio::test]
async fn weak_password_and_bad_email_are_rejected() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());

    for body in [
        json!({ "username": "carol", "email": "carol@example.com", "password": "short1" }),
        json!({ "username": "carol", "email": "carol@example.com", "password": "lettersonly" }),
        json!({ "username": "carol", "email": "not-an-email", "password": "password123" }),
        json!({ "username": "c", "email": "carol@example.com", "password": "password123" }),
    ] {
        server
            .post("/api/auth/register")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    assert!(state.ledger.list_users().unwrap().is_empty());
}

#[tokio::test]
async fn disabled_account_cannot_log_in_or_use_its_token() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());

    let (token, user) = register_user(&server, "dave", "password123").await;
    let user_id = user["id"].as_str().unwrap().parse().unwrap();

    let stored = state.ledger.get_user(user_id).unwrap().unwrap();
    let mut record = UpsertUser::from(&stored);
    record.is_active = false;
    state.ledger.upsert_user(&record).unwrap();

    server
        .post("/api/auth/login")
        .json(&json!({ "email": "dave@example.com", "password": "password123" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/api/users/profile")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_valid_bearer_token() {
    let state = create_test_app_state();
    let server = create_test_server(state);

    server
        .get("/api/users/profile")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/api/transactions")
        .authorization_bearer("not-a-jwt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
