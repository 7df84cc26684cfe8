mod common;

use common::*;
use http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use vaultex_core::services::market_service::MarketService;

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {}", value))
        .parse()
        .unwrap()
}

#[tokio::test]
async fn health_and_reference_data_are_public() {
    let state = create_test_app_state();
    MarketService::initialize(&state).await.unwrap();
    let server = create_test_server(state);

    server.get("/api/health").await.assert_status_ok();

    let cryptos: Value = server.get("/api/cryptocurrencies").await.json();
    let cryptos = cryptos.as_array().unwrap();
    assert_eq!(cryptos.len(), 6);
    assert_eq!(cryptos[0]["symbol"], "BTC");
    assert!(cryptos[0].get("feedId").is_none());

    let market: Value = server.get("/api/market-data").await.json();
    assert_eq!(market.as_array().unwrap().len(), 6);

    let eth: Value = server.get("/api/market-data/2").await.json();
    assert_eq!(eth["symbol"], "ETH");

    server
        .get("/api/market-data/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = create_test_server(create_test_app_state());

    let doc: Value = server.get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"]
        .as_object()
        .unwrap()
        .contains_key("/api/admin/users/{id}/credit"));
}

#[tokio::test]
async fn profile_lists_wallets_fiat_and_history() {
    let state = create_test_app_state();
    let user = seed_user(&state, "alice", false);
    let token = token_for(&state, &user);
    let server = create_test_server(state);

    let profile: Value = server
        .get("/api/users/profile")
        .authorization_bearer(&token)
        .await
        .json();

    assert_eq!(profile["user"]["username"], "alice");
    assert_eq!(profile["wallets"].as_array().unwrap().len(), 6);
    assert_eq!(profile["fiatBalance"]["currency"], "ZAR");
    assert_eq!(decimal(&profile["fiatBalance"]["balance"]), dec!(0));
    assert!(profile["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn profile_update_changes_only_supplied_fields() {
    let state = create_test_app_state();
    let user = seed_user(&state, "bob", false);
    let token = token_for(&state, &user);
    let server = create_test_server(state);

    let updated: Value = server
        .put("/api/users/profile")
        .authorization_bearer(&token)
        .json(&json!({ "city": "Durban" }))
        .await
        .json();

    assert_eq!(updated["city"], "Durban");
    assert_eq!(updated["email"], "bob@example.com");
    assert!(updated["firstName"].is_null());
}

#[tokio::test]
async fn buy_over_http_returns_the_recorded_row() {
    let state = create_test_app_state();
    let user = seed_user(&state, "carol", false);
    fund_fiat(&state, user.id, dec!(5000.00));
    let token = token_for(&state, &user);
    let server = create_test_server(state.clone());

    let response = server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({
            "cryptoId": BTC,
            "type": "buy",
            "amount": "0.1",
            "price": 12000,
            "totalFiat": "1200.00"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let row: Value = response.json();
    assert_eq!(row["type"], "buy");
    assert_eq!(row["display"]["label"], "Buy");
    assert_eq!(row["display"]["direction"], "inflow");
    assert_eq!(decimal(&row["totalFiat"]), dec!(1200));

    assert_eq!(fiat_balance(&state, user.id), dec!(3800.00));
    assert_eq!(wallet_balance(&state, user.id, BTC), dec!(0.1));
}

#[tokio::test]
async fn insufficient_funds_is_unprocessable() {
    let state = create_test_app_state();
    let user = seed_user(&state, "dave", false);
    fund_fiat(&state, user.id, dec!(1000.00));
    let token = token_for(&state, &user);
    let server = create_test_server(state.clone());

    let response = server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({
            "cryptoId": BTC,
            "type": "buy",
            "amount": "0.1",
            "price": "12000"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("Insufficient"));
    assert_eq!(fiat_balance(&state, user.id), dec!(1000.00));
}

#[tokio::test]
async fn deposits_and_withdrawals_show_up_newest_first() {
    let state = create_test_app_state();
    let user = seed_user(&state, "erin", false);
    let token = token_for(&state, &user);
    let server = create_test_server(state);

    server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": ETH, "type": "deposit", "amount": "2", "network": "ethereum" }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": ETH, "type": "withdrawal", "amount": "0.5" }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": ETH, "type": "withdrawal", "amount": "5" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let list: Value = server
        .get("/api/transactions")
        .authorization_bearer(&token)
        .await
        .json();
    let rows = list["transactions"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "withdrawal");
    assert_eq!(rows[1]["type"], "deposit");
    assert_eq!(rows[1]["network"], "ethereum");

    let limited: Value = server
        .get("/api/transactions?limit=1")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(limited["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn users_cannot_submit_admin_kinds() {
    let state = create_test_app_state();
    let user = seed_user(&state, "frank", false);
    let token = token_for(&state, &user);
    let server = create_test_server(state);

    server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": BTC, "type": "admin_credit", "amount": "10" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_reject_ordinary_users() {
    let state = create_test_app_state();
    let user = seed_user(&state, "grace", false);
    let token = token_for(&state, &user);
    let server = create_test_server(state);

    for path in ["/api/admin/users", "/api/admin/transactions", "/api/admin/stats"] {
        server
            .get(path)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    server
        .post(&format!("/api/admin/users/{}/credit", user.id))
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": BTC, "amount": "1" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_credit_and_clamped_debit() {
    let state = create_test_app_state();
    let admin = seed_user(&state, "root", true);
    let user = seed_user(&state, "heidi", false);
    let token = token_for(&state, &admin);
    let server = create_test_server(state.clone());

    let credit: Value = server
        .post(&format!("/api/admin/users/{}/credit", user.id))
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": ETH, "amount": "1.5", "description": "promo" }))
        .await
        .json();
    assert_eq!(credit["message"], "Wallet credited by 1.5");
    assert_eq!(decimal(&credit["balance"]), dec!(1.5));
    assert_eq!(credit["transaction"]["type"], "admin_credit");
    assert_eq!(credit["transaction"]["adminId"], admin.id.to_string());

    let debit: Value = server
        .post(&format!("/api/admin/users/{}/debit", user.id))
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": ETH, "amount": 4 }))
        .await
        .json();
    assert_eq!(debit["message"], "Wallet debited by 1.5");
    assert_eq!(decimal(&debit["balance"]), dec!(0));
    assert_eq!(decimal(&debit["transaction"]["amount"]), dec!(4));
    assert_eq!(decimal(&debit["transaction"]["appliedAmount"]), dec!(1.5));

    assert_eq!(wallet_balance(&state, user.id, ETH), dec!(0));
}

#[tokio::test]
async fn admin_adjusting_unknown_user_is_not_found() {
    let state = create_test_app_state();
    let admin = seed_user(&state, "root", true);
    let token = token_for(&state, &admin);
    let server = create_test_server(state);

    server
        .post(&format!("/api/admin/users/{}/credit", uuid::Uuid::new_v4()))
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": BTC, "amount": "1" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_listings_and_stats() {
    let state = create_test_app_state();
    let admin = seed_user(&state, "root", true);
    let user = seed_user(&state, "ivan", false);
    fund_fiat(&state, user.id, dec!(10000));
    let admin_token = token_for(&state, &admin);
    let user_token = token_for(&state, &user);
    let server = create_test_server(state);

    server
        .post(&format!("/api/admin/users/{}/credit", user.id))
        .authorization_bearer(&admin_token)
        .json(&json!({ "cryptoId": BTC, "amount": "1" }))
        .await
        .assert_status_ok();

    server
        .post("/api/transactions")
        .authorization_bearer(&user_token)
        .json(&json!({ "cryptoId": BTC, "type": "sell", "amount": "0.5", "price": "1000" }))
        .await
        .assert_status(StatusCode::CREATED);

    let users: Value = server
        .get("/api/admin/users")
        .authorization_bearer(&admin_token)
        .await
        .json();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    let ivan = users.iter().find(|u| u["username"] == "ivan").unwrap();
    assert_eq!(ivan["wallets"].as_array().unwrap().len(), 6);
    assert_eq!(ivan["transactions"].as_array().unwrap().len(), 2);

    let all: Value = server
        .get("/api/admin/transactions")
        .authorization_bearer(&admin_token)
        .await
        .json();
    let rows = all["transactions"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "sell");

    let stats: Value = server
        .get("/api/admin/stats")
        .authorization_bearer(&admin_token)
        .await
        .json();
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["adminUsers"], 1);
    assert_eq!(stats["totalTransactions"], 2);
    assert_eq!(stats["transactionsByType"]["admin_credit"], 1);
    assert_eq!(stats["transactionsByType"]["sell"], 1);
    assert_eq!(decimal(&stats["tradeVolume"]["ZAR"]), dec!(500));
}

#[tokio::test]
async fn fractional_json_numbers_are_refused_for_amounts() {
    let state = create_test_app_state();
    let user = seed_user(&state, "judy", false);
    fund_fiat(&state, user.id, dec!(5000));
    let token = token_for(&state, &user);
    let server = create_test_server(state.clone());

    let response = server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({ "cryptoId": BTC, "type": "buy", "amount": 0.1, "price": "12000" }))
        .await;
    assert!(response.status_code().is_client_error());

    server
        .post("/api/transactions")
        .authorization_bearer(&token)
        .json(&json!({
            "cryptoId": BTC,
            "type": "deposit",
            "amount": "0.12345678901234567891234567891"
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(fiat_balance(&state, user.id), dec!(5000));
    assert_eq!(wallet_balance(&state, user.id, BTC), dec!(0));
}
