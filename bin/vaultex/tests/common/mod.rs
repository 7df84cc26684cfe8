#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use diesel::RunQueryDsl;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use vaultex_core::app_state::{AppConfig, AppState};
use vaultex_core::repositories::{run_atomic, LedgerStore, MemoryLedgerStore, PgLedgerStore};
use vaultex_core::SecurityConfig;
use vaultex_primitives::models::app_state::jwt_details::JWTInfo;
use vaultex_primitives::models::app_state::price_feed_details::PriceFeedInfo;
use vaultex_primitives::models::entities::{
    default_cryptocurrencies, FiatCurrency, NewWallet, UpsertUser, User,
};

pub const BTC: i32 = 1;
pub const ETH: i32 = 2;

/// Nothing listens on the discard port, so feed calls fail fast.
pub const DEAD_FEED_URL: &str = "http://127.0.0.1:9/api/v3";

pub fn test_config(feed_url: &str) -> AppConfig {
    AppConfig {
        app_env: "test".to_string(),
        jwt_details: JWTInfo {
            jwt_secret: SecretString::from("test_secret_key_minimum_32_characters_long_for_testing"),
            jwt_expiration_hours: 2,
            jwt_issuer: "vaultex".to_string(),
            jwt_audience: "vaultex_api".to_string(),
        },
        price_feed: PriceFeedInfo {
            api_url: feed_url.to_string(),
            api_key: None,
            refresh_interval: Duration::from_secs(60),
            broadcast_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(2),
        },
        default_fiat: FiatCurrency::ZAR,
        ws_require_token: false,
    }
}

/// Fresh in-memory ledger with the reference cryptocurrencies seeded.
pub fn create_test_app_state() -> Arc<AppState> {
    create_test_app_state_with(test_config(DEAD_FEED_URL))
}

pub fn create_test_app_state_with(config: AppConfig) -> Arc<AppState> {
    vaultex::utility::logging::setup_logging();

    let ledger: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
    ledger
        .seed_cryptocurrencies(&default_cryptocurrencies())
        .expect("seed cryptocurrencies");

    AppState::new(ledger, config).expect("build app state")
}

/// PostgreSQL-backed state on `TEST_DATABASE_URL`, emptied and reseeded.
/// `None` when the variable is unset so database tests skip themselves.
pub fn create_pg_test_app_state() -> Option<Arc<AppState>> {
    let Some(url) = std::env::var("TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
    else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL ledger test");
        return None;
    };

    vaultex::utility::logging::setup_logging();

    let pool = vaultex::utility::db_pool::create_db_pool(&SecretString::from(url))
        .expect("create test database pool");
    vaultex::utility::db_pool::run_migrations(&pool).expect("run migrations");

    let mut conn = pool.get().expect("test database connection");
    diesel::sql_query(
        "TRUNCATE transactions, wallets, fiat_balances, market_data, users, cryptocurrencies CASCADE",
    )
    .execute(&mut *conn)
    .expect("reset test database");
    drop(conn);

    let ledger: Arc<dyn LedgerStore> = Arc::new(PgLedgerStore::new(pool));
    ledger
        .seed_cryptocurrencies(&default_cryptocurrencies())
        .expect("seed cryptocurrencies");

    Some(AppState::new(ledger, test_config(DEAD_FEED_URL)).expect("build app state"))
}

pub fn create_test_app(state: Arc<AppState>) -> Router {
    vaultex_api::app::create_router(state)
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    TestServer::new(create_test_app(state)).expect("start test server")
}

/// Serves the router on an ephemeral port for real socket clients.
pub async fn spawn_http_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let app = create_test_app(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    addr
}

/// Inserts a user with one empty wallet per cryptocurrency and an empty ZAR
/// balance, skipping password hashing.
pub fn seed_user(state: &AppState, username: &str, is_admin: bool) -> User {
    let record = UpsertUser {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "not-a-real-hash".to_string(),
        first_name: None,
        last_name: None,
        country: None,
        city: None,
        is_admin,
        is_active: true,
    };

    run_atomic(state.ledger.as_ref(), |tx| {
        let user = tx.insert_user(&record)?;
        for crypto in tx.active_cryptocurrencies()? {
            tx.create_wallet(&NewWallet {
                user_id: user.id,
                crypto_id: crypto.id,
                address: format!("test-{}-{}", crypto.symbol, user.id),
            })?;
        }
        tx.lock_fiat_balance(user.id, FiatCurrency::ZAR)?;
        Ok(user)
    })
    .expect("seed user")
}

pub fn token_for(state: &AppState, user: &User) -> String {
    SecurityConfig::create_token(state, user).expect("create token")
}

pub fn wallet_balance(state: &AppState, user_id: Uuid, crypto_id: i32) -> Decimal {
    state
        .ledger
        .get_wallet(user_id, crypto_id)
        .expect("read wallet")
        .expect("wallet exists")
        .balance
}

pub fn fiat_balance(state: &AppState, user_id: Uuid) -> Decimal {
    state
        .ledger
        .get_fiat_balance(user_id, FiatCurrency::ZAR)
        .expect("read fiat balance")
        .balance
}

pub fn fund_fiat(state: &AppState, user_id: Uuid, amount: Decimal) {
    state
        .ledger
        .set_fiat_balance(user_id, FiatCurrency::ZAR, amount)
        .expect("fund fiat balance");
}

pub fn make_admin(state: &AppState, user: &User) -> User {
    let mut record = UpsertUser::from(user);
    record.is_admin = true;
    state.ledger.upsert_user(&record).expect("promote user")
}

/// Registers through the HTTP surface and returns `(token, user json)`.
pub async fn register_user(server: &TestServer, username: &str, password: &str) -> (String, Value) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        }))
        .await;

    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    let token = body["token"].as_str().expect("token").to_string();
    (token, body["user"].clone())
}
