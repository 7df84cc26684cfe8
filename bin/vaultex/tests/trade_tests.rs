mod common;

use common::*;
use rust_decimal_macros::dec;
use vaultex_core::services::balance_service::{Actor, BalanceService, TransferDetails};
use vaultex_core::services::transaction_service::TransactionService;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::transaction_dto::CreateTransactionRequest;
use vaultex_primitives::models::entities::{FiatCurrency, TradeSide, TransactionKind};

#[tokio::test]
async fn buy_beyond_fiat_balance_is_rejected_and_nothing_changes() {
    let state = create_test_app_state();
    let user = seed_user(&state, "alice", false);
    fund_fiat(&state, user.id, dec!(1000.00));

    let err = BalanceService::execute_trade(
        &state,
        user.id,
        BTC,
        TradeSide::Buy,
        "0.1",
        "12000",
        FiatCurrency::ZAR,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::InsufficientBalance(_)));
    assert_eq!(fiat_balance(&state, user.id), dec!(1000.00));
    assert_eq!(wallet_balance(&state, user.id, BTC), dec!(0));
    assert!(state
        .ledger
        .list_user_transactions(user.id, None)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn buy_moves_fiat_into_crypto_with_one_row() {
    let state = create_test_app_state();
    let user = seed_user(&state, "bob", false);
    fund_fiat(&state, user.id, dec!(5000.00));

    let outcome = BalanceService::execute_trade(
        &state,
        user.id,
        BTC,
        TradeSide::Buy,
        "0.1",
        "12000",
        FiatCurrency::ZAR,
    )
    .await
    .unwrap();

    assert_eq!(fiat_balance(&state, user.id), dec!(3800.00));
    assert_eq!(wallet_balance(&state, user.id, BTC), dec!(0.1));

    let tx = outcome.transaction;
    assert_eq!(tx.kind, TransactionKind::Buy);
    assert_eq!(tx.amount, dec!(0.1));
    assert_eq!(tx.price, Some(dec!(12000)));
    assert_eq!(tx.total_fiat, Some(dec!(1200.00)));
    assert_eq!(tx.fiat_currency, Some(FiatCurrency::ZAR));

    let history = state.ledger.list_user_transactions(user.id, None).unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn sell_needs_crypto_and_credits_fiat() {
    let state = create_test_app_state();
    let user = seed_user(&state, "carol", false);

    let err = BalanceService::execute_trade(
        &state,
        user.id,
        ETH,
        TradeSide::Sell,
        "1",
        "50000",
        FiatCurrency::ZAR,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance(_)));

    BalanceService::credit_wallet(
        &state,
        user.id,
        ETH,
        "2",
        Actor::User(user.id),
        TransferDetails::default(),
    )
    .await
    .unwrap();

    BalanceService::execute_trade(
        &state,
        user.id,
        ETH,
        TradeSide::Sell,
        "0.5",
        "50000",
        FiatCurrency::ZAR,
    )
    .await
    .unwrap();

    assert_eq!(wallet_balance(&state, user.id, ETH), dec!(1.5));
    assert_eq!(fiat_balance(&state, user.id), dec!(25000));
}

#[tokio::test]
async fn trade_in_a_new_currency_opens_its_balance() {
    let state = create_test_app_state();
    let user = seed_user(&state, "dave", false);

    BalanceService::credit_wallet(
        &state,
        user.id,
        BTC,
        "1",
        Actor::User(user.id),
        TransferDetails::default(),
    )
    .await
    .unwrap();

    let outcome = BalanceService::execute_trade(
        &state,
        user.id,
        BTC,
        TradeSide::Sell,
        "0.5",
        "60000",
        FiatCurrency::USD,
    )
    .await
    .unwrap();

    let fiat = outcome.fiat.expect("fiat side");
    assert_eq!(fiat.currency, FiatCurrency::USD);
    assert_eq!(fiat.balance, dec!(30000));
}

#[tokio::test]
async fn request_total_must_match_amount_times_price() {
    let state = create_test_app_state();
    let user = seed_user(&state, "erin", false);
    fund_fiat(&state, user.id, dec!(5000));

    let request: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
        "cryptoId": BTC,
        "type": "buy",
        "amount": "0.1",
        "price": "12000",
        "totalFiat": "1000.00"
    }))
    .unwrap();

    let err = TransactionService::create(&state, user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    assert_eq!(fiat_balance(&state, user.id), dec!(5000));
}

#[tokio::test]
async fn trade_without_price_is_rejected() {
    let state = create_test_app_state();
    let user = seed_user(&state, "frank", false);

    let request: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
        "cryptoId": BTC,
        "type": "sell",
        "amount": 1
    }))
    .unwrap();

    let err = TransactionService::create(&state, user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}
