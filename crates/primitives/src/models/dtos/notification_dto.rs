use crate::models::dtos::market_dto::MarketDataDto;
use crate::models::dtos::transaction_dto::TransactionDto;
use crate::models::entities::enum_types::FiatCurrency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server → client envelope: `{ "type": ..., "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Authenticated(AuthenticatedAck),
    MarketDataUpdate(Vec<MarketDataDto>),
    BalanceUpdate(BalanceUpdate),
    TransactionUpdate(TransactionDto),
    AdminNotification(AdminNotice),
    Error(ErrorNotice),
    Pong,
}

impl ServerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Authenticated(_) => "authenticated",
            ServerEvent::MarketDataUpdate(_) => "market_data_update",
            ServerEvent::BalanceUpdate(_) => "balance_update",
            ServerEvent::TransactionUpdate(_) => "transaction_update",
            ServerEvent::AdminNotification(_) => "admin_notification",
            ServerEvent::Error(_) => "error",
            ServerEvent::Pong => "pong",
        }
    }
}

/// Client → server envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Authenticate(AuthenticatePayload),
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatePayload {
    pub user_id: Uuid,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedAck {
    pub user_id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    pub user_id: Uuid,
    pub crypto_id: i32,
    pub wallet_balance: Decimal,
    pub fiat_currency: Option<FiatCurrency>,
    pub fiat_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotice {
    pub message: String,
    pub user_id: Uuid,
    pub transaction: TransactionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}
