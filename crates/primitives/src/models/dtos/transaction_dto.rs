use crate::models::entities::enum_types::{
    FiatCurrency, KindDisplay, TransactionKind, TransactionStatus,
};
use crate::models::entities::transaction::Transaction;
use crate::utility::DecimalInput;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub crypto_id: i32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub applied_amount: Decimal,
    pub price: Option<Decimal>,
    pub fiat_currency: Option<FiatCurrency>,
    pub total_fiat: Option<Decimal>,
    pub status: TransactionStatus,
    pub admin_id: Option<Uuid>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub network: Option<String>,
    pub wallet_address: Option<String>,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub display: KindDisplay,
}

impl From<&Transaction> for TransactionDto {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            crypto_id: tx.crypto_id,
            kind: tx.kind,
            amount: tx.amount.normalize(),
            applied_amount: tx.applied_amount.normalize(),
            price: tx.price.map(|p| p.normalize()),
            fiat_currency: tx.fiat_currency,
            total_fiat: tx.total_fiat.map(|t| t.normalize()),
            status: tx.status,
            admin_id: tx.admin_id,
            description: tx.description.clone(),
            payment_method: tx.payment_method.clone(),
            network: tx.network.clone(),
            wallet_address: tx.wallet_address.clone(),
            tx_hash: tx.tx_hash.clone(),
            created_at: tx.created_at,
            display: tx.kind.display(),
        }
    }
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        TransactionDto::from(&tx)
    }
}

/// Body of `POST /api/transactions`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub crypto_id: i32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[schema(value_type = String, example = "0.1")]
    pub amount: DecimalInput,
    #[schema(value_type = Option<String>, example = "12000")]
    pub price: Option<DecimalInput>,
    #[schema(value_type = Option<String>, example = "1200.00")]
    pub total_fiat: Option<DecimalInput>,
    pub fiat_currency: Option<FiatCurrency>,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    #[validate(length(max = 64))]
    pub network: Option<String>,
    #[validate(length(max = 128))]
    pub wallet_address: Option<String>,
    #[validate(length(max = 128))]
    pub tx_hash: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionDto>,
}
