use crate::models::entities::enum_types::{FiatCurrency, TransactionKind, TransactionStatus};
use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Immutable ledger row. Never updated or deleted once written.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub crypto_id: i32,
    pub kind: TransactionKind,
    /// Magnitude the caller asked for.
    pub amount: Decimal,
    /// Magnitude actually applied to the wallet; smaller than `amount` only
    /// for clamped administrator debits.
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
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub crypto_id: i32,
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
}

impl NewTransaction {
    pub fn completed(
        user_id: Uuid,
        crypto_id: i32,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Self {
        Self {
            user_id,
            crypto_id,
            kind,
            amount,
            applied_amount: amount,
            price: None,
            fiat_currency: None,
            total_fiat: None,
            status: TransactionStatus::Completed,
            admin_id: None,
            description: None,
            payment_method: None,
            network: None,
            wallet_address: None,
            tx_hash: None,
        }
    }
}
