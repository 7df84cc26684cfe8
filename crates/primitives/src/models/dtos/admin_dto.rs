use crate::models::dtos::auth_dto::UserDto;
use crate::models::dtos::transaction_dto::TransactionDto;
use crate::models::dtos::wallet_dto::{FiatBalanceDto, WalletDto};
use crate::models::entities::enum_types::TransactionKind;
use crate::utility::DecimalInput;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Body of the administrator credit/debit endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAdjustRequest {
    pub crypto_id: i32,
    #[schema(value_type = String, example = "1.5")]
    pub amount: DecimalInput,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAdjustResponse {
    pub message: String,
    pub balance: Decimal,
    pub transaction: TransactionDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub wallets: Vec<WalletDto>,
    pub fiat_balances: Vec<FiatBalanceDto>,
    pub transactions: Vec<TransactionDto>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub active_users: usize,
    pub admin_users: usize,
    pub total_transactions: usize,
    pub transactions_by_type: BTreeMap<TransactionKind, usize>,
    pub amount_by_type: BTreeMap<TransactionKind, Decimal>,
    /// Sum of `totalFiat` over buy and sell rows, per fiat currency code.
    pub trade_volume: BTreeMap<String, Decimal>,
}
