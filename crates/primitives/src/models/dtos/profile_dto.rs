use crate::models::dtos::auth_dto::UserDto;
use crate::models::dtos::transaction_dto::TransactionDto;
use crate::models::dtos::wallet_dto::{FiatBalanceDto, WalletDto};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user: UserDto,
    pub wallets: Vec<WalletDto>,
    /// Balance in the platform's default fiat currency.
    pub fiat_balance: FiatBalanceDto,
    pub fiat_balances: Vec<FiatBalanceDto>,
    pub transactions: Vec<TransactionDto>,
}
