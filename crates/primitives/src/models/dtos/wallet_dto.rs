use crate::models::entities::cryptocurrency::Cryptocurrency;
use crate::models::entities::enum_types::FiatCurrency;
use crate::models::entities::fiat_balance::FiatBalance;
use crate::models::entities::wallet::Wallet;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletDto {
    pub id: Uuid,
    pub crypto_id: i32,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub balance: Decimal,
    pub address: String,
}

impl WalletDto {
    pub fn new(wallet: &Wallet, crypto: Option<&Cryptocurrency>) -> Self {
        Self {
            id: wallet.id,
            crypto_id: wallet.crypto_id,
            symbol: crypto.map(|c| c.symbol.clone()),
            name: crypto.map(|c| c.name.clone()),
            balance: wallet.balance.normalize(),
            address: wallet.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiatBalanceDto {
    pub currency: FiatCurrency,
    pub balance: Decimal,
}

impl From<&FiatBalance> for FiatBalanceDto {
    fn from(fiat: &FiatBalance) -> Self {
        Self {
            currency: fiat.currency,
            balance: fiat.balance.normalize(),
        }
    }
}
