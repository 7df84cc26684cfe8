use crate::models::entities::cryptocurrency::Cryptocurrency;
use crate::models::entities::market_data::MarketData;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataDto {
    pub crypto_id: i32,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price_zar: Decimal,
    pub price_usd: Decimal,
    pub change_24h: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl MarketDataDto {
    pub fn new(data: &MarketData, crypto: Option<&Cryptocurrency>) -> Self {
        Self {
            crypto_id: data.crypto_id,
            symbol: crypto.map(|c| c.symbol.clone()),
            name: crypto.map(|c| c.name.clone()),
            price_zar: data.price_zar.normalize(),
            price_usd: data.price_usd.normalize(),
            change_24h: data.change_24h.normalize(),
            volume_24h: data.volume_24h.normalize(),
            market_cap: data.market_cap.normalize(),
            last_updated: data.last_updated,
        }
    }
}
