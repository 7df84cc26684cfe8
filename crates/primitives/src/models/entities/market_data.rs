use crate::models::entities::enum_types::FiatCurrency;
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::Serialize;

/// Latest quote for one cryptocurrency. Overwritten in place on refresh.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Insertable, AsChangeset, Serialize,
)]
#[diesel(table_name = crate::schema::market_data)]
#[diesel(primary_key(crypto_id))]
pub struct MarketData {
    pub crypto_id: i32,
    pub price_zar: Decimal,
    pub price_usd: Decimal,
    pub change_24h: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl MarketData {
    pub fn price_in(&self, currency: FiatCurrency) -> Decimal {
        match currency {
            FiatCurrency::ZAR => self.price_zar,
            FiatCurrency::USD => self.price_usd,
        }
    }
}
