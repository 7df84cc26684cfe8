use diesel::{Identifiable, Insertable, Queryable};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Insertable, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::cryptocurrencies)]
#[serde(rename_all = "camelCase")]
pub struct Cryptocurrency {
    pub id: i32,
    pub symbol: String,
    pub name: String,
    /// Identifier of the asset at the external price feed.
    #[serde(skip_serializing)]
    pub feed_id: String,
    pub is_active: bool,
}

impl Cryptocurrency {
    pub fn new(id: i32, symbol: &str, name: &str, feed_id: &str) -> Self {
        Self {
            id,
            symbol: symbol.to_string(),
            name: name.to_string(),
            feed_id: feed_id.to_string(),
            is_active: true,
        }
    }
}

/// Reference assets seeded at startup.
pub fn default_cryptocurrencies() -> Vec<Cryptocurrency> {
    vec![
        Cryptocurrency::new(1, "BTC", "Bitcoin", "bitcoin"),
        Cryptocurrency::new(2, "ETH", "Ethereum", "ethereum"),
        Cryptocurrency::new(3, "USDT", "Tether", "tether"),
        Cryptocurrency::new(4, "BNB", "BNB", "binancecoin"),
        Cryptocurrency::new(5, "SOL", "Solana", "solana"),
        Cryptocurrency::new(6, "XRP", "XRP", "ripple"),
    ]
}
