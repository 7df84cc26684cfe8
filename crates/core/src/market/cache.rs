use std::collections::BTreeMap;
use std::sync::RwLock;
use vaultex_primitives::models::entities::MarketData;

/// Latest known quote per cryptocurrency id.
#[derive(Debug, Default)]
pub struct MarketDataCache {
    quotes: RwLock<BTreeMap<i32, MarketData>>,
}

impl MarketDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered by cryptocurrency id.
    pub fn snapshot(&self) -> Vec<MarketData> {
        match self.quotes.read() {
            Ok(quotes) => quotes.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().values().cloned().collect(),
        }
    }

    pub fn get(&self, crypto_id: i32) -> Option<MarketData> {
        match self.quotes.read() {
            Ok(quotes) => quotes.get(&crypto_id).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&crypto_id).cloned(),
        }
    }

    pub fn replace_all(&self, rows: impl IntoIterator<Item = MarketData>) {
        let fresh: BTreeMap<i32, MarketData> =
            rows.into_iter().map(|row| (row.crypto_id, row)).collect();

        match self.quotes.write() {
            Ok(mut quotes) => *quotes = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.quotes.read() {
            Ok(quotes) => quotes.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }
}
