use crate::app_state::AppState;
use crate::market::fallback_quote;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{error, info, warn};
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::market_dto::MarketDataDto;
use vaultex_primitives::models::dtos::notification_dto::ServerEvent;
use vaultex_primitives::models::entities::{Cryptocurrency, MarketData};

pub struct MarketService;

impl MarketService {
    /// Warms the cache from storage, filling gaps from the built-in table.
    pub async fn initialize(state: &AppState) -> Result<usize, ApiError> {
        let cryptos = state.ledger.get_cryptocurrencies()?;
        let stored: HashMap<i32, MarketData> = state
            .ledger
            .list_market_data()?
            .into_iter()
            .map(|row| (row.crypto_id, row))
            .collect();

        let mut rows = Vec::with_capacity(cryptos.len());
        for crypto in &cryptos {
            let row = match stored.get(&crypto.id) {
                Some(row) => row.clone(),
                None => {
                    let row = fallback_quote(crypto);
                    Self::persist(state, &row);
                    row
                }
            };
            rows.push(row);
        }

        state.market.replace_all(rows);
        info!(assets = cryptos.len(), "market: cache initialized");
        Ok(cryptos.len())
    }

    /// Pulls fresh quotes. Assets the feed can't price keep their last known
    /// quote, or the built-in one if there is none. A feed outage never
    /// fails the refresh.
    pub async fn refresh(state: &AppState) -> Result<Vec<MarketDataDto>, ApiError> {
        let cryptos = state.ledger.get_cryptocurrencies()?;
        let feed_ids: Vec<&str> = cryptos.iter().map(|c| c.feed_id.as_str()).collect();

        let quotes = match state.price_feed.fetch_quotes(&feed_ids).await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(error = %e, "market: price feed unavailable, keeping cached prices");
                HashMap::new()
            }
        };

        let now = Utc::now();
        let mut fresh = 0;
        let rows: Vec<MarketData> = cryptos
            .iter()
            .map(|crypto| match quotes.get(&crypto.feed_id) {
                Some(quote) => {
                    fresh += 1;
                    let row = MarketData {
                        crypto_id: crypto.id,
                        price_zar: quote.price_zar,
                        price_usd: quote.price_usd,
                        change_24h: quote.change_24h,
                        volume_24h: quote.volume_24h,
                        market_cap: quote.market_cap,
                        last_updated: now,
                    };
                    Self::persist(state, &row);
                    row
                }
                None => state
                    .market
                    .get(crypto.id)
                    .unwrap_or_else(|| fallback_quote(crypto)),
            })
            .collect();

        state.market.replace_all(rows);
        info!(fresh, total = cryptos.len(), "market: refresh complete");

        let snapshot = Self::dtos(&cryptos, state.market.snapshot());
        Self::broadcast_snapshot(state, snapshot.clone());
        Ok(snapshot)
    }

    /// Cached quotes for active cryptocurrencies, ordered by id. Never
    /// touches the feed.
    pub async fn get_market_data(state: &AppState) -> Result<Vec<MarketDataDto>, ApiError> {
        let cryptos = state.ledger.get_cryptocurrencies()?;
        Ok(Self::dtos(&cryptos, state.market.snapshot()))
    }

    pub async fn get_market_data_for(
        state: &AppState,
        crypto_id: i32,
    ) -> Result<MarketDataDto, ApiError> {
        let crypto = state.ledger.get_cryptocurrency(crypto_id)?;
        state
            .market
            .get(crypto_id)
            .map(|row| MarketDataDto::new(&row, crypto.as_ref()))
            .ok_or_else(|| {
                ApiError::NotFound(format!("No market data for cryptocurrency {}", crypto_id))
            })
    }

    pub async fn broadcast(state: &AppState) -> Result<usize, ApiError> {
        let snapshot = Self::get_market_data(state).await?;
        Ok(Self::broadcast_snapshot(state, snapshot))
    }

    fn broadcast_snapshot(state: &AppState, snapshot: Vec<MarketDataDto>) -> usize {
        state.hub.broadcast(ServerEvent::MarketDataUpdate(snapshot))
    }

    fn dtos(cryptos: &[Cryptocurrency], rows: Vec<MarketData>) -> Vec<MarketDataDto> {
        rows.iter()
            .filter_map(|row| {
                cryptos
                    .iter()
                    .find(|c| c.id == row.crypto_id)
                    .map(|crypto| MarketDataDto::new(row, Some(crypto)))
            })
            .collect()
    }

    fn persist(state: &AppState, row: &MarketData) {
        if let Err(e) = state.ledger.upsert_market_data(row) {
            error!(crypto_id = row.crypto_id, error = %e, "market: failed to store quote");
        }
    }
}
