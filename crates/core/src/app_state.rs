use crate::clients::PriceFeedClient;
use crate::market::MarketDataCache;
use crate::notifications::NotificationHub;
use crate::repositories::LedgerStore;
use eyre::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use vaultex_primitives::models::app_state::AppConfig;

pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub http_client: Client,
    pub config: AppConfig,
    pub price_feed: PriceFeedClient,
    pub market: MarketDataCache,
    pub hub: NotificationHub,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerStore>, config: AppConfig) -> Result<Arc<Self>> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let price_feed = PriceFeedClient::new(
            http.clone(),
            &config.price_feed.api_url,
            config.price_feed.api_key.clone(),
            config.price_feed.request_timeout,
        )?;

        Ok(Arc::new(Self {
            ledger,
            http_client: http,
            config,
            price_feed,
            market: MarketDataCache::new(),
            hub: NotificationHub::new(),
        }))
    }
}
