use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use vaultex_core::app_state::AppState;
use vaultex_core::services::market_service::MarketService;

/// Handles to the periodic market tasks.
pub struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn spawn(state: Arc<AppState>) -> Self {
        let refresh_every = state.config.price_feed.refresh_interval;
        let broadcast_every = state.config.price_feed.broadcast_interval;

        let state_clone = state.clone();
        let refresh = tokio::spawn(async move {
            info!("Starting market refresh task (every {:?})", refresh_every);
            refresh_prices(state_clone, refresh_every).await;
        });

        let broadcast = tokio::spawn(async move {
            info!("Starting market broadcast task (every {:?})", broadcast_every);
            broadcast_prices(state, broadcast_every).await;
        });

        info!("Background market tasks spawned");
        Self {
            handles: vec![refresh, broadcast],
        }
    }

    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            // cancelled tasks resolve to a JoinError, which is expected here
            let _ = handle.await;
        }
        info!("Background market tasks stopped");
    }
}

async fn refresh_prices(state: Arc<AppState>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // startup already ran a refresh
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match MarketService::refresh(&state).await {
            Ok(rows) => debug!(rows = rows.len(), "Market refresh tick complete"),
            Err(e) => error!("Market refresh failed: {}", e),
        }
    }
}

async fn broadcast_prices(state: Arc<AppState>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match MarketService::broadcast(&state).await {
            Ok(0) => debug!("No push connections for market broadcast"),
            Ok(n) => debug!("Market data pushed to {} connections", n),
            Err(e) => error!("Market broadcast failed: {}", e),
        }
    }
}
