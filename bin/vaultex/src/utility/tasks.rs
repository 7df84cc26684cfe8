use crate::observability::metrics::attach_metrics;
use axum::Router;
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use eyre::Report;
use http::HeaderValue;
use std::env;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use vaultex_core::app_state::AppState;
use vaultex_core::services::market_service::MarketService;
use vaultex_primitives::models::entities::default_cryptocurrencies;

pub fn build_cors() -> Result<CorsLayer, Report> {
    let origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());

    let allowed_origins = origins
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| eyre::eyre!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(allowed_origins))
}

pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    } else {
        info!("No .env file found, using system environment");
    }
}

pub fn build_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Result<Router, Report> {
    let cors = build_cors()?;
    let router = vaultex_api::app::create_router(state);

    Ok(attach_metrics(router, metric_layer, metric_handle).layer(cors))
}

/// Seeds the reference cryptocurrencies, warms the market cache and makes a
/// first attempt at live prices. A price feed outage is not fatal.
pub async fn initialize_system(state: &Arc<AppState>) -> Result<(), Report> {
    let added = state
        .ledger
        .seed_cryptocurrencies(&default_cryptocurrencies())
        .map_err(|e| eyre::eyre!("Failed to seed cryptocurrencies: {}", e))?;
    info!(added, "Cryptocurrencies seeded");

    MarketService::initialize(state)
        .await
        .map_err(|e| eyre::eyre!("Failed to initialize market data: {}", e))?;

    if let Err(e) = MarketService::refresh(state).await {
        warn!(
            "Initial market refresh failed: {}. Serving cached prices.",
            e
        );
    }

    Ok(())
}
