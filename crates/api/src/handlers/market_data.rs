use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use vaultex_core::services::market_service::MarketService;
use vaultex_core::AppState;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::market_dto::MarketDataDto;

/// Served from the in-process cache; never waits on the price feed.
#[utoipa::path(
    get,
    path = "/api/market-data",
    responses(
        (status = 200, description = "Cached market data for every active cryptocurrency", body = [MarketDataDto])
    ),
    tag = "Market"
)]
pub async fn get_market_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MarketDataDto>>, ApiError> {
    Ok(Json(MarketService::get_market_data(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/market-data/{crypto_id}",
    params(("crypto_id" = i32, Path, description = "Cryptocurrency id")),
    responses(
        (status = 200, description = "Cached market data row", body = MarketDataDto),
        (status = 404, description = "Unknown cryptocurrency or no quote yet")
    ),
    tag = "Market"
)]
pub async fn get_market_data_for(
    State(state): State<Arc<AppState>>,
    Path(crypto_id): Path<i32>,
) -> Result<Json<MarketDataDto>, ApiError> {
    Ok(Json(
        MarketService::get_market_data_for(&state, crypto_id).await?,
    ))
}
