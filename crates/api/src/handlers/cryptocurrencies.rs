use axum::{extract::State, Json};
use std::sync::Arc;
use vaultex_core::AppState;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::Cryptocurrency;

#[utoipa::path(
    get,
    path = "/api/cryptocurrencies",
    responses(
        (status = 200, description = "Active cryptocurrencies ordered by id", body = [Cryptocurrency]),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Market"
)]
pub async fn list_cryptocurrencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Cryptocurrency>>, ApiError> {
    Ok(Json(state.ledger.get_cryptocurrencies()?))
}
