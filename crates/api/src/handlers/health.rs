use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::error;
use vaultex_core::AppState;
use vaultex_primitives::models::dtos::auth_dto::HealthStatus;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check endpoint",
    description = "Reports whether the ledger store answers. Public.",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "Ledger store unreachable", body = HealthStatus),
    ),
    security(()),
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthStatus>) {
    match state.ledger.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: StatusCode::OK.to_string(),
                message: "API is healthy".to_string(),
            }),
        ),
        Err(e) => {
            error!("Health check storage ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: StatusCode::SERVICE_UNAVAILABLE.to_string(),
                    message: "Ledger store unavailable".to_string(),
                }),
            )
        }
    }
}
