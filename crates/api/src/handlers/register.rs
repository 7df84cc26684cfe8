use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;
use vaultex_core::services::auth_service::RegisterService;
use vaultex_core::AppState;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::auth_dto::{AuthResponse, RegisterRequest};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or username already taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let payload = payload.normalize();

    payload.validate().map_err(|e| {
        warn!("auth.register: validation failed: {}", e);
        ApiError::Validation(e)
    })?;

    let response = RegisterService::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
