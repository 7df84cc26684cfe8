use axum::extract::{Json, State};
use std::sync::Arc;
use validator::Validate;
use vaultex_core::services::auth_service::LoginService;
use vaultex_core::AppState;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::auth_dto::{AuthResponse, LoginRequest};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or disabled account"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let response = LoginService::login(&state, payload).await?;
    Ok(Json(response))
}
