use axum::{
    extract::{Extension, Json, State},
};
use std::sync::Arc;
use validator::Validate;
use vaultex_core::services::profile_service::ProfileService;
use vaultex_core::{AppState, Claims};
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::auth_dto::{UpdateProfileRequest, UserDto};
use vaultex_primitives::models::dtos::profile_dto::UserProfileResponse;

#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Profile with wallets, fiat balances and recent history", body = UserProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearerAuth" = [])),
    tag = "Users"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let user_id = claims.user_id()?;
    let profile = ProfileService::get_profile(&state, user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserDto>, ApiError> {
    payload.validate()?;

    let user_id = claims.user_id()?;
    let user = ProfileService::update_profile(&state, user_id, payload).await?;
    Ok(Json(user))
}
