use axum::extract::{Extension, Json, Path, Query, State};
use std::sync::Arc;
use uuid::Uuid;
use vaultex_core::services::admin_service::{AdminService, Adjustment};
use vaultex_core::{AppState, Claims};
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::admin_dto::{
    AdminAdjustRequest, AdminAdjustResponse, AdminStats, AdminUserDto,
};
use vaultex_primitives::models::dtos::transaction_dto::{
    TransactionListQuery, TransactionsResponse,
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users with wallets, fiat balances and recent history", body = [AdminUserDto]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator access required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminUserDto>>, ApiError> {
    Ok(Json(AdminService::list_users(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/credit",
    params(("id" = Uuid, Path, description = "Target user id")),
    request_body = AdminAdjustRequest,
    responses(
        (status = 200, description = "Wallet credited", body = AdminAdjustResponse),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "User or wallet not found")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn credit_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AdminAdjustRequest>,
) -> Result<Json<AdminAdjustResponse>, ApiError> {
    adjust(&state, &claims, user_id, Adjustment::Credit, payload).await
}

/// Debits clamp at zero; the response reports the amount actually removed.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/debit",
    params(("id" = Uuid, Path, description = "Target user id")),
    request_body = AdminAdjustRequest,
    responses(
        (status = 200, description = "Wallet debited", body = AdminAdjustResponse),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "User or wallet not found")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn debit_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AdminAdjustRequest>,
) -> Result<Json<AdminAdjustResponse>, ApiError> {
    adjust(&state, &claims, user_id, Adjustment::Debit, payload).await
}

async fn adjust(
    state: &AppState,
    claims: &Claims,
    user_id: Uuid,
    direction: Adjustment,
    payload: AdminAdjustRequest,
) -> Result<Json<AdminAdjustResponse>, ApiError> {
    let admin_id = claims.user_id()?;
    let response = AdminService::adjust(state, admin_id, user_id, direction, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    params(("limit" = Option<i64>, Query, description = "Maximum rows, unbounded when absent")),
    responses(
        (status = 200, description = "Every transaction, newest first", body = TransactionsResponse),
        (status = 403, description = "Administrator access required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    Ok(Json(
        AdminService::list_transactions(&state, query.limit).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Aggregate user and transaction figures", body = AdminStats),
        (status = 403, description = "Administrator access required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<AdminStats>, ApiError> {
    Ok(Json(AdminService::stats(&state).await?))
}
