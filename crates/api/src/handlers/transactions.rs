use axum::{
    extract::{Extension, Json, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;
use vaultex_core::services::transaction_service::TransactionService;
use vaultex_core::{AppState, Claims};
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::transaction_dto::{
    CreateTransactionRequest, TransactionDto, TransactionListQuery, TransactionsResponse,
};

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(("limit" = Option<i64>, Query, description = "Maximum rows, default 50")),
    responses(
        (status = 200, description = "Caller's transactions, newest first", body = TransactionsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let user_id = claims.user_id()?;
    let rows = TransactionService::list_for_user(&state, user_id, query.limit).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionDto),
        (status = 400, description = "Invalid amount, price or total"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No wallet for this cryptocurrency"),
        (status = 422, description = "Insufficient balance")
    ),
    security(("bearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionDto>), ApiError> {
    payload.validate().map_err(|e| {
        warn!("transactions.create: validation failed: {}", e);
        ApiError::Validation(e)
    })?;

    let user_id = claims.user_id()?;
    let transaction = TransactionService::create(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
