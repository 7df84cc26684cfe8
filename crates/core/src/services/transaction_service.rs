use crate::app_state::AppState;
use crate::services::balance_service::{Actor, BalanceService, TransferDetails};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::transaction_dto::{
    CreateTransactionRequest, TransactionDto, TransactionsResponse,
};
use vaultex_primitives::models::entities::{TradeSide, TransactionKind};

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 500;

pub struct TransactionService;

impl TransactionService {
    pub async fn list_for_user(
        state: &AppState,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<TransactionsResponse, ApiError> {
        let limit = Self::clamp_limit(limit);
        let rows = state.ledger.list_user_transactions(user_id, Some(limit))?;

        Ok(TransactionsResponse {
            transactions: rows.iter().map(TransactionDto::from).collect(),
        })
    }

    /// Routes a user request to the matching balance operation.
    pub async fn create(
        state: &AppState,
        user_id: Uuid,
        req: CreateTransactionRequest,
    ) -> Result<TransactionDto, ApiError> {
        let amount = req.amount.raw();
        let details = TransferDetails {
            description: req.description,
            payment_method: req.payment_method,
            network: req.network,
            wallet_address: req.wallet_address,
            tx_hash: req.tx_hash,
        };

        let outcome = match req.kind {
            TransactionKind::Buy | TransactionKind::Sell => {
                let side = if req.kind == TransactionKind::Buy {
                    TradeSide::Buy
                } else {
                    TradeSide::Sell
                };

                let price = req
                    .price
                    .as_ref()
                    .ok_or_else(|| ApiError::BadRequest("price is required for trades".into()))?;

                if let Some(total_fiat) = &req.total_fiat {
                    Self::check_total(
                        req.amount.to_positive()?,
                        price.to_positive()?,
                        total_fiat.to_decimal()?,
                    )?;
                }

                BalanceService::execute_trade(
                    state,
                    user_id,
                    req.crypto_id,
                    side,
                    &amount,
                    &price.raw(),
                    req.fiat_currency.unwrap_or(state.config.default_fiat),
                )
                .await?
            }
            TransactionKind::Deposit => {
                BalanceService::credit_wallet(
                    state,
                    user_id,
                    req.crypto_id,
                    &amount,
                    Actor::User(user_id),
                    details,
                )
                .await?
            }
            TransactionKind::Withdrawal => {
                BalanceService::debit_wallet(
                    state,
                    user_id,
                    req.crypto_id,
                    &amount,
                    Actor::User(user_id),
                    details,
                )
                .await?
            }
            TransactionKind::AdminCredit | TransactionKind::AdminDebit => {
                warn!(
                    user_id = %user_id,
                    kind = %req.kind,
                    "transactions.create: admin kind from user route"
                );
                return Err(ApiError::Forbidden(
                    "Administrator adjustments use the admin endpoints".into(),
                ));
            }
        };

        Ok(TransactionDto::from(&outcome.transaction))
    }

    /// A client-supplied total must agree with `amount * price` to the cent.
    fn check_total(amount: Decimal, price: Decimal, claimed: Decimal) -> Result<(), ApiError> {
        let expected = BalanceService::trade_total(amount, price)?;

        if expected.round_dp(2) != claimed.round_dp(2) {
            return Err(ApiError::BadRequest(format!(
                "totalFiat {} does not match amount x price = {}",
                claimed.normalize(),
                expected.round_dp(2)
            )));
        }
        Ok(())
    }

    pub fn clamp_limit(limit: Option<i64>) -> i64 {
        limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}
