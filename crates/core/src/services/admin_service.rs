use crate::app_state::AppState;
use crate::services::balance_service::{Actor, BalanceService, MutationOutcome, TransferDetails};
use crate::services::transaction_service::TransactionService;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::admin_dto::{
    AdminAdjustRequest, AdminAdjustResponse, AdminStats, AdminUserDto,
};
use vaultex_primitives::models::dtos::auth_dto::UserDto;
use vaultex_primitives::models::dtos::transaction_dto::{TransactionDto, TransactionsResponse};
use vaultex_primitives::models::dtos::wallet_dto::{FiatBalanceDto, WalletDto};

/// Cap on the per-user history embedded in the user listing.
const NESTED_HISTORY_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Credit,
    Debit,
}

pub struct AdminService;

impl AdminService {
    pub async fn list_users(state: &AppState) -> Result<Vec<AdminUserDto>, ApiError> {
        let cryptos = state.ledger.get_cryptocurrencies()?;
        let users = state.ledger.list_users()?;

        users
            .iter()
            .map(|user| -> Result<AdminUserDto, ApiError> {
                let wallets = state
                    .ledger
                    .list_user_wallets(user.id)?
                    .iter()
                    .map(|w| WalletDto::new(w, cryptos.iter().find(|c| c.id == w.crypto_id)))
                    .collect();

                let fiat_balances = state
                    .ledger
                    .list_user_fiat_balances(user.id)?
                    .iter()
                    .map(FiatBalanceDto::from)
                    .collect();

                let transactions = state
                    .ledger
                    .list_user_transactions(user.id, Some(NESTED_HISTORY_LIMIT))?
                    .iter()
                    .map(TransactionDto::from)
                    .collect();

                Ok(AdminUserDto {
                    user: UserDto::from(user),
                    wallets,
                    fiat_balances,
                    transactions,
                })
            })
            .collect()
    }

    pub async fn adjust(
        state: &AppState,
        admin_id: Uuid,
        user_id: Uuid,
        direction: Adjustment,
        req: AdminAdjustRequest,
    ) -> Result<AdminAdjustResponse, ApiError> {
        if state.ledger.get_user(user_id)?.is_none() {
            return Err(ApiError::NotFound(format!("User {}", user_id)));
        }

        let amount = req.amount.raw();
        let details = TransferDetails {
            description: req.description,
            ..TransferDetails::default()
        };
        let actor = Actor::Admin(admin_id);

        let outcome: MutationOutcome = match direction {
            Adjustment::Credit => {
                BalanceService::credit_wallet(
                    state,
                    user_id,
                    req.crypto_id,
                    &amount,
                    actor,
                    details,
                )
                .await?
            }
            Adjustment::Debit => {
                BalanceService::debit_wallet(
                    state,
                    user_id,
                    req.crypto_id,
                    &amount,
                    actor,
                    details,
                )
                .await?
            }
        };

        info!(
            admin_id = %admin_id,
            user_id = %user_id,
            crypto_id = req.crypto_id,
            direction = ?direction,
            "admin: balance adjusted"
        );

        let verb = match direction {
            Adjustment::Credit => "credited",
            Adjustment::Debit => "debited",
        };

        Ok(AdminAdjustResponse {
            message: format!(
                "Wallet {} by {}",
                verb,
                outcome.transaction.applied_amount.normalize()
            ),
            balance: outcome.wallet.balance.normalize(),
            transaction: TransactionDto::from(&outcome.transaction),
        })
    }

    pub async fn list_transactions(
        state: &AppState,
        limit: Option<i64>,
    ) -> Result<TransactionsResponse, ApiError> {
        let rows = state
            .ledger
            .list_all_transactions(limit.map(|l| TransactionService::clamp_limit(Some(l))))?;

        Ok(TransactionsResponse {
            transactions: rows.iter().map(TransactionDto::from).collect(),
        })
    }

    pub async fn stats(state: &AppState) -> Result<AdminStats, ApiError> {
        let users = state.ledger.list_users()?;
        let transactions = state.ledger.list_all_transactions(None)?;

        let mut stats = AdminStats {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active).count(),
            admin_users: users.iter().filter(|u| u.is_admin).count(),
            total_transactions: transactions.len(),
            ..AdminStats::default()
        };

        for tx in &transactions {
            *stats.transactions_by_type.entry(tx.kind).or_insert(0) += 1;
            let sum = stats.amount_by_type.entry(tx.kind).or_insert(Decimal::ZERO);
            *sum = BalanceService::add(*sum, tx.applied_amount)?;

            if let (true, Some(currency), Some(total)) =
                (tx.kind.is_trade(), tx.fiat_currency, tx.total_fiat)
            {
                let volume = stats
                    .trade_volume
                    .entry(currency.to_string())
                    .or_insert(Decimal::ZERO);
                *volume = BalanceService::add(*volume, total)?;
            }
        }

        for amount in stats.amount_by_type.values_mut() {
            *amount = amount.normalize();
        }
        for volume in stats.trade_volume.values_mut() {
            *volume = volume.normalize();
        }

        Ok(stats)
    }
}
