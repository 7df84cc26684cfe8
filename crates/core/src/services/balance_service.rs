use crate::app_state::AppState;
use crate::repositories::ledger_store::{run_atomic, LedgerTx};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::notification_dto::{AdminNotice, BalanceUpdate, ServerEvent};
use vaultex_primitives::models::dtos::transaction_dto::TransactionDto;
use vaultex_primitives::models::entities::{
    FiatBalance, FiatCurrency, NewTransaction, TradeSide, Transaction, TransactionKind, Wallet,
};
use vaultex_primitives::utility::parse_positive_amount;

/// Who asked for a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(Uuid),
    Admin(Uuid),
}

impl Actor {
    pub fn id(self) -> Uuid {
        match self {
            Actor::User(id) | Actor::Admin(id) => id,
        }
    }

    fn acts_as_admin_on(self, target: Uuid) -> bool {
        matches!(self, Actor::Admin(admin) if admin != target)
    }

    fn authorize(self, target: Uuid) -> Result<(), ApiError> {
        match self {
            Actor::User(id) if id != target => Err(ApiError::Forbidden(
                "Cannot change another user's balance".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Optional metadata copied onto the transaction row.
#[derive(Debug, Clone, Default)]
pub struct TransferDetails {
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub network: Option<String>,
    pub wallet_address: Option<String>,
    pub tx_hash: Option<String>,
}

impl TransferDetails {
    fn apply(self, record: &mut NewTransaction) {
        record.description = self.description;
        record.payment_method = self.payment_method;
        record.network = self.network;
        record.wallet_address = self.wallet_address;
        record.tx_hash = self.tx_hash;
    }
}

/// State after a committed mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub transaction: Transaction,
    pub wallet: Wallet,
    pub fiat: Option<FiatBalance>,
}

/// The only path that changes a wallet or fiat balance. Each call commits
/// the new balance(s) and exactly one transaction row together, then pushes
/// the result to the hub.
pub struct BalanceService;

impl BalanceService {
    pub async fn credit_wallet(
        state: &AppState,
        user_id: Uuid,
        crypto_id: i32,
        amount: &str,
        actor: Actor,
        details: TransferDetails,
    ) -> Result<MutationOutcome, ApiError> {
        let amount = parse_positive_amount(amount)?;
        actor.authorize(user_id)?;

        let kind = if actor.acts_as_admin_on(user_id) {
            TransactionKind::AdminCredit
        } else {
            TransactionKind::Deposit
        };

        let outcome = run_atomic(state.ledger.as_ref(), |tx| {
            let wallet = Self::locked_wallet(tx, user_id, crypto_id)?;
            let wallet = tx.set_wallet_balance(wallet.id, Self::add(wallet.balance, amount)?)?;

            let mut record = NewTransaction::completed(user_id, crypto_id, kind, amount);
            record.admin_id = Self::admin_id(actor, kind);
            details.apply(&mut record);

            Ok(MutationOutcome {
                transaction: tx.append_transaction(&record)?,
                wallet,
                fiat: None,
            })
        })?;

        info!(
            user_id = %user_id,
            crypto_id,
            kind = %kind,
            amount = %amount,
            balance = %outcome.wallet.balance,
            "balance.credit: committed"
        );

        Self::publish(state, &outcome);
        Ok(outcome)
    }

    /// Administrators clamp at zero; everyone else is refused when the
    /// wallet holds less than `amount`. The row records the requested
    /// `amount` and the `applied_amount` actually removed.
    pub async fn debit_wallet(
        state: &AppState,
        user_id: Uuid,
        crypto_id: i32,
        amount: &str,
        actor: Actor,
        details: TransferDetails,
    ) -> Result<MutationOutcome, ApiError> {
        let amount = parse_positive_amount(amount)?;
        actor.authorize(user_id)?;

        let kind = if actor.acts_as_admin_on(user_id) {
            TransactionKind::AdminDebit
        } else {
            TransactionKind::Withdrawal
        };
        let clamps = matches!(actor, Actor::Admin(_));

        let outcome = run_atomic(state.ledger.as_ref(), |tx| {
            let wallet = Self::locked_wallet(tx, user_id, crypto_id)?;

            let applied = if wallet.balance >= amount {
                amount
            } else if clamps {
                wallet.balance
            } else {
                return Err(ApiError::InsufficientBalance(format!(
                    "wallet holds {}, requested {}",
                    wallet.balance.normalize(),
                    amount.normalize()
                )));
            };

            let wallet = tx.set_wallet_balance(wallet.id, wallet.balance - applied)?;

            let mut record = NewTransaction::completed(user_id, crypto_id, kind, amount);
            record.applied_amount = applied;
            record.admin_id = Self::admin_id(actor, kind);
            details.apply(&mut record);

            Ok(MutationOutcome {
                transaction: tx.append_transaction(&record)?,
                wallet,
                fiat: None,
            })
        })?;

        if outcome.transaction.applied_amount < outcome.transaction.amount {
            warn!(
                user_id = %user_id,
                crypto_id,
                requested = %amount,
                applied = %outcome.transaction.applied_amount,
                "balance.debit: clamped at zero"
            );
        }
        info!(
            user_id = %user_id,
            crypto_id,
            kind = %kind,
            amount = %amount,
            balance = %outcome.wallet.balance,
            "balance.debit: committed"
        );

        Self::publish(state, &outcome);
        Ok(outcome)
    }

    /// Trades execute immediately at the caller's price. The wallet row is
    /// locked before the fiat row in both directions.
    pub async fn execute_trade(
        state: &AppState,
        user_id: Uuid,
        crypto_id: i32,
        side: TradeSide,
        amount: &str,
        price: &str,
        fiat_currency: FiatCurrency,
    ) -> Result<MutationOutcome, ApiError> {
        let amount = parse_positive_amount(amount)?;
        let price = parse_positive_amount(price)?;
        let total = Self::trade_total(amount, price)?;
        let kind = TransactionKind::from(side);

        let outcome = run_atomic(state.ledger.as_ref(), |tx| {
            let wallet = Self::locked_wallet(tx, user_id, crypto_id)?;
            let fiat = tx.lock_fiat_balance(user_id, fiat_currency)?;

            let (wallet_after, fiat_after) = match side {
                TradeSide::Buy => {
                    if fiat.balance < total {
                        return Err(ApiError::InsufficientBalance(format!(
                            "{} balance {} is below order total {}",
                            fiat_currency,
                            fiat.balance.normalize(),
                            total.normalize()
                        )));
                    }
                    (Self::add(wallet.balance, amount)?, fiat.balance - total)
                }
                TradeSide::Sell => {
                    if wallet.balance < amount {
                        return Err(ApiError::InsufficientBalance(format!(
                            "wallet holds {}, order needs {}",
                            wallet.balance.normalize(),
                            amount.normalize()
                        )));
                    }
                    (wallet.balance - amount, Self::add(fiat.balance, total)?)
                }
            };

            let wallet = tx.set_wallet_balance(wallet.id, wallet_after)?;
            let fiat = tx.set_fiat_balance(user_id, fiat_currency, fiat_after)?;

            let mut record = NewTransaction::completed(user_id, crypto_id, kind, amount);
            record.price = Some(price);
            record.fiat_currency = Some(fiat_currency);
            record.total_fiat = Some(total);

            Ok(MutationOutcome {
                transaction: tx.append_transaction(&record)?,
                wallet,
                fiat: Some(fiat),
            })
        })?;

        info!(
            user_id = %user_id,
            crypto_id,
            kind = %kind,
            amount = %amount,
            price = %price,
            total = %total,
            "balance.trade: committed"
        );

        Self::publish(state, &outcome);
        Ok(outcome)
    }

    pub fn trade_total(amount: Decimal, price: Decimal) -> Result<Decimal, ApiError> {
        amount
            .checked_mul(price)
            .ok_or_else(|| ApiError::InvalidAmount("order total is out of range".into()))
    }

    /// Balance increase; overflow is refused before anything is written.
    pub fn add(balance: Decimal, delta: Decimal) -> Result<Decimal, ApiError> {
        balance
            .checked_add(delta)
            .ok_or_else(|| ApiError::InvalidAmount("resulting balance is out of range".into()))
    }

    fn locked_wallet(
        tx: &mut dyn LedgerTx,
        user_id: Uuid,
        crypto_id: i32,
    ) -> Result<Wallet, ApiError> {
        tx.lock_wallet(user_id, crypto_id)?
            .ok_or(ApiError::WalletNotFound { user_id, crypto_id })
    }

    fn admin_id(actor: Actor, kind: TransactionKind) -> Option<Uuid> {
        kind.is_admin().then(|| actor.id())
    }

    /// balance_update, then transaction_update to the owner, then the admin
    /// feed.
    fn publish(state: &AppState, outcome: &MutationOutcome) {
        let tx = &outcome.transaction;
        let dto = TransactionDto::from(tx);

        state.hub.send_to_user(
            tx.user_id,
            ServerEvent::BalanceUpdate(BalanceUpdate {
                user_id: tx.user_id,
                crypto_id: tx.crypto_id,
                wallet_balance: outcome.wallet.balance.normalize(),
                fiat_currency: outcome.fiat.as_ref().map(|f| f.currency),
                fiat_balance: outcome.fiat.as_ref().map(|f| f.balance.normalize()),
            }),
        );
        state
            .hub
            .send_to_user(tx.user_id, ServerEvent::TransactionUpdate(dto.clone()));

        state.hub.send_to_admins(ServerEvent::AdminNotification(AdminNotice {
            message: format!(
                "{} of {} (crypto {}) for user {}",
                tx.kind.display().label,
                tx.amount.normalize(),
                tx.crypto_id,
                tx.user_id
            ),
            user_id: tx.user_id,
            transaction: dto,
        }));
    }
}
