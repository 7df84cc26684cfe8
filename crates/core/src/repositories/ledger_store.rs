use rust_decimal::Decimal;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::{
    Cryptocurrency, FiatBalance, FiatCurrency, MarketData, NewTransaction, NewWallet,
    Transaction, UpsertUser, User, Wallet,
};

/// Operations available inside one atomic unit of work.
///
/// Reads made through `lock_*` hold the row until the unit commits or rolls
/// back, so a read-modify-write inside one unit can't race another unit
/// touching the same wallet or fiat balance.
pub trait LedgerTx {
    fn get_user(&mut self, id: Uuid) -> Result<Option<User>, ApiError>;

    fn insert_user(&mut self, user: &UpsertUser) -> Result<User, ApiError>;

    fn active_cryptocurrencies(&mut self) -> Result<Vec<Cryptocurrency>, ApiError>;

    fn lock_wallet(&mut self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError>;

    fn create_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet, ApiError>;

    fn set_wallet_balance(&mut self, wallet_id: Uuid, balance: Decimal)
        -> Result<Wallet, ApiError>;

    /// Returns the (user, currency) balance, creating a zero row if absent.
    fn lock_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<FiatBalance, ApiError>;

    fn set_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
        balance: Decimal,
    ) -> Result<FiatBalance, ApiError>;

    fn append_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, ApiError>;
}

/// Durable storage for users, cryptocurrencies, wallets, fiat balances, the
/// transaction log and market data.
pub trait LedgerStore: Send + Sync {
    /// Runs `work` in one atomic unit. Nothing `work` wrote survives an `Err`.
    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn LedgerTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError>;

    fn ping(&self) -> Result<(), ApiError>;

    fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Create-or-update by `id`. Refreshes `updated_at` when the row exists.
    fn upsert_user(&self, user: &UpsertUser) -> Result<User, ApiError>;

    fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Active cryptocurrencies ordered by id.
    fn get_cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ApiError>;

    fn get_cryptocurrency(&self, id: i32) -> Result<Option<Cryptocurrency>, ApiError>;

    /// Inserts the rows that don't exist yet; returns how many were added.
    fn seed_cryptocurrencies(&self, cryptos: &[Cryptocurrency]) -> Result<usize, ApiError>;

    fn get_wallet(&self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError>;

    fn list_user_wallets(&self, user_id: Uuid) -> Result<Vec<Wallet>, ApiError>;

    fn list_user_fiat_balances(&self, user_id: Uuid) -> Result<Vec<FiatBalance>, ApiError>;

    /// Newest first.
    fn list_user_transactions(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>, ApiError>;

    /// Newest first.
    fn list_all_transactions(&self, limit: Option<i64>) -> Result<Vec<Transaction>, ApiError>;

    /// Insert-or-overwrite keyed by `crypto_id`.
    fn upsert_market_data(&self, data: &MarketData) -> Result<MarketData, ApiError>;

    fn list_market_data(&self) -> Result<Vec<MarketData>, ApiError>;

    fn create_wallet(&self, wallet: &NewWallet) -> Result<Wallet, ApiError> {
        run_atomic(self, |tx| tx.create_wallet(wallet))
    }

    fn set_wallet_balance(&self, wallet_id: Uuid, balance: Decimal) -> Result<Wallet, ApiError> {
        run_atomic(self, |tx| tx.set_wallet_balance(wallet_id, balance))
    }

    fn get_fiat_balance(
        &self,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<FiatBalance, ApiError> {
        run_atomic(self, |tx| tx.lock_fiat_balance(user_id, currency))
    }

    fn set_fiat_balance(
        &self,
        user_id: Uuid,
        currency: FiatCurrency,
        balance: Decimal,
    ) -> Result<FiatBalance, ApiError> {
        run_atomic(self, |tx| tx.set_fiat_balance(user_id, currency, balance))
    }

    fn append_transaction(&self, tx: &NewTransaction) -> Result<Transaction, ApiError> {
        run_atomic(self, |unit| unit.append_transaction(tx))
    }
}

/// Typed wrapper over [`LedgerStore::atomically`] that hands back the value
/// produced by `work`.
pub fn run_atomic<S, T, F>(store: &S, work: F) -> Result<T, ApiError>
where
    S: LedgerStore + ?Sized,
    F: FnOnce(&mut dyn LedgerTx) -> Result<T, ApiError>,
{
    let mut work = Some(work);
    let mut output = None;

    store.atomically(&mut |tx: &mut dyn LedgerTx| {
        let work = work
            .take()
            .ok_or_else(|| ApiError::Internal("unit of work invoked twice".into()))?;
        output = Some(work(tx)?);
        Ok(())
    })?;

    output.ok_or_else(|| ApiError::Internal("unit of work produced no result".into()))
}
