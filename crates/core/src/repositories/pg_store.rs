use crate::repositories::crypto_repository::CryptoRepository;
use crate::repositories::fiat_repository::FiatRepository;
use crate::repositories::ledger_store::{LedgerStore, LedgerTx};
use crate::repositories::market_repository::MarketRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::wallet_repository::WalletRepository;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use rust_decimal::Decimal;
use tracing::error;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::{
    Cryptocurrency, FiatBalance, FiatCurrency, MarketData, NewTransaction, NewWallet,
    Transaction, UpsertUser, User, Wallet,
};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// PostgreSQL ledger. Units of work run inside one database transaction and
/// lock the balance rows they read with `SELECT ... FOR UPDATE`.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: DbPool,
}

impl PgLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, ApiError> {
        self.pool.get().map_err(|e| {
            error!("ledger.pg: failed to acquire db connection: {}", e);
            ApiError::DatabaseConnection("Database unavailable".into())
        })
    }
}

impl LedgerStore for PgLedgerStore {
    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn LedgerTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        let mut pooled = self.conn()?;
        let conn: &mut PgConnection = &mut pooled;

        conn.transaction::<(), ApiError, _>(|conn| work(&mut PgTx { conn }))
    }

    fn ping(&self) -> Result<(), ApiError> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1")
            .execute(&mut *conn)
            .map(|_| ())
            .map_err(|e| {
                error!("ledger.pg: health check failed: {}", e);
                ApiError::DatabaseConnection("Database unavailable".into())
            })
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        UserRepository::find_by_id(&mut *self.conn()?, id)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        UserRepository::find_by_email(&mut *self.conn()?, email)
    }

    fn upsert_user(&self, user: &UpsertUser) -> Result<User, ApiError> {
        UserRepository::upsert(&mut *self.conn()?, user)
    }

    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        UserRepository::find_all(&mut *self.conn()?)
    }

    fn get_cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ApiError> {
        CryptoRepository::find_active(&mut *self.conn()?)
    }

    fn get_cryptocurrency(&self, id: i32) -> Result<Option<Cryptocurrency>, ApiError> {
        CryptoRepository::find_by_id(&mut *self.conn()?, id)
    }

    fn seed_cryptocurrencies(&self, cryptos: &[Cryptocurrency]) -> Result<usize, ApiError> {
        CryptoRepository::insert_missing(&mut *self.conn()?, cryptos)
    }

    fn get_wallet(&self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError> {
        WalletRepository::find_by_user_and_crypto(&mut *self.conn()?, user_id, crypto_id)
    }

    fn list_user_wallets(&self, user_id: Uuid) -> Result<Vec<Wallet>, ApiError> {
        WalletRepository::find_all_by_user(&mut *self.conn()?, user_id)
    }

    fn list_user_fiat_balances(&self, user_id: Uuid) -> Result<Vec<FiatBalance>, ApiError> {
        FiatRepository::find_all_by_user(&mut *self.conn()?, user_id)
    }

    fn list_user_transactions(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        TransactionRepository::find_recent_by_user(&mut *self.conn()?, user_id, limit)
    }

    fn list_all_transactions(&self, limit: Option<i64>) -> Result<Vec<Transaction>, ApiError> {
        TransactionRepository::find_recent(&mut *self.conn()?, limit)
    }

    fn upsert_market_data(&self, data: &MarketData) -> Result<MarketData, ApiError> {
        MarketRepository::upsert(&mut *self.conn()?, data)
    }

    fn list_market_data(&self) -> Result<Vec<MarketData>, ApiError> {
        MarketRepository::find_all(&mut *self.conn()?)
    }
}

struct PgTx<'c> {
    conn: &'c mut PgConnection,
}

impl LedgerTx for PgTx<'_> {
    fn get_user(&mut self, id: Uuid) -> Result<Option<User>, ApiError> {
        UserRepository::find_by_id(self.conn, id)
    }

    fn insert_user(&mut self, user: &UpsertUser) -> Result<User, ApiError> {
        UserRepository::create(self.conn, user)
    }

    fn active_cryptocurrencies(&mut self) -> Result<Vec<Cryptocurrency>, ApiError> {
        CryptoRepository::find_active(self.conn)
    }

    fn lock_wallet(&mut self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError> {
        WalletRepository::find_by_user_and_crypto_with_lock(self.conn, user_id, crypto_id)
    }

    fn create_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet, ApiError> {
        WalletRepository::create(self.conn, wallet)
    }

    fn set_wallet_balance(
        &mut self,
        wallet_id: Uuid,
        balance: Decimal,
    ) -> Result<Wallet, ApiError> {
        WalletRepository::set_balance(self.conn, wallet_id, balance)
    }

    fn lock_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<FiatBalance, ApiError> {
        FiatRepository::create_if_not_exists(self.conn, user_id, currency)
    }

    fn set_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
        balance: Decimal,
    ) -> Result<FiatBalance, ApiError> {
        FiatRepository::set_balance(self.conn, user_id, currency, balance)
    }

    fn append_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, ApiError> {
        TransactionRepository::create(self.conn, tx)
    }
}
