use crate::repositories::ledger_store::{LedgerStore, LedgerTx};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::{
    Cryptocurrency, FiatBalance, FiatCurrency, MarketData, NewTransaction, NewWallet,
    Transaction, UpsertUser, User, Wallet,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    cryptocurrencies: BTreeMap<i32, Cryptocurrency>,
    wallets: HashMap<Uuid, Wallet>,
    fiat_balances: HashMap<(Uuid, FiatCurrency), FiatBalance>,
    /// Append order is creation order.
    transactions: Vec<Transaction>,
    market_data: BTreeMap<i32, MarketData>,
}

/// Process-local ledger used when no database is configured, and by tests.
///
/// Units of work run under a single lock and write straight into the tables,
/// keeping the prior value of every row they touch. A unit that returns `Err`
/// or panics is rolled back from that log before the lock is released.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    tables: Mutex<Tables>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| {
            // the panicking unit was already undone by `MemoryTx::drop`
            warn!("ledger.memory: recovering lock after a panicked unit of work");
            self.tables.clear_poison();
            poisoned.into_inner()
        })
    }
}

fn newest_first(
    rows: impl DoubleEndedIterator<Item = Transaction>,
    limit: Option<i64>,
) -> Vec<Transaction> {
    let rows = rows.rev();
    match limit {
        Some(limit) => rows.take(limit.max(0) as usize).collect(),
        None => rows.collect(),
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn LedgerTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        let mut tables = self.lock();
        let mut tx = MemoryTx::new(&mut tables);

        work(&mut tx)?;

        tx.commit();
        Ok(())
    }

    fn ping(&self) -> Result<(), ApiError> {
        drop(self.lock());
        Ok(())
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn upsert_user(&self, user: &UpsertUser) -> Result<User, ApiError> {
        let mut tables = self.lock();
        let now = Utc::now();

        ensure_unique_identity(&tables, user)?;

        let row = match tables.users.get(&user.id) {
            Some(existing) => User {
                created_at: existing.created_at,
                updated_at: now,
                ..user_row(user, now)
            },
            None => user_row(user, now),
        };

        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    fn get_cryptocurrencies(&self) -> Result<Vec<Cryptocurrency>, ApiError> {
        Ok(self
            .lock()
            .cryptocurrencies
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    fn get_cryptocurrency(&self, id: i32) -> Result<Option<Cryptocurrency>, ApiError> {
        Ok(self.lock().cryptocurrencies.get(&id).cloned())
    }

    fn seed_cryptocurrencies(&self, cryptos: &[Cryptocurrency]) -> Result<usize, ApiError> {
        let mut tables = self.lock();
        let mut inserted = 0;

        for crypto in cryptos {
            let clash = tables.cryptocurrencies.contains_key(&crypto.id)
                || tables
                    .cryptocurrencies
                    .values()
                    .any(|c| c.symbol == crypto.symbol);
            if !clash {
                tables.cryptocurrencies.insert(crypto.id, crypto.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    fn get_wallet(&self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError> {
        Ok(find_wallet(&self.lock(), user_id, crypto_id).cloned())
    }

    fn list_user_wallets(&self, user_id: Uuid) -> Result<Vec<Wallet>, ApiError> {
        let mut wallets: Vec<Wallet> = self
            .lock()
            .wallets
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        wallets.sort_by_key(|w| w.crypto_id);
        Ok(wallets)
    }

    fn list_user_fiat_balances(&self, user_id: Uuid) -> Result<Vec<FiatBalance>, ApiError> {
        let mut balances: Vec<FiatBalance> = self
            .lock()
            .fiat_balances
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        balances.sort_by_key(|f| f.currency);
        Ok(balances)
    }

    fn list_user_transactions(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let tables = self.lock();
        let rows: Vec<Transaction> = tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows.into_iter(), limit))
    }

    fn list_all_transactions(&self, limit: Option<i64>) -> Result<Vec<Transaction>, ApiError> {
        let tables = self.lock();
        Ok(newest_first(tables.transactions.iter().cloned(), limit))
    }

    fn upsert_market_data(&self, data: &MarketData) -> Result<MarketData, ApiError> {
        let mut tables = self.lock();
        if !tables.cryptocurrencies.contains_key(&data.crypto_id) {
            return Err(ApiError::NotFound(format!(
                "cryptocurrency {}",
                data.crypto_id
            )));
        }
        tables.market_data.insert(data.crypto_id, data.clone());
        Ok(data.clone())
    }

    fn list_market_data(&self) -> Result<Vec<MarketData>, ApiError> {
        Ok(self.lock().market_data.values().cloned().collect())
    }
}

/// Prior state of a row touched inside a unit of work.
enum Undo {
    User(Uuid),
    Wallet(Uuid, Option<Wallet>),
    Fiat((Uuid, FiatCurrency), Option<FiatBalance>),
    Transaction,
}

struct MemoryTx<'a> {
    tables: &'a mut Tables,
    undo: Vec<Undo>,
    committed: bool,
}

impl<'a> MemoryTx<'a> {
    fn new(tables: &'a mut Tables) -> Self {
        Self {
            tables,
            undo: Vec::new(),
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }

    fn rollback(&mut self) {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::User(id) => {
                    self.tables.users.remove(&id);
                }
                Undo::Wallet(id, Some(row)) => {
                    self.tables.wallets.insert(id, row);
                }
                Undo::Wallet(id, None) => {
                    self.tables.wallets.remove(&id);
                }
                Undo::Fiat(key, Some(row)) => {
                    self.tables.fiat_balances.insert(key, row);
                }
                Undo::Fiat(key, None) => {
                    self.tables.fiat_balances.remove(&key);
                }
                Undo::Transaction => {
                    self.tables.transactions.pop();
                }
            }
        }
    }
}

impl Drop for MemoryTx<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

impl LedgerTx for MemoryTx<'_> {
    fn get_user(&mut self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.tables.users.get(&id).cloned())
    }

    fn insert_user(&mut self, user: &UpsertUser) -> Result<User, ApiError> {
        if self.tables.users.contains_key(&user.id) {
            return Err(ApiError::Conflict("user already exists".into()));
        }
        ensure_unique_identity(self.tables, user)?;

        let row = user_row(user, Utc::now());
        self.undo.push(Undo::User(row.id));
        self.tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    fn active_cryptocurrencies(&mut self) -> Result<Vec<Cryptocurrency>, ApiError> {
        Ok(self
            .tables
            .cryptocurrencies
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    fn lock_wallet(&mut self, user_id: Uuid, crypto_id: i32) -> Result<Option<Wallet>, ApiError> {
        Ok(find_wallet(self.tables, user_id, crypto_id).cloned())
    }

    fn create_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet, ApiError> {
        if !self.tables.users.contains_key(&wallet.user_id) {
            return Err(ApiError::NotFound(format!("user {}", wallet.user_id)));
        }
        if !self.tables.cryptocurrencies.contains_key(&wallet.crypto_id) {
            return Err(ApiError::NotFound(format!(
                "cryptocurrency {}",
                wallet.crypto_id
            )));
        }
        if find_wallet(self.tables, wallet.user_id, wallet.crypto_id).is_some() {
            return Err(ApiError::Conflict(format!(
                "wallet for cryptocurrency {} already exists",
                wallet.crypto_id
            )));
        }

        let now = Utc::now();
        let row = Wallet {
            id: Uuid::new_v4(),
            user_id: wallet.user_id,
            crypto_id: wallet.crypto_id,
            balance: Decimal::ZERO,
            address: wallet.address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.undo.push(Undo::Wallet(row.id, None));
        self.tables.wallets.insert(row.id, row.clone());
        Ok(row)
    }

    fn set_wallet_balance(
        &mut self,
        wallet_id: Uuid,
        balance: Decimal,
    ) -> Result<Wallet, ApiError> {
        let wallet = self
            .tables
            .wallets
            .get_mut(&wallet_id)
            .ok_or_else(|| ApiError::NotFound(format!("wallet {}", wallet_id)))?;

        self.undo.push(Undo::Wallet(wallet_id, Some(wallet.clone())));
        wallet.balance = balance;
        wallet.updated_at = Utc::now();
        Ok(wallet.clone())
    }

    fn lock_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<FiatBalance, ApiError> {
        if !self.tables.users.contains_key(&user_id) {
            return Err(ApiError::NotFound(format!("user {}", user_id)));
        }

        let key = (user_id, currency);
        if !self.tables.fiat_balances.contains_key(&key) {
            self.undo.push(Undo::Fiat(key, None));
        }

        let balance = self
            .tables
            .fiat_balances
            .entry(key)
            .or_insert_with(|| {
                let now = Utc::now();
                FiatBalance {
                    id: Uuid::new_v4(),
                    user_id,
                    currency,
                    balance: Decimal::ZERO,
                    created_at: now,
                    updated_at: now,
                }
            });

        Ok(balance.clone())
    }

    fn set_fiat_balance(
        &mut self,
        user_id: Uuid,
        currency: FiatCurrency,
        balance: Decimal,
    ) -> Result<FiatBalance, ApiError> {
        self.lock_fiat_balance(user_id, currency)?;

        let row = self
            .tables
            .fiat_balances
            .get_mut(&(user_id, currency))
            .ok_or_else(|| ApiError::NotFound(format!("{} balance", currency)))?;

        self.undo.push(Undo::Fiat((user_id, currency), Some(row.clone())));
        row.balance = balance;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    fn append_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, ApiError> {
        if !self.tables.users.contains_key(&tx.user_id) {
            return Err(ApiError::NotFound(format!("user {}", tx.user_id)));
        }
        if !self.tables.cryptocurrencies.contains_key(&tx.crypto_id) {
            return Err(ApiError::NotFound(format!("cryptocurrency {}", tx.crypto_id)));
        }

        let row = Transaction {
            id: Uuid::new_v4(),
            user_id: tx.user_id,
            crypto_id: tx.crypto_id,
            kind: tx.kind,
            amount: tx.amount,
            applied_amount: tx.applied_amount,
            price: tx.price,
            fiat_currency: tx.fiat_currency,
            total_fiat: tx.total_fiat,
            status: tx.status,
            admin_id: tx.admin_id,
            description: tx.description.clone(),
            payment_method: tx.payment_method.clone(),
            network: tx.network.clone(),
            wallet_address: tx.wallet_address.clone(),
            tx_hash: tx.tx_hash.clone(),
            created_at: Utc::now(),
        };
        self.undo.push(Undo::Transaction);
        self.tables.transactions.push(row.clone());
        Ok(row)
    }
}

fn find_wallet(tables: &Tables, user_id: Uuid, crypto_id: i32) -> Option<&Wallet> {
    tables
        .wallets
        .values()
        .find(|w| w.user_id == user_id && w.crypto_id == crypto_id)
}

fn ensure_unique_identity(tables: &Tables, user: &UpsertUser) -> Result<(), ApiError> {
    let clash = tables.users.values().find(|u| {
        u.id != user.id && (u.email == user.email || u.username == user.username)
    });

    match clash {
        Some(existing) if existing.email == user.email => {
            Err(ApiError::Conflict("email already registered".into()))
        }
        Some(_) => Err(ApiError::Conflict("username already taken".into())),
        None => Ok(()),
    }
}

fn user_row(user: &UpsertUser, now: chrono::DateTime<Utc>) -> User {
    User {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        country: user.country.clone(),
        city: user.city.clone(),
        is_admin: user.is_admin,
        is_active: user.is_active,
        created_at: now,
        updated_at: now,
    }
}
