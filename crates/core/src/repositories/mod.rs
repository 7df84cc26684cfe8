pub mod crypto_repository;
pub mod fiat_repository;
pub mod ledger_store;
pub mod market_repository;
pub mod memory_store;
pub mod pg_store;
pub mod transaction_repository;
pub mod user_repository;
pub mod wallet_repository;

pub use ledger_store::{run_atomic, LedgerStore, LedgerTx};
pub use memory_store::MemoryLedgerStore;
pub use pg_store::{DbPool, PgLedgerStore};
