use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::{eyre, Report};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use vaultex_core::repositories::{DbPool, LedgerStore, MemoryLedgerStore, PgLedgerStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory ledger.
pub fn open_ledger_store() -> Result<Arc<dyn LedgerStore>, Report> {
    let Some(db_url) = env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
    else {
        warn!("DATABASE_URL not set, using the in-memory ledger store; data is lost on exit");
        return Ok(Arc::new(MemoryLedgerStore::new()));
    };

    let pool = create_db_pool(&db_url)?;
    run_migrations(&pool)?;
    Ok(Arc::new(PgLedgerStore::new(pool)))
}

pub fn create_db_pool(db_url: &SecretString) -> Result<DbPool, Report> {
    let manager = ConnectionManager::<PgConnection>::new(db_url.expose_secret());

    let pool = Pool::builder()
        .max_size(20)
        .min_idle(Some(2))
        .connection_timeout(Duration::from_secs(8))
        .idle_timeout(Some(Duration::from_secs(300)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .test_on_check_out(true)
        .build(manager)?;

    info!("PostgreSQL connection pool created (max_size: 20)");

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Report> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    info!(count = applied.len(), "Database migrations applied");
    Ok(())
}
