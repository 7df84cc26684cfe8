mod observability;

pub mod utility;

pub use vaultex_primitives::error::ApiError;

use crate::utility::background_tasks::BackgroundTasks;
use crate::utility::db_pool::open_ledger_store;
use crate::utility::logging::setup_logging;
use crate::utility::server::serve;
use crate::utility::tasks::{build_router, initialize_system, load_env};
use eyre::Report;
use vaultex_core::app_state::{AppConfig, AppState};
use tracing::info;

pub async fn run() -> Result<(), Report> {
    // 1. load environment variables
    load_env();

    // 2. initialize logging first (so we can log everything else)
    setup_logging();

    info!("Starting Vaultex application...");

    // 3. load configuration
    let config = AppConfig::from_env()?;

    // 4. open the ledger store (PostgreSQL when DATABASE_URL is set)
    let ledger = open_ledger_store()?;

    // 5. build application state
    let state = AppState::new(ledger, config)?;

    // 6. seed reference data and warm the market cache
    initialize_system(&state).await?;

    // 7. start price refresh and market broadcast timers
    let tasks = BackgroundTasks::spawn(state.clone());

    // 8. initialize metrics
    let (metric_layer, metric_handle) = observability::metrics::setup_metrics();

    // 9. build axum router
    let app = build_router(state.clone(), metric_layer, metric_handle)?;

    // 10. start HTTP server
    let served = serve(app).await;

    // 11. stop timers once in-flight requests have drained
    tasks.shutdown().await;

    served?;
    info!("Vaultex application shut down gracefully");
    Ok(())
}
