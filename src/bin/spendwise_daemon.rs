use std::path::PathBuf;

use spendwise::{config::ConfigManager, AppError, BudgetManager};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "spendwise daemon stopped");
        eprintln!("spendwise: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config_manager = match std::env::args_os().nth(1) {
        Some(base) => ConfigManager::with_base_dir(PathBuf::from(base))?,
        None => ConfigManager::default_location()?,
    };
    let config = config_manager.load()?;
    spendwise::init_with_filter(config.log_filter.as_deref());
    info!(config = %config_manager.config_path().display(), "configuration loaded");

    let manager = BudgetManager::from_config(config)?;
    let scheduler = manager.scheduler();
    let schedule = scheduler.schedule();
    info!(at = %schedule.at, offset = %schedule.offset, "daily rebalance scheduled");

    let runs = scheduler
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await?;
    info!(runs, "spendwise daemon exiting");
    Ok(())
}
