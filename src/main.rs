mod config;
mod dashboard;
mod detector;
mod error;
mod fetcher;
mod normalize;
mod report;
mod stats;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dashboard::{create_dashboard, DashboardOutcome};
use crate::error::Result;
use crate::fetcher::fetch_swaps;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        "Fetching swaps from {} (excluding sender {})",
        cfg.endpoint, cfg.excluded_sender
    );
    let swaps = fetch_swaps(&cfg).await;

    if create_dashboard(&swaps, &cfg)? == DashboardOutcome::NoData {
        info!("No dashboard produced");
    }
    Ok(())
}
