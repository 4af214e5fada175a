//! Reaction ledger API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p engage-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` when present).

use engage_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_app(&config.app)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting reaction ledger API server"
    );

    if let Err(e) = engage_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}
