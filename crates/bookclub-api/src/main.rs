//! Book club messaging server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p bookclub-api
//! ```
//!
//! Configuration is loaded from environment variables and `.env`.

use bookclub_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // APP_ENV may come from .env and picks the log format
    dotenvy::dotenv().ok();
    let env = Environment::from_env();
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting book club messaging server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Configuration loaded"
    );

    bookclub_api::run(config).await?;

    Ok(())
}
