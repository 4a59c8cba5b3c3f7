//! tokengate API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tokengate-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use tokengate_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing(&TracingConfig::from_app_config(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    // Run the server
    if let Err(e) = tokengate_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
