//! CWA weather proxy server
//!
//! Usage:
//!   cwa-weather                     # defaults + environment
//!   cwa-weather -c config.yaml      # load a YAML config file first
//!   cwa-weather -p 8080             # override the listening port

use argh::FromArgs;
use cwa_weather::{run_server, Config, CwaClient};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(FromArgs)]
/// 36-hour forecast proxy for Taiwan's six special municipalities
struct Args {
    /// path to a YAML configuration file (optional, environment still applies)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// port to listen on, overrides PORT and the config file
    #[argh(option, short = 'p')]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let mut config = if let Some(config_path) = &args.config {
        match Config::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config from '{}': {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if let Err(e) = config.apply_env() {
        log::error!("Invalid environment: {}", e);
        std::process::exit(1);
    }

    if let Some(port) = args.port {
        config.server.port = port;
    }

    let client = CwaClient::new(&config.upstream)?;
    if !client.has_api_key() {
        log::warn!("API_KEY is not set; weather endpoints will answer with a configuration error");
    }

    log::info!("Environment: {}", config.server.environment);
    log::info!("Upstream: {}", client.dataset_url());

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Set up Ctrl+C handler
    ctrlc::set_handler({
        let shutdown_tx = shutdown_tx.clone();
        move || {
            log::info!("Received Ctrl+C, shutting down gracefully...");
            shutdown_tx.send(()).ok();
        }
    })?;

    if let Err(e) = run_server(Arc::new(client), config.server.port, shutdown_rx).await {
        log::error!("HTTP server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
