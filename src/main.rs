use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::signal;
use tokio::sync::oneshot;

use carelens::api::RestApi;
use carelens::config::{load_config, Config};
use carelens::{BundleStore, HealthError};

const CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<(), HealthError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        load_config(config_path)?
    } else {
        warn!("{} not found, using defaults", CONFIG_PATH);
        Config::default()
    };

    info!("Starting CareLens with bundle: {}", config.bundle.path.display());

    let store = Arc::new(BundleStore::new(&config));
    // Fail fast on a missing bundle instead of on the first request.
    let index = store.index().await?;
    info!("Indexed {} resources", index.len());

    // Initialize API
    let api = RestApi::new(Arc::clone(&store));

    let host: IpAddr = config.api.host.parse().unwrap_or_else(|_| {
        warn!("Invalid api.host {:?}, binding to 127.0.0.1", config.api.host);
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    });
    let addr = SocketAddr::new(host, config.api.port);
    info!("Starting server on {}", addr);

    // Channel for the shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let (_, server) = warp::serve(api.routes()).bind_with_graceful_shutdown(addr, async move {
        shutdown_rx.await.ok();
        info!("Shutting down server...");
    });

    // Run the server in its own task
    let server_handle = tokio::spawn(server);

    // Wait for Ctrl+C
    signal::ctrl_c().await?;
    info!("Ctrl+C received, starting graceful shutdown");

    // Tell the server to stop, then wait for in-flight requests
    shutdown_tx.send(()).ok();

    if let Err(err) = server_handle.await {
        warn!("Server task ended abnormally: {}", err);
    }

    info!("Server shutdown complete");
    Ok(())
}
