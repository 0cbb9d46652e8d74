//! Wirebind Server - Main Entry Point
//! Serves the example procedures and writes their TypeScript bindings.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use wirebind_api_rpc::RpcServer;
use wirebind_daemon::{build_registry, homepage_routes, telemetry, DaemonConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env();

    // 2. Initialize logging
    telemetry::init_logging(config.log_format)?;

    info!("Wirebind server v{} starting...", VERSION);

    // 3. Register procedures (invalid names are fatal)
    let registry = Arc::new(build_registry().context("Procedure registration failed")?);
    info!(
        app = %registry.app_name(),
        procedures = registry.len(),
        "Procedures registered"
    );

    // 4. Generate TypeScript bindings
    if config.generate {
        let written = registry
            .generate_bindings(&config.bindings_dir)
            .context("Binding generation failed")?;
        for path in &written {
            info!(path = %path.display(), "Binding file ready");
        }
    } else {
        info!("Binding generation disabled (WIREBIND_GENERATE)");
    }

    // 5. Start HTTP server
    let server = RpcServer::new(config.server.clone(), registry).merge(homepage_routes());
    let handle = server.start().await.context("RPC server start failed")?;

    info!(url = %handle.base_url(), "System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    handle.stop().await.context("RPC server stop failed")?;

    info!("Shutdown complete.");

    Ok(())
}
