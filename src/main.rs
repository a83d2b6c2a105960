//! routegate server.
//!
//! ```text
//!     Client ──▶ net::Listener ──▶ http::HttpServer ──▶ routing::Dispatcher
//!                                                         │
//!                                  ┌──────────────────────┴───────────┐
//!                                  ▼                                  ▼
//!                            /users Router                       / Router
//!                     (bearer gate → auth::AuthHandler)           (health)
//! ```

use std::path::PathBuf;

use clap::Parser;

use routegate::config::resolve_config;
use routegate::lifecycle::{launch, wait_for_signal, Shutdown};
use routegate::observability::{logging, metrics};

#[derive(Parser)]
#[command(
    name = "routegate",
    version,
    about = "Prefix-mounted HTTP router with a bearer-token gate"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.bind)?;

    logging::init(&config.observability)?;
    tracing::info!("routegate v{} starting", env!("CARGO_PKG_VERSION"));

    if cli.config.is_none() {
        tracing::warn!("No --config given, running with default settings");
    }
    if config.auth.uses_placeholder_secret() {
        tracing::warn!("auth.secret is the built-in placeholder; tokens can be forged");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        users_mount = %config.mounts.users,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let running = launch(config, &shutdown).await?;
    let mut server = running.handle;

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = wait_for_signal() => shutdown.trigger(),
    }
    server.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
