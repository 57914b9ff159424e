//! Scaffold demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     ┌──────────────────────────────────────────────────────────┐
//!     │                          App                             │
//!     │                                                          │
//!     │   Container ◄── init ── HttpAdapter ──► RouteRegistry    │
//!     │       ▲                                      ▲           │
//!     │       └──────── init ── AuthController ──────┘           │
//!     │                                                          │
//!     │   start(): spawn adapters → component hooks → drain      │
//!     │   SIGINT/SIGTERM → Shutdown → stop() → adapters return   │
//!     └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use scaffold::config::{load_config, AppConfig};
use scaffold::features::AuthController;
use scaffold::lifecycle::{spawn_signal_listener, Shutdown};
use scaffold::observability::{logging, metrics};
use scaffold::{App, Container, HttpAdapter};

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Application scaffold serving the demo HTTP adapter", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the HTTP bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.http.bind_address = bind;
    }

    logging::init(&config.logging)?;
    tracing::info!("scaffold v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let container = Container::new();
    let mut app = App::new(container);
    app.add_adapter(Arc::new(HttpAdapter::new(config.http.clone())))?;
    app.add_lifecycle_component(Arc::new(AuthController::new()))?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    if let Err(e) = app.start(&shutdown).await {
        tracing::error!(error = %e, "Application exited with errors");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
