//! Server binary: parses flags, wires storage and the catalog client, and
//! runs the HTTP server until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use metrics_exporter_prometheus::PrometheusBuilder;
use reqwest::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skiphire_server::catalog::HttpCatalog;
use skiphire_server::network::{CatalogConfig, NetworkConfig, NetworkModule};
use skiphire_server::storage::{build_repository, BackendKind};

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Volatile in-memory store.
    Memory,
    /// Persistent redb store under `--data-dir`.
    Redb,
}

/// Skip-hire booking server.
#[derive(Parser, Debug)]
#[command(name = "skiphire-server", version, about = "Skip-hire booking server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "SKIPHIRE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 for an OS-assigned port).
    #[arg(long, env = "SKIPHIRE_PORT", default_value_t = 3000)]
    port: u16,

    /// Storage backend.
    #[arg(long, env = "SKIPHIRE_BACKEND", value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// Directory for persistent storage (redb backend).
    #[arg(long, env = "SKIPHIRE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Base URL of the upstream skip catalog.
    #[arg(long, env = "SKIPHIRE_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Allowed CORS origin (repeatable or comma-separated; "*" allows any).
    #[arg(
        long = "cors-origin",
        env = "SKIPHIRE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    cors_origins: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "SKIPHIRE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Serve Prometheus metrics on this port (disabled when unset).
    #[arg(long, env = "SKIPHIRE_METRICS_PORT")]
    metrics_port: Option<u16>,

    /// Emit logs as JSON.
    #[arg(long, env = "SKIPHIRE_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Completes on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    if let Some(port) = args.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(SocketAddr::from(([0, 0, 0, 0], port)))
            .install()?;
        info!("Prometheus metrics listening on port {port}");
    }

    let backend = match args.backend {
        Backend::Memory => BackendKind::Memory,
        Backend::Redb => {
            std::fs::create_dir_all(&args.data_dir)?;
            BackendKind::Redb {
                path: args.data_dir.join("bookings.redb"),
            }
        }
    };
    let repo = build_repository(&backend)?;

    let mut catalog_config = CatalogConfig::default();
    if let Some(url) = args.catalog_url {
        catalog_config.base_url = url;
    }
    let client = Client::builder()
        .timeout(catalog_config.request_timeout)
        .build()?;
    let catalog = Arc::new(HttpCatalog::new(client, catalog_config.base_url));

    let config = NetworkConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        ..NetworkConfig::default()
    };

    let mut module = NetworkModule::new(config, repo, catalog);
    let port = module.start().await?;
    info!("Skip-hire server ready on port {port}");

    module.serve(shutdown_signal()).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["skiphire-server"]);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 3000);
        assert_eq!(args.backend, Backend::Memory);
        assert_eq!(args.cors_origins, vec!["*"]);
        assert_eq!(args.request_timeout_secs, 30);
        assert_eq!(args.metrics_port, None);
        assert!(!args.log_json);
    }

    #[test]
    fn backend_and_cors_flags_parse() {
        let args = Args::parse_from([
            "skiphire-server",
            "--backend",
            "redb",
            "--cors-origin",
            "http://localhost:5173,https://example.com",
            "--port",
            "0",
        ]);
        assert_eq!(args.backend, Backend::Redb);
        assert_eq!(
            args.cors_origins,
            vec!["http://localhost:5173", "https://example.com"]
        );
        assert_eq!(args.port, 0);
    }
}
