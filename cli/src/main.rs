//! chainproxy: sharding-aware REST gateway in front of observer nodes.
//!
//! Usage:
//! ```bash
//! # Serve with the observers listed in the config file
//! chainproxy --config ./config/config.toml
//!
//! # Serve against an in-process mock observer on shard 0
//! chainproxy --test-http-server-enable --log-level debug
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use chainproxy_api::{ApiServer, ApiServerConfig, ApiState};
use chainproxy_core::{
    AccountRouter, Dispatcher, MultiShardResolver, Observer, ProxyConfig, ProxyFacade,
    StaticObserverRegistry, TransactionRouter, DEFAULT_ADDRESS_LEN,
};
use chainproxy_http::{HttpClientConfig, HttpRestClient};

mod mock_observer;
mod telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "chainproxy",
    about = "Sharding-aware REST gateway for observer nodes",
    version
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "./config/config.toml")]
    config: PathBuf,

    /// Log filter, overriding `[log] level` from the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Start a mock observer and use it as the only observer of shard 0
    #[arg(long)]
    test_http_server_enable: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ProxyConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    telemetry::init_tracing(&config.log);

    let shutdown = CancellationToken::new();

    if cli.test_http_server_enable {
        let base = mock_observer::spawn(shutdown.clone())
            .await
            .context("starting mock observer")?;
        info!(observer = %base, "test HTTP server enabled, replacing configured observers");
        config.observers = vec![Observer::new(0, base)];
    }

    let facade = build_facade(&config)?;
    let state = ApiState::new(Arc::new(facade), shutdown.clone());
    let server = ApiServer::bind(
        &ApiServerConfig::on_port(config.general_settings.server_port),
        state,
    )
    .await?;

    tokio::spawn(wait_for_signal(shutdown));
    server.run().await?;
    Ok(())
}

fn build_facade(config: &ProxyConfig) -> Result<ProxyFacade> {
    let registry = StaticObserverRegistry::new(config.observers.iter().cloned())
        .context("building observer registry")?;
    let resolver = MultiShardResolver::new(DEFAULT_ADDRESS_LEN, registry.num_shards())
        .context("building shard resolver")?;
    let client = HttpRestClient::new(HttpClientConfig::from(&config.rest_client))
        .context("building observer REST client")?;

    info!(
        shards = registry.num_shards(),
        observers = registry.len(),
        "observer registry loaded"
    );

    let dispatcher = Dispatcher::new(Arc::new(resolver), Arc::new(registry), Arc::new(client));

    let facade = ProxyFacade::builder()
        .accounts(Arc::new(AccountRouter::new(dispatcher.clone())))
        .transactions(Arc::new(TransactionRouter::new(dispatcher)))
        .build()?;
    Ok(facade)
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }

    info!("initiating graceful shutdown");
    shutdown.cancel();
}
