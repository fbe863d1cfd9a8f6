//! HTTP server wrapping the API router.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::routes::create_router;
use super::state::ApiState;

/// Errors from the API server.
#[derive(Debug, Error)]
pub enum ApiServerError {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to listen on.
    pub listen_addr: SocketAddr,
}

impl ApiServerConfig {
    /// Listen on every interface at `port`.
    pub fn on_port(port: u16) -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::on_port(8079)
    }
}

/// A bound server, ready to serve until its shutdown token fires.
pub struct ApiServer {
    listener: TcpListener,
    router: axum::Router,
    shutdown: CancellationToken,
}

impl ApiServer {
    /// Bind the listener and build the router. No requests are served until [`run`](Self::run).
    pub async fn bind(config: &ApiServerConfig, state: ApiState) -> Result<Self, ApiServerError> {
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .map_err(|source| ApiServerError::Bind {
                addr: config.listen_addr,
                source,
            })?;
        let shutdown = state.shutdown.clone();

        Ok(Self {
            listener,
            router: create_router(state),
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ApiServerError> {
        self.listener.local_addr().map_err(ApiServerError::Serve)
    }

    /// Serve until the shutdown token is cancelled, then drain in-flight requests.
    pub async fn run(self) -> Result<(), ApiServerError> {
        let addr = self.local_addr()?;
        info!(addr = %addr, "API server listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(self.shutdown.cancelled_owned())
            .await
            .map_err(ApiServerError::Serve)?;

        info!("API server stopped");
        Ok(())
    }
}
