//! Shared state for API handlers.

use std::sync::Arc;

use chainproxy_core::ProxyHandler;
use tokio_util::sync::CancellationToken;

/// Handed to every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct ApiState {
    pub handler: Arc<dyn ProxyHandler>,
    /// Cancelled on shutdown. Each request dispatches under a child token.
    pub shutdown: CancellationToken,
}

impl ApiState {
    pub fn new(handler: Arc<dyn ProxyHandler>, shutdown: CancellationToken) -> Self {
        Self { handler, shutdown }
    }

    pub(crate) fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
