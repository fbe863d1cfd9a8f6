//! Observability hook for the failover loop.
//!
//! The dispatcher never logs through a global handle; it reports every
//! attempt to the [`DispatchObserver`] it was built with.

use crate::error::RestError;
use crate::types::{Observer, ShardId};

/// Receives per-attempt outcomes from the dispatcher.
///
/// Failures reported here are the only place individual observer errors
/// surface; callers of the dispatcher only ever see the terminal error.
pub trait DispatchObserver: Send + Sync {
    fn on_attempt_failed(
        &self,
        operation: &str,
        shard: ShardId,
        observer: &Observer,
        error: &RestError,
    );

    fn on_success(&self, operation: &str, shard: ShardId, observer: &Observer);
}

/// Emits structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn on_attempt_failed(
        &self,
        operation: &str,
        shard: ShardId,
        observer: &Observer,
        error: &RestError,
    ) {
        tracing::warn!(
            operation,
            shard,
            observer = %observer.address,
            error = %error,
            "observer request failed, trying next"
        );
    }

    fn on_success(&self, operation: &str, shard: ShardId, observer: &Observer) {
        tracing::info!(
            operation,
            shard,
            observer = %observer.address,
            "request served by observer"
        );
    }
}
