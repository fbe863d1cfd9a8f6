//! Ordered failover dispatch across the observers of one shard.
//!
//! ```text
//! hex address ─► decode ─► ShardResolver ─► ObserverRegistry ─► [obs 0, obs 1, ..]
//!                  │             │                  │              │
//!                  └─────────────┴──── terminal ────┘     first success wins,
//!                                                         failures go to the
//!                                                         DispatchObserver
//! ```
//!
//! Attempts are strictly sequential: attempt N+1 starts only after attempt N
//! returned. No observer is tried twice within one dispatch.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::{ObserverRequest, RestClient};
use crate::error::{ProxyError, RestError};
use crate::observe::{DispatchObserver, TracingObserver};
use crate::registry::ObserverRegistry;
use crate::sharding::ShardResolver;
use crate::types::{Observer, ShardId};

/// Decode a hex address. Fails with [`ProxyError::InvalidAddress`].
pub fn decode_address(address_hex: &str) -> Result<Vec<u8>, ProxyError> {
    hex::decode(address_hex).map_err(ProxyError::InvalidAddress)
}

/// The shard an address belongs to and that shard's observers, in failover order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub shard: ShardId,
    pub observers: Arc<[Observer]>,
}

/// A decoded observer answer and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<T> {
    pub value: T,
    pub shard: ShardId,
    pub observer: Observer,
}

/// Shared failover engine behind the account and transaction routers.
///
/// Cheap to clone; all collaborators are shared read-only.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Arc<dyn ShardResolver>,
    registry: Arc<dyn ObserverRegistry>,
    client: Arc<dyn RestClient>,
    events: Arc<dyn DispatchObserver>,
}

impl Dispatcher {
    /// Build a dispatcher reporting attempts through [`TracingObserver`].
    pub fn new(
        resolver: Arc<dyn ShardResolver>,
        registry: Arc<dyn ObserverRegistry>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self {
            resolver,
            registry,
            client,
            events: Arc::new(TracingObserver),
        }
    }

    /// Replace the observability hook.
    pub fn with_observer(mut self, events: Arc<dyn DispatchObserver>) -> Self {
        self.events = events;
        self
    }

    /// Resolve decoded address bytes to a shard and its observers.
    ///
    /// Resolver and registry errors are returned unchanged.
    pub fn resolve(&self, address: &[u8]) -> Result<Route, ProxyError> {
        let shard = self.resolver.compute_shard_id(address)?;
        let observers = self.registry.observers(shard)?;
        if observers.is_empty() {
            return Err(ProxyError::NoObservers { shard });
        }
        Ok(Route { shard, observers })
    }

    /// Decode, resolve and run `request` against the address's shard.
    ///
    /// `extract` turns an observer's response body into the result; a body it
    /// rejects counts as a failed attempt and the next observer is tried.
    pub async fn dispatch<T, F>(
        &self,
        address_hex: &str,
        request: &ObserverRequest,
        extract: F,
        cancel: &CancellationToken,
    ) -> Result<Dispatched<T>, ProxyError>
    where
        F: Fn(&[u8]) -> Result<T, RestError>,
    {
        let address = decode_address(address_hex)?;
        let route = self.resolve(&address)?;
        self.run(&route, request, extract, cancel).await
    }

    /// The failover loop over an already resolved route.
    pub async fn run<T, F>(
        &self,
        route: &Route,
        request: &ObserverRequest,
        extract: F,
        cancel: &CancellationToken,
    ) -> Result<Dispatched<T>, ProxyError>
    where
        F: Fn(&[u8]) -> Result<T, RestError>,
    {
        for observer in route.observers.iter() {
            if cancel.is_cancelled() {
                return Err(ProxyError::Cancelled);
            }

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(
                        operation = request.operation,
                        shard = route.shard,
                        observer = %observer.address,
                        "dispatch cancelled mid-request"
                    );
                    return Err(ProxyError::Cancelled);
                }
                res = request.send(self.client.as_ref(), &observer.address) => res,
            };

            match attempt.and_then(|body| extract(&body)) {
                Ok(value) => {
                    self.events.on_success(request.operation, route.shard, observer);
                    return Ok(Dispatched {
                        value,
                        shard: route.shard,
                        observer: observer.clone(),
                    });
                }
                Err(e) => {
                    self.events
                        .on_attempt_failed(request.operation, route.shard, observer, &e);
                }
            }
        }

        Err(ProxyError::DispatchFailed)
    }
}
