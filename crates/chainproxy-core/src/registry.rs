//! Shard to observer lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::error::{ConfigError, ProxyError};
use crate::types::{Observer, ShardId};

/// Resolves a shard to its observers.
///
/// The returned order is the failover order. Implementations must not
/// shuffle or reorder it between calls.
pub trait ObserverRegistry: Send + Sync {
    fn observers(&self, shard: ShardId) -> Result<Arc<[Observer]>, ProxyError>;
}

/// Registry loaded once from configuration and immutable afterwards.
#[derive(Debug, Clone)]
pub struct StaticObserverRegistry {
    shards: BTreeMap<ShardId, Arc<[Observer]>>,
}

impl StaticObserverRegistry {
    /// Group `observers` by shard, keeping their load order within a shard.
    pub fn new(observers: impl IntoIterator<Item = Observer>) -> Result<Self, ConfigError> {
        let mut grouped: BTreeMap<ShardId, Vec<Observer>> = BTreeMap::new();
        for observer in observers {
            validate_address(&observer.address)?;
            grouped.entry(observer.shard_id).or_default().push(observer);
        }
        if grouped.is_empty() {
            return Err(ConfigError::EmptyObserverList);
        }

        let shards = grouped
            .into_iter()
            .map(|(shard, list)| (shard, Arc::from(list)))
            .collect();
        Ok(Self { shards })
    }

    /// Number of distinct shards with at least one observer.
    pub fn num_shards(&self) -> u32 {
        self.shards.len() as u32
    }

    pub fn shard_ids(&self) -> impl Iterator<Item = ShardId> + '_ {
        self.shards.keys().copied()
    }

    /// Total number of observers across all shards.
    pub fn len(&self) -> usize {
        self.shards.values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

impl ObserverRegistry for StaticObserverRegistry {
    fn observers(&self, shard: ShardId) -> Result<Arc<[Observer]>, ProxyError> {
        self.shards
            .get(&shard)
            .cloned()
            .ok_or(ProxyError::NoObservers { shard })
    }
}

fn validate_address(address: &str) -> Result<(), ConfigError> {
    let url = Url::parse(address).map_err(|e| ConfigError::InvalidObserverUrl {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidObserverUrl {
            address: address.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
