//! chainproxy-core: routing and dispatch for the ChainProxy gateway.
//!
//! # Overview
//!
//! ChainProxy sits in front of a set of observer nodes grouped by shard. For
//! every client call it works out which shard owns the target address, picks
//! that shard's observers in configured order, and forwards the request until
//! one of them answers. The core crate defines:
//!
//! - [`ShardResolver`] / [`MultiShardResolver`]: address bytes to shard id
//! - [`ObserverRegistry`] / [`StaticObserverRegistry`]: shard id to ordered observers
//! - [`RestClient`]: the async trait every observer transport implements
//! - [`Dispatcher`]: the ordered, sequential failover loop
//! - [`AccountRouter`] / [`TransactionRouter`]: read and write specializations
//! - [`ProxyFacade`]: the composition root handed to the HTTP layer
//! - [`ProxyError`] / [`RestError`] / [`ConfigError`]: structured error types

pub mod account;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod facade;
pub mod observe;
pub mod registry;
pub mod retry;
pub mod sharding;
pub mod transaction;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

pub use account::{AccountProcessor, AccountRouter, ACCOUNT_PATH};
pub use client::{ObserverRequest, RequestKind, RestClient};
pub use config::{GeneralSettings, LogConfig, ProxyConfig, RestClientConfig};
pub use dispatch::{decode_address, Dispatched, Dispatcher, Route};
pub use error::{ConfigError, ErrorKind, ProxyError, RestError};
pub use facade::{ProxyFacade, ProxyFacadeBuilder, ProxyHandler};
pub use observe::{DispatchObserver, TracingObserver};
pub use registry::{ObserverRegistry, StaticObserverRegistry};
pub use retry::{RetryConfig, RetryPolicy};
pub use sharding::{MultiShardResolver, ShardResolver, DEFAULT_ADDRESS_LEN};
pub use transaction::{NewTransaction, TransactionProcessor, TransactionRouter, TRANSACTION_PATH};
pub use types::{Account, AccountResponse, Observer, ShardId, Transaction, TransactionResponse};
pub use value::TxValue;
