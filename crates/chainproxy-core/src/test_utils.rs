//! Stubs for the dispatcher's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::RestClient;
use crate::error::{ProxyError, RestError};
use crate::observe::DispatchObserver;
use crate::registry::ObserverRegistry;
use crate::sharding::ShardResolver;
use crate::types::{Observer, ShardId};

/// What a scripted observer does when called.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Fail,
    /// Never completes. Used for cancellation tests.
    Hang,
}

/// One recorded call: method, full URL, optional body.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Rest client answering per observer base URL. Unscripted observers fail.
#[derive(Default)]
pub struct ScriptedClient {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, base_url: &str, reply: Reply) -> Self {
        self.replies.insert(base_url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    async fn answer(&self, base_url: &str) -> Result<Vec<u8>, RestError> {
        match self.replies.get(base_url).cloned().unwrap_or(Reply::Fail) {
            Reply::Json(v) => Ok(serde_json::to_vec(&v).unwrap()),
            Reply::Fail => Err(RestError::Http(format!("{base_url} unreachable"))),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl RestClient for ScriptedClient {
    async fn get(&self, base_url: &str, path: &str) -> Result<Vec<u8>, RestError> {
        self.calls.lock().unwrap().push(Call {
            method: "GET",
            url: format!("{base_url}{path}"),
            body: None,
        });
        self.answer(base_url).await
    }

    async fn post(&self, base_url: &str, path: &str, body: &[u8]) -> Result<Vec<u8>, RestError> {
        self.calls.lock().unwrap().push(Call {
            method: "POST",
            url: format!("{base_url}{path}"),
            body: Some(serde_json::from_slice(body).unwrap()),
        });
        self.answer(base_url).await
    }
}

pub struct StubResolver {
    result: Result<ShardId, ProxyError>,
    pub calls: AtomicUsize,
}

impl StubResolver {
    pub fn shard(shard: ShardId) -> Arc<Self> {
        Arc::new(Self { result: Ok(shard), calls: AtomicUsize::new(0) })
    }

    pub fn failing(err: ProxyError) -> Arc<Self> {
        Arc::new(Self { result: Err(err), calls: AtomicUsize::new(0) })
    }
}

impl ShardResolver for StubResolver {
    fn compute_shard_id(&self, _address: &[u8]) -> Result<ShardId, ProxyError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}

pub struct StubRegistry {
    result: Result<Arc<[Observer]>, ProxyError>,
    pub calls: AtomicUsize,
}

impl StubRegistry {
    pub fn with(addresses: &[&str]) -> Arc<Self> {
        let list: Vec<_> = addresses.iter().map(|a| Observer::new(0, *a)).collect();
        Arc::new(Self { result: Ok(Arc::from(list)), calls: AtomicUsize::new(0) })
    }

    pub fn failing(err: ProxyError) -> Arc<Self> {
        Arc::new(Self { result: Err(err), calls: AtomicUsize::new(0) })
    }
}

impl ObserverRegistry for StubRegistry {
    fn observers(&self, _shard: ShardId) -> Result<Arc<[Observer]>, ProxyError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}

/// Collects `(outcome, observer address)` pairs.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<(&'static str, String)>>,
}

impl DispatchObserver for RecordingObserver {
    fn on_attempt_failed(&self, _op: &str, _shard: ShardId, observer: &Observer, _e: &RestError) {
        self.events.lock().unwrap().push(("failed", observer.address.clone()));
    }

    fn on_success(&self, _op: &str, _shard: ShardId, observer: &Observer) {
        self.events.lock().unwrap().push(("ok", observer.address.clone()));
    }
}
