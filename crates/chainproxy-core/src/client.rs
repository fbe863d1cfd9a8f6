//! The `RestClient` trait: the transport every observer call goes through.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RestError;

/// Performs one GET or POST against one observer.
///
/// Bodies travel as raw JSON bytes so that callers decode into their own
/// types without an intermediate `serde_json::Value`.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` and are shared as `Arc<dyn RestClient>`.
#[async_trait]
pub trait RestClient: Send + Sync + 'static {
    /// `GET {base_url}{path}` and return the response body.
    async fn get(&self, base_url: &str, path: &str) -> Result<Vec<u8>, RestError>;

    /// `POST {base_url}{path}` with a JSON body and return the response body.
    async fn post(&self, base_url: &str, path: &str, body: &[u8]) -> Result<Vec<u8>, RestError>;
}

/// HTTP method plus payload of an observer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Get,
    Post(Vec<u8>),
}

/// A request that can be replayed against any observer of a shard.
#[derive(Debug, Clone)]
pub struct ObserverRequest {
    /// Short name used in logs (`"account"`, `"transaction"`).
    pub operation: &'static str,
    pub path: String,
    pub kind: RequestKind,
}

impl ObserverRequest {
    pub fn get(operation: &'static str, path: impl Into<String>) -> Self {
        Self {
            operation,
            path: path.into(),
            kind: RequestKind::Get,
        }
    }

    pub fn post_json<T: Serialize>(
        operation: &'static str,
        path: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            operation,
            path: path.into(),
            kind: RequestKind::Post(serde_json::to_vec(payload)?),
        })
    }

    /// Send this request to the observer at `base_url`.
    pub async fn send(&self, client: &dyn RestClient, base_url: &str) -> Result<Vec<u8>, RestError> {
        match &self.kind {
            RequestKind::Get => client.get(base_url, &self.path).await,
            RequestKind::Post(body) => client.post(base_url, &self.path, body).await,
        }
    }
}
