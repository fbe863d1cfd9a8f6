//! Observer REST client backed by `reqwest`.
//!
//! Features:
//! - Per-call timeout (the dispatcher shares no time budget across observers)
//! - Optional exponential-backoff retry against the same observer for
//!   transient errors; off by default

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use chainproxy_core::config::RestClientConfig;
use chainproxy_core::error::RestError;
use chainproxy_core::retry::{RetryConfig, RetryPolicy};
use chainproxy_core::RestClient;

/// Configuration for `HttpRestClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&RestClientConfig> for HttpClientConfig {
    fn from(cfg: &RestClientConfig) -> Self {
        Self {
            retry: cfg.retry(),
            request_timeout: cfg.request_timeout(),
        }
    }
}

/// HTTP client shared by every observer of every shard.
pub struct HttpRestClient {
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl HttpRestClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RestError::Http(e.to_string()))?;

        Ok(Self {
            http,
            retry: RetryPolicy::new(config.retry),
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, RestError> {
        Self::new(HttpClientConfig::default())
    }

    fn map_send_error(&self, e: reqwest::Error) -> RestError {
        if e.is_timeout() {
            RestError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            RestError::Http(e.to_string())
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, RestError> {
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let resp = req.send().await.map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RestError::Status { status, body });
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| self.map_send_error(e))
    }

    async fn send(
        &self,
        method: Method,
        base_url: &str,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, RestError> {
        let url = endpoint(base_url, path);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(method.clone(), &url, body).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        tracing::debug!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            url = %url,
                            "retrying observer request"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl RestClient for HttpRestClient {
    async fn get(&self, base_url: &str, path: &str) -> Result<Vec<u8>, RestError> {
        self.send(Method::GET, base_url, path, None).await
    }

    async fn post(&self, base_url: &str, path: &str, body: &[u8]) -> Result<Vec<u8>, RestError> {
        self.send(Method::POST, base_url, path, Some(body)).await
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
