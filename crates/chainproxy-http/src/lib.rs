//! chainproxy-http: HTTP transport to observer nodes.
//!
//! [`HttpRestClient`] implements [`chainproxy_core::RestClient`] on top of
//! `reqwest`, with a per-call timeout and an optional same-observer retry.

pub mod client;

pub use client::{HttpClientConfig, HttpRestClient};
