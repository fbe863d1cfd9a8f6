//! Error types for dispatch, observer transport and startup configuration.

use std::path::PathBuf;

use hex::FromHexError;
use thiserror::Error;

use crate::types::ShardId;

/// Terminal errors returned to callers of the gateway.
///
/// Per-observer failures never show up here: they are reported to the
/// dispatcher's [`DispatchObserver`](crate::observe::DispatchObserver) and
/// collapse into [`ProxyError::DispatchFailed`] once every observer is exhausted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    /// The address is not valid hex.
    #[error("invalid address encoding: {}", describe_hex_error(.0))]
    InvalidAddress(FromHexError),

    /// The transaction signature is not valid hex.
    #[error("invalid signature, could not decode hex value: {}", describe_hex_error(.0))]
    InvalidSignature(FromHexError),

    /// A transaction field other than the sender is malformed.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The decoded address does not have the length of the addressing scheme.
    #[error("wrong address length: expected {expected} bytes, got {actual}")]
    WrongAddressLength { expected: usize, actual: usize },

    /// The shard resolver rejected the address for another reason.
    #[error("shard resolution failed: {0}")]
    ShardResolution(String),

    /// The registry has no observer for the resolved shard.
    #[error("no observers available for shard {shard}")]
    NoObservers { shard: ShardId },

    /// Every observer of the resolved shard failed.
    #[error("sending request error")]
    DispatchFailed,

    /// The inbound request was cancelled while dispatching.
    #[error("request cancelled")]
    Cancelled,
}

/// Coarse classification of a [`ProxyError`], used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad client input. Detected before any network call.
    Input,
    /// Shard computation or observer lookup failed (topology/config fault).
    Resolution,
    /// All observers were tried and none answered.
    Dispatch,
    /// The request was cancelled mid-flight.
    Cancelled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Resolution => write!(f, "resolution"),
            Self::Dispatch => write!(f, "dispatch"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAddress(_) | Self::InvalidSignature(_) | Self::InvalidTransaction(_) => {
                ErrorKind::Input
            }
            Self::WrongAddressLength { .. } | Self::ShardResolution(_) | Self::NoObservers { .. } => {
                ErrorKind::Resolution
            }
            Self::DispatchFailed => ErrorKind::Dispatch,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns `true` if the caller sent something the gateway cannot route.
    pub fn is_client_fault(&self) -> bool {
        self.kind() == ErrorKind::Input
    }
}

/// Human-readable reason for a hex decode failure.
pub fn describe_hex_error(err: &FromHexError) -> String {
    match err {
        FromHexError::InvalidHexCharacter { c, index } => {
            format!("invalid byte {c:?} at position {index}")
        }
        FromHexError::OddLength => "odd length hex string".to_string(),
        FromHexError::InvalidStringLength => "invalid hex string length".to_string(),
    }
}

/// Errors from a single call to a single observer.
#[derive(Debug, Error)]
pub enum RestError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The observer answered with a non-success status.
    #[error("observer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The observer's response body could not be decoded.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The call did not complete within the client timeout.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },
}

impl RestError {
    /// Returns `true` if repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

/// Startup failures. None of these can happen once the facade is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("observer list is empty")]
    EmptyObserverList,

    #[error("invalid observer address {address:?}: {reason}")]
    InvalidObserverUrl { address: String, reason: String },

    #[error("number of shards must be at least 1")]
    ZeroShards,

    #[error("missing {0}")]
    MissingComponent(&'static str),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_character_mentions_invalid_byte() {
        let err = ProxyError::InvalidAddress(hex::decode("test").unwrap_err());
        assert!(err.to_string().contains("invalid byte"), "{err}");
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.is_client_fault());
    }

    #[test]
    fn odd_length_is_reported() {
        let err = ProxyError::InvalidAddress(hex::decode("abc").unwrap_err());
        assert!(err.to_string().contains("odd length"));
    }

    #[test]
    fn kinds() {
        assert_eq!(ProxyError::NoObservers { shard: 3 }.kind(), ErrorKind::Resolution);
        assert_eq!(
            ProxyError::WrongAddressLength { expected: 32, actual: 4 }.kind(),
            ErrorKind::Resolution
        );
        assert_eq!(ProxyError::DispatchFailed.kind(), ErrorKind::Dispatch);
        assert_eq!(ProxyError::Cancelled.kind(), ErrorKind::Cancelled);
        assert!(!ProxyError::DispatchFailed.is_client_fault());
    }

    #[test]
    fn dispatch_failure_hides_topology() {
        assert_eq!(ProxyError::DispatchFailed.to_string(), "sending request error");
    }

    #[test]
    fn rest_error_retryable() {
        assert!(RestError::Http("refused".into()).is_retryable());
        assert!(RestError::Timeout { ms: 10 }.is_retryable());
        assert!(RestError::Status { status: 502, body: String::new() }.is_retryable());
        assert!(!RestError::Status { status: 404, body: String::new() }.is_retryable());
    }
}
