//! Request and response bodies of the REST API.

use chainproxy_core::{Account, TxValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEnvelope {
    pub account: Account,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

/// Body of `POST /transaction/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTransactionRequest {
    #[serde(default)]
    pub nonce: u64,
    pub sender: String,
    pub receiver: String,
    pub value: TxValue,
    #[serde(default)]
    pub data: String,
    /// Hex-encoded signature.
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTransactionResponse {
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}
