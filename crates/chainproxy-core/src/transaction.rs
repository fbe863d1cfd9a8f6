//! Transaction submission routed to the sender's shard.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::ObserverRequest;
use crate::dispatch::{decode_address, Dispatcher};
use crate::error::{describe_hex_error, ProxyError, RestError};
use crate::types::{Transaction, TransactionResponse};
use crate::value::TxValue;

/// Observer path transactions are posted to.
pub const TRANSACTION_PATH: &str = "/transaction/send";

/// Client-supplied transaction fields, signature still as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub nonce: u64,
    /// Hex address; picks the shard.
    pub sender: String,
    pub receiver: String,
    pub value: TxValue,
    pub data: String,
    pub signature: Vec<u8>,
}

impl NewTransaction {
    /// Wire form sent to observers, with the signature hex-encoded.
    pub fn to_wire(&self) -> Transaction {
        Transaction {
            nonce: self.nonce,
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            value: self.value,
            data: self.data.clone(),
            signature: hex::encode(&self.signature),
        }
    }
}

/// Submits transactions and returns the resulting hash.
#[async_trait]
pub trait TransactionProcessor: Send + Sync {
    async fn send_transaction(
        &self,
        tx: NewTransaction,
        cancel: &CancellationToken,
    ) -> Result<String, ProxyError>;
}

/// Write specialization of the [`Dispatcher`].
#[derive(Clone)]
pub struct TransactionRouter {
    dispatcher: Dispatcher,
}

impl TransactionRouter {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl TransactionProcessor for TransactionRouter {
    async fn send_transaction(
        &self,
        tx: NewTransaction,
        cancel: &CancellationToken,
    ) -> Result<String, ProxyError> {
        // Sender errors take precedence over everything else.
        let sender = decode_address(&tx.sender)?;
        hex::decode(&tx.receiver).map_err(|e| {
            ProxyError::InvalidTransaction(format!("receiver: {}", describe_hex_error(&e)))
        })?;

        let route = self.dispatcher.resolve(&sender)?;
        let request = ObserverRequest::post_json("transaction", TRANSACTION_PATH, &tx.to_wire())
            .map_err(|e| ProxyError::InvalidTransaction(e.to_string()))?;

        let dispatched = self
            .dispatcher
            .run(&route, &request, decode_tx_hash, cancel)
            .await?;

        tracing::info!(
            shard = dispatched.shard,
            observer = %dispatched.observer.address,
            tx_hash = %dispatched.value,
            "transaction sent"
        );
        Ok(dispatched.value)
    }
}

fn decode_tx_hash(body: &[u8]) -> Result<String, RestError> {
    let response: TransactionResponse = serde_json::from_slice(body)?;
    Ok(response.tx_hash)
}
