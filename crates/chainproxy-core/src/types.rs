//! Wire and domain types shared by the dispatcher, routers and HTTP layer.

use serde::{Deserialize, Serialize};

use crate::value::{self, TxValue};

/// Identifier of a logical partition of the network.
pub type ShardId = u32;

/// A backend observer node serving one shard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observer {
    #[serde(alias = "shardId", alias = "ShardId")]
    pub shard_id: ShardId,
    /// Base URL, e.g. `http://10.0.0.5:8080`.
    #[serde(alias = "Address")]
    pub address: String,
}

impl Observer {
    pub fn new(shard_id: ShardId, address: impl Into<String>) -> Self {
        Self {
            shard_id,
            address: address.into(),
        }
    }
}

impl std::fmt::Display for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (shard {})", self.address, self.shard_id)
    }
}

/// Account state as reported by an observer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub nonce: u64,
    /// Arbitrary-precision decimal. Observers may send it as a JSON number.
    #[serde(deserialize_with = "value::deserialize_decimal_string")]
    pub balance: String,
}

/// Envelope an observer wraps around [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
}

/// Transaction as forwarded to an observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub sender: String,
    pub receiver: String,
    pub value: TxValue,
    pub data: String,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

/// An observer's answer to a transaction submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_accepts_camel_case_shard_id() {
        let obs: Observer =
            serde_json::from_str(r#"{"shardId": 2, "address": "http://a:1"}"#).unwrap();
        assert_eq!(obs, Observer::new(2, "http://a:1"));
    }

    #[test]
    fn account_balance_from_number_or_string() {
        let a: AccountResponse = serde_json::from_str(
            r#"{"account":{"address":"ab","nonce":7,"balance":123456789012345678901234567890}}"#,
        )
        .unwrap();
        assert_eq!(a.account.balance, "123456789012345678901234567890");

        let b: AccountResponse =
            serde_json::from_str(r#"{"account":{"address":"ab","nonce":7,"balance":"42"}}"#)
                .unwrap();
        assert_eq!(b.account.balance, "42");
    }

    #[test]
    fn account_ignores_unknown_observer_fields() {
        let a: AccountResponse = serde_json::from_str(
            r#"{"account":{"address":"ab","nonce":1,"balance":"5","codeHash":null,"rootHash":"00"}}"#,
        )
        .unwrap();
        assert_eq!(a.account.nonce, 1);
    }

    #[test]
    fn transaction_response_uses_camel_case_hash() {
        let r: TransactionResponse = serde_json::from_str(r#"{"txHash":"abc"}"#).unwrap();
        assert_eq!(r.tx_hash, "abc");
    }
}
