//! Account lookups routed to the owning shard.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::ObserverRequest;
use crate::dispatch::Dispatcher;
use crate::error::{ProxyError, RestError};
use crate::types::{Account, AccountResponse};

/// Observer path prefix for account queries (`/address/{hex}`).
pub const ACCOUNT_PATH: &str = "/address";

/// Fetches account state for an address.
#[async_trait]
pub trait AccountProcessor: Send + Sync {
    async fn get_account(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, ProxyError>;
}

/// Read specialization of the [`Dispatcher`].
#[derive(Clone)]
pub struct AccountRouter {
    dispatcher: Dispatcher,
}

impl AccountRouter {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl AccountProcessor for AccountRouter {
    async fn get_account(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, ProxyError> {
        let request = ObserverRequest::get("account", format!("{ACCOUNT_PATH}/{address}"));
        let dispatched = self
            .dispatcher
            .dispatch(address, &request, decode_account, cancel)
            .await?;
        Ok(dispatched.value)
    }
}

fn decode_account(body: &[u8]) -> Result<Account, RestError> {
    let response: AccountResponse = serde_json::from_slice(body)?;
    Ok(response.account)
}
