//! The gateway facade handed to the HTTP layer.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::account::AccountProcessor;
use crate::error::{ConfigError, ProxyError};
use crate::transaction::{NewTransaction, TransactionProcessor};
use crate::types::Account;

/// Everything the HTTP layer can ask of the gateway.
#[async_trait]
pub trait ProxyHandler: Send + Sync + 'static {
    async fn get_account(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, ProxyError>;

    async fn send_transaction(
        &self,
        tx: NewTransaction,
        cancel: &CancellationToken,
    ) -> Result<String, ProxyError>;
}

/// Composition of one account processor and one transaction processor.
///
/// Only obtainable through [`ProxyFacade::builder`], which refuses to build
/// without both halves.
#[derive(Clone)]
pub struct ProxyFacade {
    accounts: Arc<dyn AccountProcessor>,
    transactions: Arc<dyn TransactionProcessor>,
}

impl ProxyFacade {
    pub fn builder() -> ProxyFacadeBuilder {
        ProxyFacadeBuilder::default()
    }
}

#[async_trait]
impl ProxyHandler for ProxyFacade {
    async fn get_account(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Account, ProxyError> {
        self.accounts.get_account(address, cancel).await
    }

    async fn send_transaction(
        &self,
        tx: NewTransaction,
        cancel: &CancellationToken,
    ) -> Result<String, ProxyError> {
        self.transactions.send_transaction(tx, cancel).await
    }
}

#[derive(Default)]
pub struct ProxyFacadeBuilder {
    accounts: Option<Arc<dyn AccountProcessor>>,
    transactions: Option<Arc<dyn TransactionProcessor>>,
}

impl ProxyFacadeBuilder {
    pub fn accounts(mut self, processor: Arc<dyn AccountProcessor>) -> Self {
        self.accounts = Some(processor);
        self
    }

    pub fn transactions(mut self, processor: Arc<dyn TransactionProcessor>) -> Self {
        self.transactions = Some(processor);
        self
    }

    pub fn build(self) -> Result<ProxyFacade, ConfigError> {
        let accounts = self
            .accounts
            .ok_or(ConfigError::MissingComponent("account processor"))?;
        let transactions = self
            .transactions
            .ok_or(ConfigError::MissingComponent("transaction processor"))?;
        Ok(ProxyFacade {
            accounts,
            transactions,
        })
    }
}
