use super::gateway::{
    GatewayError, ProcessRequest, ProcessResponse, RegisterRequest, RegisterResponse,
};
use super::payment::{Payment, PaymentId};
use super::transaction::{Operation, Transaction};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote payment gateway. Implementations own transport, authentication
/// and timeouts; the core never retries a call.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> std::result::Result<RegisterResponse, GatewayError>;

    async fn process(
        &self,
        request: &ProcessRequest,
    ) -> std::result::Result<ProcessResponse, GatewayError>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Upserts by payment id.
    async fn save(&self, payment: Payment) -> Result<()>;
    async fn get(&self, id: PaymentId) -> Result<Option<Payment>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Upserts by record id.
    async fn save(&self, tx: Transaction) -> Result<()>;

    /// All transactions recorded for `payment`, in creation order.
    async fn history(&self, payment: PaymentId) -> Result<Vec<Transaction>>;

    /// Whether any transaction for `payment` has one of `operations`.
    ///
    /// A lookup for callers and reporting. The engine folds the full
    /// [`history`](Self::history) through `derive_state` so every rule sees
    /// the same snapshot.
    async fn exists(&self, payment: PaymentId, operations: &[Operation]) -> Result<bool> {
        Ok(self
            .history(payment)
            .await?
            .iter()
            .any(|tx| operations.contains(&tx.operation)))
    }
}

pub type GatewayHandle = Arc<dyn GatewayClient>;
pub type PaymentStoreHandle = Arc<dyn PaymentStore>;
pub type TransactionStoreHandle = Arc<dyn TransactionStore>;
