use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{PaymentStore, TransactionStore};
use crate::domain::transaction::{Operation, Transaction};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payments.
///
/// Clones share the same map, so a test can keep one handle for inspection
/// while the registrar owns another.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }
}

/// A thread-safe in-memory store for transactions, keeping each payment's
/// history in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    histories: Arc<RwLock<HashMap<PaymentId, Vec<Transaction>>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of transactions across all payments.
    pub async fn len(&self) -> usize {
        self.histories.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn save(&self, tx: Transaction) -> Result<()> {
        let mut histories = self.histories.write().await;
        let history = histories.entry(tx.payment).or_default();
        match history.iter_mut().find(|existing| existing.id == tx.id) {
            Some(existing) => *existing = tx,
            None => history.push(tx),
        }
        Ok(())
    }

    async fn history(&self, payment: PaymentId) -> Result<Vec<Transaction>> {
        let histories = self.histories.read().await;
        Ok(histories.get(&payment).cloned().unwrap_or_default())
    }

    async fn exists(&self, payment: PaymentId, operations: &[Operation]) -> Result<bool> {
        let histories = self.histories.read().await;
        Ok(histories
            .get(&payment)
            .is_some_and(|history| history.iter().any(|tx| operations.contains(&tx.operation))))
    }
}
