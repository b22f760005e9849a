//! Guaranteed persistence of records that wrap a remote call.
//!
//! A [`Finalizer`] takes ownership of a freshly built record before the
//! gateway is called. Settling it applies the outcome and saves the record
//! once. If it is dropped unsettled (the caller's future was cancelled or a
//! panic unwound through the call) the record is saved from `Drop` instead,
//! so no exit path loses an attempt.

use crate::domain::gateway::GatewayError;
use crate::domain::outcome::{RecordId, RecordsOutcome};
use crate::domain::payment::Payment;
use crate::domain::ports::{PaymentStore, TransactionStore};
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, warn};

/// A record that knows which store it belongs in.
#[async_trait]
pub trait Persist: RecordsOutcome + Clone + Send + Sync + 'static {
    type Store: ?Sized + Send + Sync + 'static;

    fn record_id(&self) -> RecordId;

    async fn persist(&self, store: &Self::Store) -> Result<()>;
}

#[async_trait]
impl Persist for Payment {
    type Store = dyn PaymentStore;

    fn record_id(&self) -> RecordId {
        RecordId::Payment(self.id)
    }

    async fn persist(&self, store: &Self::Store) -> Result<()> {
        store.save(self.clone()).await
    }
}

#[async_trait]
impl Persist for Transaction {
    type Store = dyn TransactionStore;

    fn record_id(&self) -> RecordId {
        RecordId::Transaction(self.id)
    }

    async fn persist(&self, store: &Self::Store) -> Result<()> {
        store.save(self.clone()).await
    }
}

pub struct Finalizer<R: Persist> {
    record: Option<R>,
    store: Arc<R::Store>,
}

impl<R: Persist> Finalizer<R> {
    pub fn new(record: R, store: Arc<R::Store>) -> Self {
        Self {
            record: Some(record),
            store,
        }
    }

    /// Applies the gateway outcome, persists the record and returns it.
    ///
    /// A gateway fault is written onto the record before it is saved. Any
    /// gateway error is returned only after the save completed.
    pub async fn settle<T, F>(
        mut self,
        outcome: std::result::Result<T, GatewayError>,
        on_success: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut R, T),
    {
        let record = self
            .record
            .as_mut()
            .ok_or_else(|| PaymentError::internal("record already finalized"))?;

        let gateway_error = match outcome {
            Ok(response) => {
                on_success(record, response);
                None
            }
            Err(e) => {
                if let Some(fault) = e.fault() {
                    record.set_failure(fault);
                }
                Some(e)
            }
        };

        let id = record.record_id();
        let persisted = record.persist(&*self.store).await;
        let record = self.record.take();

        if let Err(e) = persisted {
            if let Some(gateway_error) = &gateway_error {
                error!(record = %id, error = %gateway_error, "gateway error shadowed by storage failure");
            }
            return Err(e);
        }

        match (record, gateway_error) {
            (Some(record), None) => Ok(record),
            (_, Some(source)) => Err(PaymentError::Gateway { record: id, source }),
            (None, None) => Err(PaymentError::internal("record already finalized")),
        }
    }
}

impl<R: Persist> Drop for Finalizer<R> {
    fn drop(&mut self) {
        let Some(record) = self.record.take() else {
            return;
        };
        let id = record.record_id();

        match Handle::try_current() {
            Ok(handle) => {
                warn!(record = %id, "remote call interrupted, persisting record from drop guard");
                let store = Arc::clone(&self.store);
                handle.spawn(async move {
                    if let Err(e) = record.persist(&*store).await {
                        error!(record = %id, error = %e, "failed to persist interrupted record");
                    }
                });
            }
            Err(_) => {
                error!(record = %id, "no runtime available, interrupted record was not persisted");
            }
        }
    }
}
