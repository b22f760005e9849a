use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::{PaymentStore, TransactionStore};
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for payment records.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for transaction history.
pub const CF_TRANSACTIONS: &str = "transactions";

impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        PaymentError::InternalError(Box::new(e))
    }
}

/// A persistent store for payments and their transaction history.
///
/// Transaction keys are `payment id ++ created_at (ns, big endian) ++ record id`,
/// so a forward scan over a payment's prefix yields its history in creation
/// order. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path` with both column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_transactions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::internal(format!("{name} column family not found")))
    }
}

fn transaction_key(tx: &Transaction) -> Vec<u8> {
    let nanos = tx.created_at.timestamp_nanos_opt().unwrap_or(i64::MAX);
    let nanos = u64::try_from(nanos).unwrap_or(0);

    let mut key = Vec::with_capacity(40);
    key.extend_from_slice(tx.payment.as_uuid().as_bytes());
    key.extend_from_slice(&nanos.to_be_bytes());
    key.extend_from_slice(tx.id.as_uuid().as_bytes());
    key
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn save(&self, payment: Payment) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        let value = serde_json::to_vec(&payment)?;
        self.db.put_cf(&cf, payment.id.as_uuid().as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, id: PaymentId) -> Result<Option<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(&cf, id.as_uuid().as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn save(&self, tx: Transaction) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let value = serde_json::to_vec(&tx)?;
        self.db.put_cf(&cf, transaction_key(&tx), value)?;
        Ok(())
    }

    async fn history(&self, payment: PaymentId) -> Result<Vec<Transaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let prefix = payment.as_uuid();
        let prefix = prefix.as_bytes();

        let mut history = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            history.push(serde_json::from_slice(&value)?);
        }

        Ok(history)
    }
}
