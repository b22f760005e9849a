use super::gateway::ProcessResponse;
use super::outcome::{Outcome, RecordsOutcome};
use super::payment::{Amount, Payment, PaymentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Auth,
    Sale,
    Capture,
    Credit,
    Annul,
    Verify,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Auth,
        Operation::Sale,
        Operation::Capture,
        Operation::Credit,
        Operation::Annul,
        Operation::Verify,
    ];

    /// Operations that move an amount and therefore carry one.
    pub fn requires_amount(&self) -> bool {
        matches!(self, Operation::Capture | Operation::Credit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Auth => "AUTH",
            Operation::Sale => "SALE",
            Operation::Capture => "CAPTURE",
            Operation::Credit => "CREDIT",
            Operation::Annul => "ANNUL",
            Operation::Verify => "VERIFY",
        }
    }
}

/// Internally generated identity of a [`Transaction`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecordId(Uuid);

impl TransactionRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation applied to a payment. Appended to the payment's history
/// and never modified after it is persisted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Transaction {
    pub id: TransactionRecordId,
    pub payment: PaymentId,
    /// Gateway transaction id, copied from the payment at creation time.
    pub transaction_id: String,
    pub operation: Operation,
    /// Only set for CAPTURE and CREDIT.
    pub amount: Option<Amount>,
    pub outcome: Outcome,
    pub authorization_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        payment: &Payment,
        transaction_id: String,
        operation: Operation,
        amount: Option<Amount>,
    ) -> Self {
        Self {
            id: TransactionRecordId::new(),
            payment: payment.id,
            transaction_id,
            operation,
            amount,
            outcome: Outcome::Pending,
            authorization_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }

    pub(crate) fn record_response(&mut self, response: ProcessResponse) {
        self.authorization_id = response.authorization_id;
        self.outcome = Outcome::Success;
    }
}

impl RecordsOutcome for Transaction {
    fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}
