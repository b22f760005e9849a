use super::outcome::{Outcome, RecordsOutcome};
use crate::error::PaymentError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Internally generated identity of a [`Payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A positive amount in minor currency units (øre, cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub fn new(minor_units: u64) -> Result<Self, PaymentError> {
        if minor_units > 0 {
            Ok(Self(minor_units))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = PaymentError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum RecurringType {
    /// Card stored for merchant-initiated charges at arbitrary times.
    #[serde(rename = "S")]
    Stored,
    /// Card stored for charges at a fixed interval.
    #[serde(rename = "R")]
    Regular,
}

impl RecurringType {
    pub fn code(&self) -> &'static str {
        match self {
            RecurringType::Stored => "S",
            RecurringType::Regular => "R",
        }
    }
}

/// Terms under which the gateway keeps the card for unattended charges.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct RecurringTerms {
    pub recurring_type: RecurringType,
    /// Minimum number of days between two charges.
    pub minimum_frequency: u16,
    pub expiry_date: NaiveDate,
}

/// The order details a caller supplies when registering a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub redirect_url: String,
    pub amount: Amount,
    pub currency_code: String,
    pub order_number: String,
    pub description: String,
    /// Overrides the configured default language when set.
    pub language: Option<String>,
}

/// A payment intent registered with the gateway.
///
/// Written once at registration time and never mutated afterwards. State
/// transitions are tracked by the payment's transaction history instead.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Payment {
    pub id: PaymentId,
    /// Assigned by the gateway; only present when registration succeeded.
    pub transaction_id: Option<String>,
    pub amount: Amount,
    pub currency_code: String,
    pub order_number: String,
    pub description: String,
    pub recurring: Option<RecurringTerms>,
    pub outcome: Outcome,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(order: &PaymentOrder, recurring: Option<RecurringTerms>) -> Self {
        Self {
            id: PaymentId::new(),
            transaction_id: None,
            amount: order.amount,
            currency_code: order.currency_code.clone(),
            order_number: order.order_number.clone(),
            description: order.description.clone(),
            recurring,
            outcome: Outcome::Pending,
            created_at: Utc::now(),
        }
    }

    /// True once the gateway accepted the registration and assigned a transaction id.
    pub fn completed(&self) -> bool {
        self.outcome.is_success() && self.transaction_id.is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    pub(crate) fn record_registration(&mut self, transaction_id: String) {
        self.transaction_id = Some(transaction_id);
        self.outcome = Outcome::Success;
    }
}

impl RecordsOutcome for Payment {
    fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}
