use super::gateway::GatewayFault;
use super::payment::PaymentId;
use super::transaction::TransactionRecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a persisted record of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordId {
    Payment(PaymentId),
    Transaction(TransactionRecordId),
}

impl RecordId {
    pub fn payment(&self) -> Option<PaymentId> {
        match self {
            RecordId::Payment(id) => Some(*id),
            RecordId::Transaction(_) => None,
        }
    }

    pub fn transaction(&self) -> Option<TransactionRecordId> {
        match self {
            RecordId::Transaction(id) => Some(*id),
            RecordId::Payment(_) => None,
        }
    }
}

impl From<PaymentId> for RecordId {
    fn from(id: PaymentId) -> Self {
        RecordId::Payment(id)
    }
}

impl From<TransactionRecordId> for RecordId {
    fn from(id: TransactionRecordId) -> Self {
        RecordId::Transaction(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Payment(id) => write!(f, "payment {id}"),
            RecordId::Transaction(id) => write!(f, "transaction {id}"),
        }
    }
}

/// The failure details reported by the gateway for a rejected call.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Failure {
    pub code: String,
    /// The gateway subsystem that rejected the call, when reported.
    pub response_source: Option<String>,
    pub message: String,
}

impl From<&GatewayFault> for Failure {
    fn from(fault: &GatewayFault) -> Self {
        Self {
            code: fault.code.clone(),
            response_source: fault.response_source.clone(),
            message: fault.message.clone(),
        }
    }
}

/// Result of the remote round trip attached to a record.
///
/// A record persisted as `Pending` was written while the remote result was
/// unknown: the transport failed or the call was interrupted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Success,
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Implemented by every record kind that captures a gateway round trip, so
/// fault mapping is written once for payments and transactions alike.
pub trait RecordsOutcome {
    fn outcome(&self) -> &Outcome;

    fn set_outcome(&mut self, outcome: Outcome);

    fn set_failure(&mut self, fault: &GatewayFault) {
        self.set_outcome(Outcome::Failure(fault.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(Outcome);

    impl RecordsOutcome for Probe {
        fn outcome(&self) -> &Outcome {
            &self.0
        }

        fn set_outcome(&mut self, outcome: Outcome) {
            self.0 = outcome;
        }
    }

    #[test]
    fn test_set_failure_copies_fault_fields() {
        let mut probe = Probe(Outcome::Pending);
        let fault = GatewayFault::new("14", "Invalid card number").with_source("Issuer");

        probe.set_failure(&fault);

        let failure = probe.outcome().failure().unwrap();
        assert_eq!(failure.code, "14");
        assert_eq!(failure.response_source.as_deref(), Some("Issuer"));
        assert_eq!(failure.message, "Invalid card number");
        assert!(!probe.outcome().is_success());
    }

    #[test]
    fn test_record_id_accessors() {
        let payment = PaymentId::new();
        let record = RecordId::from(payment);
        assert_eq!(record.payment(), Some(payment));
        assert_eq!(record.transaction(), None);
        assert_eq!(record.to_string(), format!("payment {payment}"));

        let tx = TransactionRecordId::new();
        let record = RecordId::from(tx);
        assert_eq!(record.transaction(), Some(tx));
        assert_eq!(record.payment(), None);
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let json = serde_json::to_value(Outcome::Success).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success" }));

        let failed = Outcome::Failure(Failure {
            code: "99".to_string(),
            response_source: None,
            message: "Unknown".to_string(),
        });
        let json = serde_json::to_string(&failed).unwrap();
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, failed);
    }
}
