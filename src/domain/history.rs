//! Payment state derived from its transaction history.
//!
//! There is no stored status field: which operations are legal is decided
//! from the recorded operations alone, which keeps the rules independent of
//! any storage backend.

use super::payment::PaymentId;
use super::transaction::{Operation, Transaction};
use crate::error::PreconditionError;

/// Operations that settle money on a payment.
pub const SETTLING_OPERATIONS: [Operation; 2] = [Operation::Capture, Operation::Sale];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaymentState {
    /// An AUTH row is recorded.
    pub has_auth: bool,
    /// A CAPTURE or SALE row is recorded.
    pub has_settled: bool,
}

/// Folds a payment's history into the facts the precondition rules need.
///
/// Every recorded row counts, whatever its outcome.
pub fn derive_state<'a, I>(history: I) -> PaymentState
where
    I: IntoIterator<Item = &'a Transaction>,
{
    history
        .into_iter()
        .fold(PaymentState::default(), |mut state, tx| {
            match tx.operation {
                Operation::Auth => state.has_auth = true,
                Operation::Capture | Operation::Sale => state.has_settled = true,
                Operation::Credit | Operation::Annul | Operation::Verify => {}
            }
            state
        })
}

impl PaymentState {
    pub fn require_auth(&self, payment: PaymentId) -> Result<(), PreconditionError> {
        if self.has_auth {
            Ok(())
        } else {
            Err(PreconditionError::PaymentNotAuthorized(payment))
        }
    }

    /// Checks whether `operation` may be applied to a payment in this state.
    pub fn check(
        &self,
        payment: PaymentId,
        completed: bool,
        operation: Operation,
    ) -> Result<(), PreconditionError> {
        match operation {
            Operation::Auth | Operation::Sale | Operation::Verify => {
                if completed {
                    Ok(())
                } else {
                    Err(PreconditionError::RegistrationIncomplete(payment))
                }
            }
            Operation::Capture => self.require_auth(payment),
            Operation::Credit => {
                if self.has_settled {
                    Ok(())
                } else {
                    Err(PreconditionError::NoAmountCaptured(payment))
                }
            }
            Operation::Annul => {
                self.require_auth(payment)?;
                if self.has_settled {
                    Err(PreconditionError::AmountAlreadyCaptured(payment))
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::GatewayFault;
    use crate::domain::outcome::RecordsOutcome;
    use crate::domain::payment::{Amount, Payment, PaymentOrder};
    use rand::Rng;
    use rand::seq::SliceRandom;

    fn payment() -> Payment {
        let order = PaymentOrder {
            redirect_url: "https://shop.example/return".to_string(),
            amount: Amount::new(1000).unwrap(),
            currency_code: "NOK".to_string(),
            order_number: "1".to_string(),
            description: "test".to_string(),
            language: None,
        };
        Payment::new(&order, None)
    }

    fn row(payment: &Payment, operation: Operation) -> Transaction {
        Transaction::new(payment, "t1".to_string(), operation, None)
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(derive_state(std::iter::empty()), PaymentState::default());
    }

    #[test]
    fn test_derive_state_flags() {
        let p = payment();
        let history = vec![row(&p, Operation::Auth), row(&p, Operation::Verify)];
        let state = derive_state(&history);
        assert!(state.has_auth);
        assert!(!state.has_settled);

        let history = vec![row(&p, Operation::Sale)];
        let state = derive_state(&history);
        assert!(!state.has_auth);
        assert!(state.has_settled);
    }

    #[test]
    fn test_failed_rows_still_count() {
        let p = payment();
        let mut auth = row(&p, Operation::Auth);
        auth.set_failure(&GatewayFault::new("99", "Auth failed"));
        assert!(derive_state(&[auth]).has_auth);
    }

    #[test]
    fn test_credit_does_not_clear_settlement() {
        let p = payment();
        let history = vec![
            row(&p, Operation::Auth),
            row(&p, Operation::Capture),
            row(&p, Operation::Credit),
        ];
        let state = derive_state(&history);
        assert!(state.has_settled);
        // A second capture is left for the gateway to reject.
        assert!(state.check(p.id, true, Operation::Capture).is_ok());
    }

    #[test]
    fn test_precondition_table() {
        let id = PaymentId::new();
        let fresh = PaymentState::default();
        let authed = PaymentState {
            has_auth: true,
            has_settled: false,
        };
        let settled = PaymentState {
            has_auth: true,
            has_settled: true,
        };

        for op in [Operation::Auth, Operation::Sale, Operation::Verify] {
            assert_eq!(
                fresh.check(id, false, op),
                Err(PreconditionError::RegistrationIncomplete(id))
            );
            assert_eq!(fresh.check(id, true, op), Ok(()));
        }

        assert_eq!(
            fresh.check(id, true, Operation::Capture),
            Err(PreconditionError::PaymentNotAuthorized(id))
        );
        assert_eq!(authed.check(id, true, Operation::Capture), Ok(()));

        assert_eq!(
            authed.check(id, true, Operation::Credit),
            Err(PreconditionError::NoAmountCaptured(id))
        );
        assert_eq!(settled.check(id, true, Operation::Credit), Ok(()));

        assert_eq!(
            fresh.check(id, true, Operation::Annul),
            Err(PreconditionError::PaymentNotAuthorized(id))
        );
        assert_eq!(authed.check(id, true, Operation::Annul), Ok(()));
        assert_eq!(
            settled.check(id, true, Operation::Annul),
            Err(PreconditionError::AmountAlreadyCaptured(id))
        );
    }

    #[test]
    fn test_settled_without_auth_annul_reports_missing_auth() {
        let id = PaymentId::new();
        let state = PaymentState {
            has_auth: false,
            has_settled: true,
        };
        assert_eq!(
            state.check(id, true, Operation::Annul),
            Err(PreconditionError::PaymentNotAuthorized(id))
        );
    }

    #[test]
    fn test_derive_state_random_histories() {
        let p = payment();
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let len = rng.gen_range(0..12);
            let mut history: Vec<Transaction> = (0..len)
                .map(|_| row(&p, *Operation::ALL.choose(&mut rng).unwrap()))
                .collect();
            history.shuffle(&mut rng);

            let state = derive_state(&history);
            let expect_auth = history.iter().any(|t| t.operation == Operation::Auth);
            let expect_settled = history
                .iter()
                .any(|t| SETTLING_OPERATIONS.contains(&t.operation));

            assert_eq!(state.has_auth, expect_auth);
            assert_eq!(state.has_settled, expect_settled);
        }
    }
}
