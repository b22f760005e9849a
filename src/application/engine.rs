use super::finalize::Finalizer;
use crate::domain::gateway::ProcessRequest;
use crate::domain::history::{PaymentState, derive_state};
use crate::domain::payment::{Amount, Payment};
use crate::domain::ports::{GatewayHandle, TransactionStoreHandle};
use crate::domain::transaction::{Operation, Transaction};
use crate::error::{PreconditionError, Result};
use tracing::{error, info};

/// Applies gateway operations to registered payments.
///
/// Each call checks the payment's recorded history, calls the gateway and
/// appends exactly one transaction, succeeded or failed. A call rejected by
/// a precondition writes nothing.
///
/// Checking preconditions and appending the new row are not atomic: two
/// concurrent calls on the same payment can both pass the check. Callers
/// needing at-most-once semantics per payment must serialize calls.
pub struct TransactionEngine {
    gateway: GatewayHandle,
    transactions: TransactionStoreHandle,
}

impl TransactionEngine {
    pub fn new(gateway: GatewayHandle, transactions: TransactionStoreHandle) -> Self {
        Self {
            gateway,
            transactions,
        }
    }

    pub async fn auth_payment(&self, payment: &Payment) -> Result<Transaction> {
        self.execute(payment, Operation::Auth, None).await
    }

    pub async fn sale_payment(&self, payment: &Payment) -> Result<Transaction> {
        self.execute(payment, Operation::Sale, None).await
    }

    pub async fn capture_payment(&self, payment: &Payment, amount: Amount) -> Result<Transaction> {
        self.execute(payment, Operation::Capture, Some(amount)).await
    }

    pub async fn credit_payment(&self, payment: &Payment, amount: Amount) -> Result<Transaction> {
        self.execute(payment, Operation::Credit, Some(amount)).await
    }

    pub async fn annul_payment(&self, payment: &Payment) -> Result<Transaction> {
        self.execute(payment, Operation::Annul, None).await
    }

    pub async fn verify_payment(&self, payment: &Payment) -> Result<Transaction> {
        self.execute(payment, Operation::Verify, None).await
    }

    /// The state the preconditions are evaluated against.
    pub async fn state(&self, payment: &Payment) -> Result<PaymentState> {
        let history = self.transactions.history(payment.id).await?;
        Ok(derive_state(&history))
    }

    async fn execute(
        &self,
        payment: &Payment,
        operation: Operation,
        amount: Option<Amount>,
    ) -> Result<Transaction> {
        let transaction_id = self.check(payment, operation).await.inspect_err(|e| {
            error!(payment = %payment.id, operation = %operation, reason = %e, "operation rejected");
        })?;

        let request = ProcessRequest::new(operation, transaction_id.clone(), amount);
        let record = Transaction::new(payment, transaction_id, operation, request.transaction_amount);
        let pending = Finalizer::new(record, self.transactions.clone());

        let outcome = self.gateway.process(&request).await;
        let result = pending
            .settle(outcome, |tx, response| tx.record_response(response))
            .await;

        match &result {
            Ok(tx) => info!(
                payment = %payment.id,
                operation = %operation,
                transaction = %tx.id,
                "operation applied"
            ),
            Err(e) => error!(
                payment = %payment.id,
                operation = %operation,
                code = e.fault_code(),
                error = %e,
                "operation on payment failed"
            ),
        }
        result
    }

    /// Runs the precondition for `operation` and returns the gateway
    /// transaction id to process against.
    async fn check(&self, payment: &Payment, operation: Operation) -> Result<String> {
        let state = self.state(payment).await?;
        state.check(payment.id, payment.completed(), operation)?;

        // History can only hold rows for registered payments, so this only
        // trips on records that were built by hand.
        let transaction_id = payment
            .transaction_id
            .clone()
            .ok_or(PreconditionError::RegistrationIncomplete(payment.id))?;
        Ok(transaction_id)
    }
}
