use super::finalize::Finalizer;
use crate::config::RegistrarConfig;
use crate::domain::gateway::{Environment, Order, Recurring, RegisterRequest, Terminal};
use crate::domain::payment::{Payment, PaymentOrder, RecurringTerms};
use crate::domain::ports::{GatewayHandle, PaymentStoreHandle};
use crate::error::Result;
use tracing::{error, info};

/// Registers payment intents with the gateway.
///
/// Every attempt leaves exactly one payment record behind, whether the
/// gateway accepted it or not.
pub struct PaymentRegistrar {
    gateway: GatewayHandle,
    payments: PaymentStoreHandle,
    config: RegistrarConfig,
}

impl PaymentRegistrar {
    pub fn new(gateway: GatewayHandle, payments: PaymentStoreHandle, config: RegistrarConfig) -> Self {
        Self {
            gateway,
            payments,
            config,
        }
    }

    /// Registers a one-off payment.
    ///
    /// On a gateway fault the payment is still persisted, carrying the fault,
    /// and the fault is returned as [`PaymentError::Gateway`](crate::error::PaymentError::Gateway).
    pub async fn register_payment(&self, order: PaymentOrder) -> Result<Payment> {
        let request = self.build_request(&order, None);
        self.register(Payment::new(&order, None), request).await
    }

    /// Registers a payment whose card is kept by the gateway for later
    /// unattended charges under `terms`.
    pub async fn register_recurring_payment(
        &self,
        order: PaymentOrder,
        terms: RecurringTerms,
    ) -> Result<Payment> {
        let request = self.build_request(&order, Some(&terms));
        self.register(Payment::new(&order, Some(terms)), request).await
    }

    pub(crate) fn build_request(
        &self,
        order: &PaymentOrder,
        recurring: Option<&RecurringTerms>,
    ) -> RegisterRequest {
        RegisterRequest {
            terminal: Terminal {
                redirect_url: order.redirect_url.clone(),
                language: self.config.language_or_default(order.language.as_deref()),
            },
            environment: Environment {
                web_service_platform: self.config.web_service_platform.clone(),
            },
            order: Order {
                amount: order.amount,
                currency_code: order.currency_code.clone(),
                order_number: order.order_number.clone(),
                update_stored_payment_info: recurring.map(|_| true),
            },
            description: order.description.clone(),
            recurring: recurring.map(Recurring::from),
        }
    }

    async fn register(&self, payment: Payment, request: RegisterRequest) -> Result<Payment> {
        let order_number = payment.order_number.clone();
        let pending = Finalizer::new(payment, self.payments.clone());

        let outcome = self.gateway.register(&request).await;
        let result = pending
            .settle(outcome, |payment, response| {
                payment.record_registration(response.transaction_id)
            })
            .await;

        match &result {
            Ok(payment) => info!(
                payment = %payment.id,
                order = %order_number,
                recurring = payment.is_recurring(),
                "payment registered"
            ),
            Err(e) => error!(
                order = %order_number,
                code = e.fault_code(),
                error = %e,
                "error registering payment"
            ),
        }
        result
    }
}
