#![allow(dead_code)]

use netaxept::config::RegistrarConfig;
use netaxept::domain::payment::{Amount, Payment, PaymentOrder};
use netaxept::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryTransactionStore};
use netaxept::infrastructure::scripted::ScriptedGateway;
use netaxept::{PaymentRegistrar, TransactionEngine};
use std::sync::Arc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A registrar and an engine wired to one scripted gateway and shared
/// in-memory stores that the test can inspect.
pub struct Harness {
    pub gateway: ScriptedGateway,
    pub payments: InMemoryPaymentStore,
    pub transactions: InMemoryTransactionStore,
    pub registrar: PaymentRegistrar,
    pub engine: TransactionEngine,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let gateway = ScriptedGateway::new();
        let payments = InMemoryPaymentStore::new();
        let transactions = InMemoryTransactionStore::new();

        let registrar = PaymentRegistrar::new(
            Arc::new(gateway.clone()),
            Arc::new(payments.clone()),
            RegistrarConfig::default(),
        );
        let engine = TransactionEngine::new(Arc::new(gateway.clone()), Arc::new(transactions.clone()));

        Self {
            gateway,
            payments,
            transactions,
            registrar,
            engine,
        }
    }

    /// Registers a payment against a gateway that accepts it.
    pub async fn registered_payment(&self) -> Payment {
        self.registrar
            .register_payment(order("NOK", 1000))
            .await
            .expect("registration should succeed")
    }
}

pub fn order(currency: &str, amount: u64) -> PaymentOrder {
    PaymentOrder {
        redirect_url: "https://shop.example/netaxept/return".to_string(),
        amount: Amount::new(amount).unwrap(),
        currency_code: currency.to_string(),
        order_number: format!("order-{}", uuid::Uuid::new_v4().simple()),
        description: "Concert tickets".to_string(),
        language: None,
    }
}

pub fn amount(minor_units: u64) -> Amount {
    Amount::new(minor_units).unwrap()
}
