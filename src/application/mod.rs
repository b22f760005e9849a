//! Application layer orchestrating the gateway and the stores.
//!
//! [`registrar::PaymentRegistrar`] creates payments and
//! [`engine::TransactionEngine`] drives them through the transaction
//! lifecycle. Both persist every attempt through [`finalize::Finalizer`].

pub mod engine;
pub mod finalize;
pub mod registrar;
