pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::engine::TransactionEngine;
pub use application::registrar::PaymentRegistrar;
pub use error::{PaymentError, PreconditionError, Result};
