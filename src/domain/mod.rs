//! Domain model: payment and transaction records, the gateway messages, the
//! ports the core consumes, and the rules deciding which operations are legal.

pub mod gateway;
pub mod history;
pub mod outcome;
pub mod payment;
pub mod ports;
pub mod transaction;
