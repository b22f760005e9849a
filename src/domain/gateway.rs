//! Messages exchanged with the remote payment gateway.
//!
//! These mirror the gateway's register and process calls. How they are put
//! on the wire is up to the [`GatewayClient`](super::ports::GatewayClient)
//! implementation.

use super::payment::{Amount, RecurringTerms};
use super::transaction::Operation;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Terminal {
    pub redirect_url: String,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub web_service_platform: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub amount: Amount,
    pub currency_code: String,
    pub order_number: String,
    /// Asks the gateway to keep the card for later unattended charges.
    /// Left unset for plain payments.
    pub update_stored_payment_info: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Recurring {
    pub r#type: String,
    pub frequency: u16,
    /// `YYYYMMDD`
    pub expiry_date: u32,
}

impl From<&RecurringTerms> for Recurring {
    fn from(terms: &RecurringTerms) -> Self {
        Self {
            r#type: terms.recurring_type.code().to_string(),
            frequency: terms.minimum_frequency,
            expiry_date: encode_expiry_date(terms.expiry_date),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    pub terminal: Terminal,
    pub environment: Environment,
    pub order: Order,
    pub description: String,
    pub recurring: Option<Recurring>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterResponse {
    pub transaction_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessRequest {
    pub operation: Operation,
    pub transaction_id: String,
    pub transaction_amount: Option<Amount>,
}

impl ProcessRequest {
    pub fn new(operation: Operation, transaction_id: String, amount: Option<Amount>) -> Self {
        Self {
            operation,
            transaction_id,
            transaction_amount: amount.filter(|_| operation.requires_amount()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessResponse {
    pub response_code: String,
    pub authorization_id: Option<String>,
}

impl ProcessResponse {
    pub fn ok() -> Self {
        Self {
            response_code: "OK".to_string(),
            authorization_id: None,
        }
    }
}

/// A request the gateway received and refused.
#[derive(Error, Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[error("[{code}] {message}")]
pub struct GatewayFault {
    pub code: String,
    pub response_source: Option<String>,
    pub message: String,
}

impl GatewayFault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            response_source: None,
            message: message.into(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.response_source = Some(source.into());
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway fault {0}")]
    Fault(GatewayFault),
    /// The call did not complete; whether the gateway acted on it is unknown.
    #[error("gateway transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn fault(&self) -> Option<&GatewayFault> {
        match self {
            GatewayError::Fault(fault) => Some(fault),
            GatewayError::Transport(_) => None,
        }
    }
}

impl From<GatewayFault> for GatewayError {
    fn from(fault: GatewayFault) -> Self {
        GatewayError::Fault(fault)
    }
}

/// Encodes a date as the gateway's eight digit `YYYYMMDD` integer.
pub fn encode_expiry_date(date: NaiveDate) -> u32 {
    let year = u32::try_from(date.year()).unwrap_or(0);
    year * 10_000 + date.month() * 100 + date.day()
}
