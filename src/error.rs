use crate::domain::gateway::GatewayError;
use crate::domain::outcome::RecordId;
use crate::domain::payment::PaymentId;
use miette::Diagnostic;
use thiserror::Error;

/// A local rule violation detected before any remote call is made.
///
/// None of these ever produce a transaction record.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("payment {0} has not completed registration")]
    #[diagnostic(
        code(netaxept::precondition::registration_incomplete),
        help("register the payment with the gateway before processing it")
    )]
    RegistrationIncomplete(PaymentId),

    #[error("payment {0} is not authorized")]
    #[diagnostic(
        code(netaxept::precondition::not_authorized),
        help("run AUTH on the payment first")
    )]
    PaymentNotAuthorized(PaymentId),

    #[error("no amount captured on payment {0}, cannot credit")]
    #[diagnostic(code(netaxept::precondition::no_amount_captured))]
    NoAmountCaptured(PaymentId),

    #[error("amount already captured on payment {0}, cannot annul")]
    #[diagnostic(
        code(netaxept::precondition::amount_already_captured),
        help("use CREDIT to return captured funds")
    )]
    AmountAlreadyCaptured(PaymentId),
}

#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Precondition(#[from] PreconditionError),

    /// The gateway rejected the call. `record` has already been persisted
    /// with the failure attached.
    #[error("gateway call failed ({record}): {source}")]
    #[diagnostic(code(netaxept::gateway))]
    Gateway {
        record: RecordId,
        #[source]
        source: GatewayError,
    },

    #[error("Validation error: {0}")]
    #[diagnostic(code(netaxept::validation))]
    ValidationError(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(netaxept::internal))]
    InternalError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    /// The precondition that rejected the call, if any.
    pub fn precondition(&self) -> Option<&PreconditionError> {
        match self {
            PaymentError::Precondition(e) => Some(e),
            _ => None,
        }
    }

    /// The gateway error and the id of the record it was persisted on, if any.
    pub fn gateway(&self) -> Option<(RecordId, &GatewayError)> {
        match self {
            PaymentError::Gateway { record, source } => Some((*record, source)),
            _ => None,
        }
    }

    /// The gateway response code, when the gateway refused the call.
    pub fn fault_code(&self) -> Option<&str> {
        self.gateway()
            .and_then(|(_, source)| source.fault())
            .map(|fault| fault.code.as_str())
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        PaymentError::InternalError(Box::new(std::io::Error::other(message.into())))
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(e: serde_json::Error) -> Self {
        PaymentError::InternalError(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
