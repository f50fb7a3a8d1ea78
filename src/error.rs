use thiserror::Error;

use crate::lifecycle::TransitionError;
use crate::payment::PaymentError;
use crate::contract::ContractError;
use crate::permissions::{Operation, Role};
use crate::store::StoreError;
use crate::task::TaskError;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Role {role} may not {operation}")]
    Forbidden { role: Role, operation: Operation },

    #[error("Role {role} may not manage translators")]
    RosterForbidden { role: Role },

    #[error("Translator not found: {0}")]
    TranslatorNotFound(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DeskError {
    /// HTTP-equivalent status for the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DeskError::Forbidden { .. } | DeskError::RosterForbidden { .. } => 403,
            DeskError::TranslatorNotFound(_) => 404,
            DeskError::Transition(e) => e.status_code(),
            DeskError::Payment(e) => e.status_code(),
            DeskError::Contract(e) => e.status_code(),
            DeskError::Invalid(_) | DeskError::Task(_) => 400,
            DeskError::Store(StoreError::NotFound(_)) => 404,
            DeskError::Store(StoreError::Duplicate(_)) => 409,
            DeskError::Store(_) | DeskError::Config(_) | DeskError::Toml(_) => 500,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            DeskError::Invalid(_)
            | DeskError::Forbidden { .. }
            | DeskError::RosterForbidden { .. }
            | DeskError::TranslatorNotFound(_)
            | DeskError::Transition(_)
            | DeskError::Payment(_)
            | DeskError::Contract(_)
            | DeskError::Task(_)
            | DeskError::Store(StoreError::NotFound(_))
            | DeskError::Store(StoreError::Duplicate(_)) => FailureKind::Business,
            DeskError::Store(_) | DeskError::Config(_) | DeskError::Toml(_) => FailureKind::System,
        }
    }
}

/// Classifies a failure for the caller: business-rule outcomes are shown to
/// the user, system failures end the request as a server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// Rule violation (bad transition, missing precondition, forbidden)
    Business,
    /// Infrastructure failure (storage unreadable, config broken)
    System,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Business => write!(f, "Business"),
            FailureKind::System => write!(f, "System"),
        }
    }
}
