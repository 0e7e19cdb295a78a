//! The module contains the error the engine can throw.
//!
//! Validation errors ([`InvalidAmount`], [`SplitMismatch`], [`SelfSettlement`],
//! [`UnknownParticipant`]) are expected and recoverable: callers report them
//! back for user-facing display. [`ConservationViolation`] is not — it means
//! the records handed to the engine were inconsistent, which implies a bug in
//! the write path, and it is logged separately from user errors.
//!
//! [`InvalidAmount`]: EngineError::InvalidAmount
//! [`SplitMismatch`]: EngineError::SplitMismatch
//! [`SelfSettlement`]: EngineError::SelfSettlement
//! [`UnknownParticipant`]: EngineError::UnknownParticipant
//! [`ConservationViolation`]: EngineError::ConservationViolation
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Splits do not sum to the expense total: {0}")]
    SplitMismatch(String),
    #[error("Payer and receiver must differ: {0}")]
    SelfSettlement(String),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Conservation violation: {0}")]
    ConservationViolation(String),
}

impl EngineError {
    /// Returns `true` for errors meant to be shown to the user as a
    /// validation failure, `false` for internal invariant failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::ConservationViolation(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::SplitMismatch(a), Self::SplitMismatch(b)) => a == b,
            (Self::SelfSettlement(a), Self::SelfSettlement(b)) => a == b,
            (Self::UnknownParticipant(a), Self::UnknownParticipant(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::ConservationViolation(a), Self::ConservationViolation(b)) => a == b,
            _ => false,
        }
    }
}
