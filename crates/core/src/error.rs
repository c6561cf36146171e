//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic failures of domain values.
///
/// Anything involving the account service is a transfer-layer error instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value cannot take part in the requested operation.
    #[error("{0}")]
    Validation(String),

    /// An account service identifier that is not a decimal id.
    #[error("invalid {kind} {value:?}: expected decimal digits")]
    InvalidId { kind: &'static str, value: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }
}
