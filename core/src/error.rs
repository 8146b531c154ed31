use thiserror::Error;

use crate::host::SessionId;

pub type Result<T> = std::result::Result<T, HostError>;

/// Failures reported by a host engine operation.
///
/// Missing sessions or schemas during a snapshot query are not errors; the
/// projector returns an unpopulated message instead. These variants cover the
/// control surface (key simulation, schema selection and so on).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    #[error("invalid key sequence at offset {position}: {reason}")]
    InvalidKeySequence { position: usize, reason: String },

    #[error("no candidate at index {index} on the current page")]
    CandidateOutOfRange { index: usize },

    #[error("maintenance failed: {0}")]
    Maintenance(String),

    #[error("service is disabled")]
    Disabled,
}
