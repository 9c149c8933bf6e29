//! Error types for the document core.
//!
//! Every failure here is a caller contract breach: an unknown entity or block
//! key, a malformed selection, or a structural edit the model refuses (such as
//! moving a block next to itself). Recoverable no-ops never produce an error;
//! they return the input snapshot unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Unknown DraftEntity key: {0}")]
    EntityNotFound(String),

    #[error("Unknown block key: {0}")]
    BlockNotFound(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Selection offset {offset} is out of bounds for block {key} (length {length})")]
    InvalidSelection {
        key: String,
        offset: usize,
        length: usize,
    },

    #[error("Malformed raw content: {0}")]
    Raw(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DraftError {
    /// Builds an invariant violation and records it before it propagates.
    pub fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(%message, "invariant violation");
        DraftError::Invariant(message)
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;

/// Returns an invariant violation when `condition` does not hold.
pub fn invariant(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(DraftError::invariant(message))
    }
}
