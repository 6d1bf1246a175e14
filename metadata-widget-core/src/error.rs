//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Mode name outside of the known set (programming-contract violation)
    #[error("Unsupported metadatum mode {0} detected.")]
    UnsupportedMode(String),

    /// User input rejected before reaching persistence
    #[error("{0}")]
    ValidationError(String),

    /// Mode toggle refused by the target codec
    #[error("{0}")]
    ConversionRejected(String),

    /// Persistence adapter reported a failure
    #[error("{0}")]
    PersistenceError(String),

    /// Row id does not belong to the current render
    #[error("Row not found: {0}")]
    RowNotFound(u64),

    /// Another save or delete is still in flight for the row
    #[error("An operation is already in progress for metadatum '{0}'")]
    RowBusy(String),

    /// Row is not in the state the operation requires
    #[error("Invalid row state: {0}")]
    InvalidState(String),

    /// Widget access level does not allow editing
    #[error("Metadata is read-only at the current access level")]
    ReadOnly,

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, stale row, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::ConversionRejected(_)
            | Self::RowNotFound(_)
            | Self::RowBusy(_)
            | Self::ReadOnly => true,
            Self::UnsupportedMode(_)
            | Self::PersistenceError(_)
            | Self::InvalidState(_)
            | Self::SerializationError(_) => false,
        }
    }

    /// Whether the error should be shown to the user at danger level rather than as a warning.
    #[must_use]
    pub fn is_danger(&self) -> bool {
        matches!(self, Self::PersistenceError(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
