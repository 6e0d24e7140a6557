use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {value} (expected {expected})")]
    Validation {
        field:    &'static str,
        value:    String,
        expected: &'static str,
    },

    #[error("Invalid {entity} record '{id}': {reason}")]
    InvalidRecord {
        entity: &'static str,
        id:     String,
        reason: String,
    },

    #[error("Unknown {kind} '{value}'")]
    UnknownEnum { kind: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    /// Shorthand for an out-of-range request or config field.
    pub fn validation(field: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::Validation { field, value: value.to_string(), expected }
    }

    /// True when the storage layer could not serve the request at all.
    /// Callers may retry; an empty dataset is never reported this way.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::OutOfMemory
            ),
            _ => false,
        }
    }
}

pub type DashResult<T> = Result<T, DashError>;
