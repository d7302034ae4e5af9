//! Error types and exit codes for upriver
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (store unavailable mid-traversal, IO, rendering)
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store file, bad config)
//!
//! A process that is merely absent from the store, or a node revisited
//! during a run, is never an error: both are normal terminal conditions
//! of the traversal and are represented in the result structures instead.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, invalid config (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for UpriverError {
    fn from(err: rusqlite::Error) -> Self {
        UpriverError::Other(err.to_string())
    }
}

/// Errors that can occur during upriver operations
#[derive(Error, Debug)]
pub enum UpriverError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or markdown)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data/store errors (exit code 3)
    #[error("store not found: {path:?}")]
    StoreNotFound { path: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl UpriverError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        UpriverError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed field extraction from a database row
    pub fn field_extraction(field: &str, error: impl std::fmt::Display) -> Self {
        UpriverError::FailedOperation {
            operation: format!("get {}", field),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        UpriverError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            UpriverError::UnknownFormat(_)
            | UpriverError::UsageError(_)
            | UpriverError::InvalidValue { .. } => ExitCode::Usage,

            UpriverError::StoreNotFound { .. } | UpriverError::InvalidStore { .. } => {
                ExitCode::Data
            }

            UpriverError::Io(_)
            | UpriverError::Json(_)
            | UpriverError::Toml(_)
            | UpriverError::FailedOperation { .. }
            | UpriverError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            UpriverError::UnknownFormat(_) => "unknown_format",
            UpriverError::UsageError(_) => "usage_error",
            UpriverError::StoreNotFound { .. } => "store_not_found",
            UpriverError::InvalidStore { .. } => "invalid_store",
            UpriverError::Io(_) => "io_error",
            UpriverError::Json(_) => "json_error",
            UpriverError::Toml(_) => "toml_error",
            UpriverError::InvalidValue { .. } => "invalid_value",
            UpriverError::FailedOperation { .. } => "failed_operation",
            UpriverError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for upriver operations
pub type Result<T> = std::result::Result<T, UpriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            UpriverError::UsageError("bad".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            UpriverError::StoreNotFound {
                path: PathBuf::from("/tmp/missing.db")
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            UpriverError::db_operation("query exchanges", "disk I/O error").exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_to_json_envelope() {
        let err = UpriverError::UnknownFormat("yaml".into());
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 2);
        assert_eq!(json["error"]["type"], "unknown_format");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("yaml"));
    }

    #[test]
    fn test_rusqlite_error_converts_to_failure() {
        let err: UpriverError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.exit_code(), ExitCode::Failure);
    }
}
