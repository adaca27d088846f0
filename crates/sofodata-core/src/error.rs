//! Error types for publishing datasets

use std::io;
use thiserror::Error;

use crate::publish::Step;

/// Result type for publishing operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing a dataset.
#[derive(Error, Debug)]
pub enum PublishError {
    /// IO error (temp file creation, write or removal).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV serialization or parsing failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Table columns could not be assembled.
    #[error("schema error: {0}")]
    Schema(String),

    /// Missing credentials or unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or its response could not be read.
    #[error("network error during {step}: {message}")]
    Network { step: Step, message: String },

    /// The response body was not valid JSON.
    #[error("invalid JSON from {step} (status {status}): {message}")]
    InvalidJson {
        step: Step,
        status: u16,
        message: String,
    },

    /// An expected field was absent from the response body.
    #[error("response from {step} (status {status}) has no '{field}' field")]
    MissingField {
        step: Step,
        field: &'static str,
        status: u16,
    },
}

impl From<arrow::error::ArrowError> for PublishError {
    fn from(err: arrow::error::ArrowError) -> Self {
        match err {
            arrow::error::ArrowError::CsvError(msg) => PublishError::Csv(msg),
            arrow::error::ArrowError::IoError(_, e) => PublishError::Io(e),
            other => PublishError::Schema(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PublishError::MissingField {
            step: Step::Authenticate,
            field: "access_token",
            status: 401,
        };
        assert_eq!(
            err.to_string(),
            "response from token request (status 401) has no 'access_token' field"
        );

        let err = PublishError::Network {
            step: Step::Upload,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "network error during upload: connection refused");
    }

    #[test]
    fn test_arrow_csv_error_maps_to_csv() {
        let err: PublishError = arrow::error::ArrowError::CsvError("bad row".to_string()).into();
        assert!(matches!(err, PublishError::Csv(ref m) if m == "bad row"));
    }
}
