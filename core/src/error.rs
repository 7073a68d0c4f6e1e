//! Error types for the core crate
//!
//! This module provides a consolidated error type for the core crate,
//! covering validation failures, missing records and storage failures.

use std::io;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// One or more required fields are missing from an inbound payload
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A referenced record or table does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Gateway credentials are not configured for the active mode
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table storage failure; the state of the table is unknown afterwards
    #[error("Store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        match core_err {
            CoreError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }

        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let core_err: CoreError = json_err.into();
        match core_err {
            CoreError::Json(_) => {}
            _ => panic!("Expected Json variant"),
        }
    }

    #[test]
    fn test_validation_display_lists_every_field() {
        let err = CoreError::Validation(vec!["hotel_code".to_string(), "rating".to_string()]);
        assert_eq!(err.to_string(), "Missing required fields: hotel_code, rating");
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::Store("disk full".to_string());
        assert_eq!(err.to_string(), "Store error: disk full");

        let err = CoreError::Config("no credentials".to_string());
        assert_eq!(err.to_string(), "Configuration error: no credentials");
    }
}
