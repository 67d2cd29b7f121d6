//! Error types and utilities for salesboard

use thiserror::Error;

/// Result type alias for salesboard operations
pub type Result<T> = std::result::Result<T, SalesError>;

/// Main error type for salesboard operations
#[derive(Error, Debug)]
pub enum SalesError {
    /// Malformed report parameter or input data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The record store could not be read
    #[error("Data access error: {message}")]
    DataAccess {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A computation precondition was violated. Indicates a defect.
    #[error("Computation error: {message}")]
    Computation { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SalesError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new data access error
    pub fn data_access(msg: impl Into<String>) -> Self {
        Self::DataAccess {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new data access error with source
    pub fn data_access_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataAccess {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new computation error
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation {
            message: msg.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Field name attached to a validation error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Whether this error came from bad caller input rather than a failure.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let validation_error = SalesError::validation_field("not a number", "userId");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("not a number"));
        assert_eq!(validation_error.field(), Some("userId"));
        assert!(validation_error.is_validation());

        let access_error = SalesError::data_access("store offline");
        assert_eq!(access_error.to_string(), "Data access error: store offline");
        assert!(!access_error.is_validation());
        assert_eq!(access_error.field(), None);

        let computation_error = SalesError::computation("unordered periods");
        assert!(computation_error.to_string().contains("Computation error"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::TimedOut, "pool exhausted");
        let wrapped = SalesError::data_access_with_source("Failed to acquire store", io_error);

        assert!(wrapped.to_string().contains("Failed to acquire store"));
        assert!(wrapped.source().is_some());

        let config_error = SalesError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );
        assert_eq!(
            config_error.to_string(),
            "Configuration error: Config loading failed"
        );
        assert!(config_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"bad": json}"#).unwrap_err();
        let error: SalesError = serde_error.into();
        assert!(error.to_string().contains("Serialization error"));
    }
}
