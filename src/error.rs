//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout cadre.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database connection or pool checkout errors
//! - `QueryFailed`: Statement execution or row extraction errors
//! - `ConfigError`: Configuration file or environment resolution errors
//! - `PromptFailed`: Terminal prompt errors (menu or input gathering)
//! - `InvalidInput`: Malformed input or missing required parameters
//!
//! Store and prompt failures are never fatal: the menu loop logs them and
//! re-presents the menu.

use thiserror::Error;

/// Main error type for cadre operations
#[derive(Error, Debug)]
pub enum CadreError {
    /// Database connection or pool checkout failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Configuration error (file not found, invalid JSON, bad env value)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Terminal prompt failed
    #[error("Prompt failed: {0}")]
    PromptFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CadreError {
    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt failed error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type alias for cadre operations
pub type Result<T> = std::result::Result<T, CadreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CadreError::connection_failed("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
        assert!(err.to_string().starts_with("Connection failed"));

        let err = CadreError::query_failed("duplicate entry");
        assert!(err.to_string().contains("duplicate entry"));

        let err = CadreError::config_error("CADRE_DB_PORT is not a number");
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            CadreError::connection_failed("test"),
            CadreError::ConnectionFailed(_)
        ));
        assert!(matches!(CadreError::query_failed("test"), CadreError::QueryFailed(_)));
        assert!(matches!(CadreError::config_error("test"), CadreError::ConfigError(_)));
        assert!(matches!(CadreError::prompt_failed("test"), CadreError::PromptFailed(_)));
        assert!(matches!(CadreError::invalid_input("test"), CadreError::InvalidInput(_)));
    }
}
