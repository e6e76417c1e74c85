//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout Rollbook.
//!
//! # Error Categories
//! - `ConnectionFailed`: the database file could not be opened
//! - `QueryFailed`: preparing or executing a query failed
//! - `ExportFailed`: writing a result set to disk failed
//! - `PromptFailed`: reading interactive input failed

use thiserror::Error;

/// Main error type for Rollbook operations
#[derive(Error, Debug)]
pub enum RollbookError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Export to JSON or XML failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Interactive prompt failed
    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}

impl RollbookError {
    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether this error ends the session.
    ///
    /// Connection failures cannot be recovered from at the prompt; the
    /// caller reports the fixed instructional message and stops the loop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_))
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an export failed error
    pub fn export_failed(message: impl Into<String>) -> Self {
        Self::ExportFailed(message.into())
    }

    /// Create a prompt failed error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }
}

/// Result type alias for Rollbook operations
pub type Result<T> = std::result::Result<T, RollbookError>;
