//! Error types for VinDash
//!
//! This module defines all error types used throughout the application,
//! providing detailed error information for debugging and user feedback.

use thiserror::Error;

/// Main error type for VinDash operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The inventory service answered with a non-2xx status
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },

    /// Network failure or undecodable response body
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Vehicle lookup by VIN produced nothing
    #[error("Vehicle not found: {0}")]
    NotFound(String),

    /// Draft rejected by client-side validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error (terminal, log file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error means the requested vehicle does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || self.status() == Some(404)
    }
}

/// Result type alias for VinDash operations
pub type Result<T> = std::result::Result<T, DashboardError>;
