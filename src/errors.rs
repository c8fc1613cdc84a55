/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Retry policy is a pure function of the error kind: every variant knows whether
 * retrying the request can help, so the retry loop never inspects error strings
 * or downcasts.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error when sending the request fails at the transport level
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error when the request exceeded the per-call timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Error returned by the backend itself
    #[error("Backend responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the backend
        message: String,
    },

    /// Error when parsing the backend response body fails
    #[error("Failed to parse backend response: {0}")]
    ParseError(String),

    /// Error when the backend returned no usable content
    #[error("Backend returned an empty response")]
    EmptyResponse,
}

impl BackendError {
    /// Whether another attempt of the same request can succeed.
    ///
    /// Transport failures, timeouts, rate limiting and server-side errors are
    /// transient. Client errors (bad credentials, malformed request) will fail
    /// identically on every attempt and are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => true,
        }
    }
}

/// Errors that can occur while translating a chunk
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The backend answered, but the response did not satisfy the numbered-list contract
    #[error("Response validation failed: submitted {expected} lines, parsed {parsed}: {detail}")]
    Validation {
        /// Number of lines submitted for translation
        expected: usize,
        /// Number of correctly numbered lines parsed back
        parsed: usize,
        /// What exactly was wrong
        detail: String,
    },
}

impl TranslationError {
    /// Whether retrying the whole chunk can help
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_retryable(),
            Self::Validation { .. } => true,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
