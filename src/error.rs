//! Error types for cloudcarbon
//!
//! This module defines the error types used throughout the library. All
//! errors are derived from `thiserror` for convenient error handling and
//! automatic `From` implementations.
//!
//! The two data-source variants mirror the two independently failing network
//! operations of an estimation call: creating the query job, and fetching its
//! results. Both embed the upstream provider's `reason` and `message` verbatim
//! for diagnostics. Classification and estimation never produce errors;
//! unclassifiable rows are dropped by policy, not failed.

use thiserror::Error;

/// Main error type for cloudcarbon operations
#[derive(Error, Debug)]
pub enum CarbonError {
    /// The usage query job could not be created
    #[error("query job submission failed ({reason}): {message}")]
    QueryJobSubmission {
        /// Upstream failure reason code
        reason: String,
        /// Upstream error location, when reported
        location: Option<String>,
        /// Upstream error message
        message: String,
    },

    /// The query job was created but fetching its results failed
    #[error("query result retrieval failed ({reason}): {message}")]
    QueryResultRetrieval {
        /// Upstream failure reason code
        reason: String,
        /// Upstream error domain, when reported
        domain: Option<String>,
        /// Upstream error message
        message: String,
    },

    /// Caller-supplied date range or parameters are malformed
    #[error("invalid estimation request: {0}")]
    InvalidRequest(String),

    /// The data source answered with less than the requested range
    #[error("partial data: {0}")]
    PartialData(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in cloudcarbon
pub type Result<T> = std::result::Result<T, CarbonError>;
