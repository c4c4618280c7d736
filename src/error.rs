//! Error types for report generation.
//!
//! The rating engine itself never fails: an unmatched sale, salesman or
//! brand only contributes zero.  Errors come from around it, when a
//! reporting period is out of range or the data source cannot hand over
//! its collections.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a commission report request.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(i64),

    #[error("Year must be between 2000 and 2050, got {0}")]
    InvalidYear(i64),

    #[error("failed to load report data: {0}")]
    Source(#[from] SourceError),
}

impl ReportError {
    /// Whether the error was caused by the caller's request rather than
    /// by the data source.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ReportError::InvalidMonth(_) | ReportError::InvalidYear(_))
    }
}

/// Failures of a [`crate::source::CommissionDataSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unable to read dataset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse dataset {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
