//! Error types for job domain parsing.

use thiserror::Error;

/// Error returned while parsing a job status label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);
