//! Error types for Flowforge.
//!
//! All errors are represented by the `FlowforgeError` enum. Only the
//! `Validation` variant aborts a build; every other anomaly the build can
//! encounter is absorbed into the diagnostics list instead of being raised.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Flowforge operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum FlowforgeError {
    /// Malformed intent document (missing trigger, bad actions list,
    /// unrecognized mode value).
    #[error("{0}")]
    Intent(String),

    /// A fatal contract violation in the action list. Carries the index of
    /// the offending action so the caller can point back at the input.
    #[error("invalid action at index {index}: {message}")]
    Validation {
        index: usize,
        message: String,
    },

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, etc.).
    #[error("{0}")]
    Convert(String),

    /// Catalog lookup contract errors.
    #[error("{0}")]
    Catalog(String),

    /// Graph construction errors.
    #[error("{0}")]
    Graph(String),

    /// Layout computation errors.
    #[error("{0}")]
    Layout(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl FlowforgeError {
    /// Shorthand for a `Validation` error at a known action index.
    pub fn validation(
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        FlowforgeError::Validation {
            index,
            message: message.into(),
        }
    }
}

impl From<FlowforgeError> for String {
    fn from(val: FlowforgeError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for FlowforgeError {
    fn from(error: std::io::Error) -> Self {
        FlowforgeError::IoError(error.to_string())
    }
}

impl From<FlowforgeError> for std::io::Error {
    fn from(val: FlowforgeError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for FlowforgeError {
    fn from(error: serde_json::Error) -> Self {
        FlowforgeError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for FlowforgeError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        FlowforgeError::Intent(format!("{} at {}", error, error.instance_path()))
    }
}
