//! Error types for the block model

use thiserror::Error;

/// Errors loading or saving a page
#[derive(Error, Debug)]
pub enum BlockError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page must be a JSON array of blocks, found {0}")]
    NotAnArray(&'static str),
}

/// Errors produced by a block editor when turning an input into data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Blocks of type \"{0}\" cannot be edited")]
    NotEditable(String),
}

impl EditError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        EditError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
