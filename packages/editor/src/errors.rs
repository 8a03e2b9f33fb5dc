//! Error types for the editor

use pagecraft_blocks::{BlockError, EditError};
use thiserror::Error;

/// Hard failures only. Stale ids, an empty clipboard and similar races are
/// reported as [`crate::Outcome::Noop`], never as errors.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Invalid page: {0}")]
    Page(#[from] BlockError),

    #[error("Rejected edit: {0}")]
    Edit(#[from] EditError),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
