//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FlockError` as one
//! variant via `#[from]`, so configuration and vector-math failures bubble up
//! with their original message intact.

use thiserror::Error;

/// The top-level error type for `fl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FlockError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("argument error: {what} expected {expected} items, got {got}")]
    Argument {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fl-*` crates.
pub type FlockResult<T> = Result<T, FlockError>;
