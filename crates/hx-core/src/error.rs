//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `HxError` as one variant
//! via `#[from]`.

use thiserror::Error;

/// The top-level error type for `hx-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HxError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hx-*` crates.
pub type HxResult<T> = Result<T, HxError>;
