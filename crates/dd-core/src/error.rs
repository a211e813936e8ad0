//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `DdError` as one variant
//! where a core failure can surface through them.

use thiserror::Error;

use crate::EntityId;

/// The top-level error type for `dd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DdError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `dd-core`.
pub type DdResult<T> = Result<T, DdError>;
