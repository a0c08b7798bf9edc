//! Shared error base.
//!
//! Sub-crates define their own error enums and convert into/out of
//! `CoreError` via `From` impls rather than matching on it directly.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `logix-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `logix-core`.
pub type CoreResult<T> = Result<T, CoreError>;
