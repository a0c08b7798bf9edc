//! Errors raised while assembling an `AgentArena` / `PackageArena`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(String),

    #[error("duplicate package name: {0}")]
    DuplicatePackageName(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
