//! Errors raised while assembling a [`crate::Sim`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyGrid { rows: i32, cols: i32 },
}

pub type EngineResult<T> = Result<T, EngineError>;
