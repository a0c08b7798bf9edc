//! Grid-subsystem error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell {0:?} is out of bounds for a {1} grid")]
    OutOfBounds(logix_core::Cell, logix_core::GridDims),

    #[error("cell {0:?} is obstructed")]
    Obstructed(logix_core::Cell),
}

pub type GridResult<T> = Result<T, GridError>;
