use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wall entry must have exactly 4 coordinates [r1, c1, r2, c2], got {0}")]
    MalformedWall(usize),

    #[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds { row: i32, col: i32, rows: i32, cols: i32 },

    #[error("{what} at ({row}, {col}) overlaps a wall cell")]
    SpawnOnObstacle { what: &'static str, row: i32, col: i32 },

    #[error("duplicate robot name: {0}")]
    DuplicateRobotName(String),

    #[error("duplicate package name: {0}")]
    DuplicatePackageName(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
