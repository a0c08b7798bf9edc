use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle configuration error: {0}")]
    Config(String),
}

pub type OracleResult<T> = Result<T, OracleError>;
