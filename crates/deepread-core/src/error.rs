use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required request field is absent. Nothing was committed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parameters that would make an operation ill-defined, such as a chunk
    /// overlap that is not smaller than the chunk length.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
