use thiserror::Error;

#[derive(Error, Debug)]
pub enum LottieError {
    /// Input could not be decompressed, parsed, or mapped onto the document model.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// A document still breaks a platform limit after normalization.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Failed to encode document: {0}")]
    Encode(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LottieError>;
