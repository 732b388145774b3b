use lottie_core::LottieError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// The font has no glyph for this character. Recovered per character while
    /// building text; never returned from the overlay pipeline.
    #[error("No glyph for {0:?}")]
    UnsupportedGlyph(char),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to encode sticker: {0}")]
    Encode(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<LottieError> for StickerError {
    fn from(err: LottieError) -> Self {
        match err {
            LottieError::MalformedInput(msg) => StickerError::MalformedInput(msg),
            LottieError::ConstraintViolation(msg) => StickerError::ConstraintViolation(msg),
            LottieError::Encode(msg) => StickerError::Encode(msg),
            LottieError::IoError(e) => StickerError::IoError(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, StickerError>;
