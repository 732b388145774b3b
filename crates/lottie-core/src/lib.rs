//! Core logic for Telegram animated stickers: property sampling, the sticker
//! codec, the compactor and the platform-limit normalizer.

pub mod animatable;
pub mod codec;
pub mod compactor;
pub mod error;
pub mod validate;

pub use animatable::Animator;
pub use codec::Codec;
pub use compactor::{compact, compact_with, CompactOptions};
pub use error::{LottieError, Result};
pub use validate::{ensure_compliant, ensure_size, normalize, NormalizeReport};
