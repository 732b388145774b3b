//! # Sticker Caption
//!
//! Writes animated vector captions onto Telegram animated stickers (`.tgs`).
//!
//! This crate re-exports the workspace:
//!
//! *   [`data`]: the Lottie document model.
//! *   [`lottie`]: sampling, codec, compactor and platform-limit normalizer.
//! *   [`overlay`]: glyphs, text shapes, motion, layout and the overlay pipeline.

pub use lottie_core as lottie;
pub use lottie_data as data;
pub use sticker_core as overlay;

pub use sticker_core::{
    AnimationVariant, Caption, OverlayConfig, Result, StickerError, StickerOverlay,
    TtfOutlineProvider,
};
