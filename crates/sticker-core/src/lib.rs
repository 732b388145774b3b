//! # Sticker Core
//!
//! `sticker-core` writes animated captions onto Telegram animated stickers.
//!
//! Text is turned into vector letter shapes straight from a font's glyph outlines,
//! animated with baked keyframes and inserted as a new top layer. The result is
//! brought within the platform limits (frame rate, duration, canvas, size) before
//! it is compacted and re-encoded.
//!
//! ## Core Features
//!
//! *   **Vector Text**: Glyph contours become Lottie paths; no rasterization.
//! *   **Motion**: Letter shake, staggered spring drop, and side slide-in per line.
//! *   **Layout**: Top, middle and bottom lines, centered and shrunk to fit.
//! *   **Compliance**: Normalization, compaction and a final size check.
//!
//! ## Usage
//!
//! The entry point is [`StickerOverlay`], which owns a glyph provider and an
//! [`OverlayConfig`].
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use sticker_core::{Caption, OverlayConfig, StickerOverlay, TtfOutlineProvider};
//!
//! # fn main() -> sticker_core::Result<()> {
//! let font = TtfOutlineProvider::from_file("impact.ttf")?;
//! let overlay = StickerOverlay::new(font, OverlayConfig::default())?;
//!
//! let input = std::fs::read("sticker.tgs")?;
//! let caption = Caption::from_message("when the build is green", 16);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let output = overlay.overlay(&input, &caption, None, &mut rng)?;
//! std::fs::write("captioned.tgs", output)?;
//! # Ok(())
//! # }
//! ```

/// Inserting the caption layer into a document.
pub mod assembler;

/// Caption lines and free-form message wrapping.
pub mod caption;

/// Overlay settings loaded from JSON.
pub mod config;

pub mod errors;

/// Glyph outline providers.
pub mod glyph;

/// Line placement and styling.
pub mod layout;

/// Keyframed letter and line motion.
pub mod motion;

/// The end-to-end overlay pipeline.
pub mod pipeline;

/// Building vector shapes from text.
pub mod text;

pub use caption::Caption;
pub use config::OverlayConfig;
pub use errors::{Result, StickerError};
pub use glyph::{FontMetrics, GlyphOutline, GlyphOutlineProvider, TtfOutlineProvider};
pub use layout::LineRole;
pub use motion::AnimationVariant;
pub use pipeline::StickerOverlay;
