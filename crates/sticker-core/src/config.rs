//! Overlay configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use crate::errors::{Result, StickerError};
use crate::motion::{ShakeConfig, SpringConfig};
use lottie_core::validate::{CANVAS_SIZE, MAX_STICKER_BYTES};
use lottie_core::CompactOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one overlay pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Maximum glyph size in canvas units. Lines too wide for the canvas are
    /// rendered smaller.
    pub font_size: f64,
    /// Side of the square target canvas.
    pub canvas_size: f64,
    /// Horizontal room kept free on each side when fitting a line.
    pub fit_margin: f64,
    /// RGBA, components in `0..=1`.
    pub fill_color: [f64; 4],
    pub stroke_color: [f64; 4],
    pub stroke_width: f64,
    pub line_offsets: LineOffsets,
    /// Grapheme clusters per line when wrapping a free-form message.
    pub wrap_width: usize,
    pub shake: ShakeConfig,
    pub spring: SpringConfig,
    /// Shortest timeline, in seconds, that still gets a spring animation.
    pub min_spring_seconds: f64,
    pub compact: CompactConfig,
    /// Reject encoded stickers larger than this many bytes.
    pub max_output_bytes: Option<usize>,
}

/// Vertical placement of line baselines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOffsets {
    /// Distance of the top baseline from the top edge.
    pub top: f64,
    /// Offset of the middle baseline from the canvas centre.
    pub middle: f64,
    /// Distance of the bottom baseline from the bottom edge.
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactConfig {
    pub precision: i32,
    pub collapse_zero_pairs: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: 64.0,
            canvas_size: CANVAS_SIZE as f64,
            fit_margin: 16.0,
            fill_color: [1.0, 1.0, 1.0, 1.0],
            stroke_color: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 7.0,
            line_offsets: LineOffsets::default(),
            wrap_width: 16,
            shake: ShakeConfig::default(),
            spring: SpringConfig::default(),
            min_spring_seconds: 1.5,
            compact: CompactConfig::default(),
            max_output_bytes: Some(MAX_STICKER_BYTES),
        }
    }
}

impl Default for LineOffsets {
    fn default() -> Self {
        Self {
            top: 80.0,
            middle: -30.0,
            bottom: 50.0,
        }
    }
}

impl Default for CompactConfig {
    fn default() -> Self {
        let options = CompactOptions::default();
        Self {
            precision: options.precision,
            collapse_zero_pairs: options.collapse_zero_pairs,
        }
    }
}

impl From<CompactConfig> for CompactOptions {
    fn from(config: CompactConfig) -> Self {
        CompactOptions {
            precision: config.precision,
            collapse_zero_pairs: config.collapse_zero_pairs,
        }
    }
}

impl OverlayConfig {
    /// Loads a (possibly partial) JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        let config: OverlayConfig = serde_json::from_slice(&raw)
            .map_err(|e| StickerError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("font_size", self.font_size),
            ("canvas_size", self.canvas_size),
            ("min_spring_seconds", self.min_spring_seconds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StickerError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.stroke_width >= 0.0) {
            return Err(StickerError::Config("stroke_width must not be negative".into()));
        }
        if !(self.fit_margin >= 0.0) || self.fit_margin * 2.0 >= self.canvas_size {
            return Err(StickerError::Config(
                "fit_margin must leave room on the canvas".into(),
            ));
        }
        if self.wrap_width == 0 {
            return Err(StickerError::Config("wrap_width must be at least 1".into()));
        }
        if self.spring.oscillations == 0 || !(self.spring.falloff > 0.0) {
            return Err(StickerError::Config(
                "spring needs at least one oscillation and a positive falloff".into(),
            ));
        }
        let in_unit = |c: &[f64; 4]| c.iter().all(|v| (0.0..=1.0).contains(v));
        if !in_unit(&self.fill_color) || !in_unit(&self.stroke_color) {
            return Err(StickerError::Config(
                "colors are RGBA with components in 0..=1".into(),
            ));
        }
        Ok(())
    }

    /// Usable line width after margins.
    pub fn fit_width(&self) -> f64 {
        self.canvas_size - 2.0 * self.fit_margin
    }
}
