//! Glyph outline extraction.
//!
//! [`GlyphOutlineProvider`] is the narrow seam between the text builder and a
//! font. [`TtfOutlineProvider`] implements it over TrueType/OpenType data with
//! `ttf-parser`; tests substitute in-memory providers.

use crate::errors::{Result, StickerError};
use kurbo::BezPath;
use std::path::Path;
use tracing::debug;

/// Outline of one character in font design units (Y-up, origin on the baseline).
#[derive(Clone, Debug, Default)]
pub struct GlyphOutline {
    /// Closed contours, one [`BezPath`] each.
    pub contours: Vec<BezPath>,
    /// Horizontal advance.
    pub advance: f64,
}

/// Font-wide metrics in design units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f64,
    /// Highest point of any glyph (`head.yMax`); one line of text is this tall.
    pub y_max: f64,
}

impl FontMetrics {
    /// Design-unit to canvas-unit factor at `size`.
    pub fn scale(&self, size: f64) -> f64 {
        size / self.units_per_em
    }

    pub fn line_height(&self, size: f64) -> f64 {
        self.y_max * self.scale(size)
    }
}

/// Source of glyph outlines.
///
/// Implementations are read-only after construction so one provider can serve
/// many overlay calls, including from several threads.
pub trait GlyphOutlineProvider: Send + Sync {
    fn metrics(&self) -> FontMetrics;

    /// Outline for `ch`, or [`StickerError::UnsupportedGlyph`] when the font has none.
    fn outline_for(&self, ch: char) -> Result<GlyphOutline>;
}

impl<P: GlyphOutlineProvider + ?Sized> GlyphOutlineProvider for std::sync::Arc<P> {
    fn metrics(&self) -> FontMetrics {
        (**self).metrics()
    }

    fn outline_for(&self, ch: char) -> Result<GlyphOutline> {
        (**self).outline_for(ch)
    }
}

/// Glyph outlines read from a TrueType/OpenType font.
pub struct TtfOutlineProvider {
    data: Vec<u8>,
    index: u32,
    metrics: FontMetrics,
}

impl TtfOutlineProvider {
    /// Parses `data` (face `index` of a collection) and caches the font metrics.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        let metrics = {
            let face = ttf_parser::Face::parse(&data, index)
                .map_err(|e| StickerError::Font(e.to_string()))?;
            FontMetrics {
                units_per_em: face.units_per_em() as f64,
                y_max: face.global_bounding_box().y_max as f64,
            }
        };
        if metrics.units_per_em <= 0.0 {
            return Err(StickerError::Font("font reports zero units per em".into()));
        }
        debug!(
            units_per_em = metrics.units_per_em,
            y_max = metrics.y_max,
            "loaded font"
        );
        Ok(Self {
            data,
            index,
            metrics,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| StickerError::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data, 0)
    }

    fn face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).map_err(|e| StickerError::Font(e.to_string()))
    }
}

impl GlyphOutlineProvider for TtfOutlineProvider {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn outline_for(&self, ch: char) -> Result<GlyphOutline> {
        let face = self.face()?;
        let glyph = face
            .glyph_index(ch)
            .filter(|id| id.0 != 0)
            .ok_or(StickerError::UnsupportedGlyph(ch))?;

        let mut sink = ContourSink::default();
        // `None` means the glyph has no outline (e.g. space), which is fine.
        face.outline_glyph(glyph, &mut sink);

        Ok(GlyphOutline {
            contours: sink.finish(),
            advance: face.glyph_hor_advance(glyph).unwrap_or(0) as f64,
        })
    }
}

/// Splits a glyph outline into one [`BezPath`] per contour.
#[derive(Default)]
struct ContourSink {
    contours: Vec<BezPath>,
    current: BezPath,
}

impl ContourSink {
    fn flush(&mut self) {
        if !self.current.elements().is_empty() {
            self.contours.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<BezPath> {
        self.flush();
        self.contours
    }
}

impl ttf_parser::OutlineBuilder for ContourSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.current.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.current
            .quad_to((x1 as f64, y1 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.current.curve_to(
            (x1 as f64, y1 as f64),
            (x2 as f64, y2 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.current.close_path();
        self.flush();
    }
}
