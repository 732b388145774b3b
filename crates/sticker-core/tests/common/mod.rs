#![allow(dead_code)]

use kurbo::Shape as _;
use lottie_data::model::AnimationDocument;
use serde_json::json;
use sticker_core::errors::Result;
use sticker_core::{FontMetrics, GlyphOutline, GlyphOutlineProvider, StickerError};

/// Rectangle glyphs at 1000 units per em.
///
/// Lowercase `i` has two contours (stem and dot), `J` sits 200 units right of
/// its origin, space has none, `#` is missing, everything else is one 500x700
/// block advancing 600.
pub struct BlockFont;

impl GlyphOutlineProvider for BlockFont {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            units_per_em: 1000.0,
            y_max: 1000.0,
        }
    }

    fn outline_for(&self, ch: char) -> Result<GlyphOutline> {
        let rect = |x0: f64, y0: f64, x1: f64, y1: f64| kurbo::Rect::new(x0, y0, x1, y1).to_path(0.1);
        match ch {
            ' ' => Ok(GlyphOutline {
                contours: vec![],
                advance: 300.0,
            }),
            'i' => Ok(GlyphOutline {
                contours: vec![rect(0.0, 0.0, 200.0, 500.0), rect(0.0, 600.0, 200.0, 750.0)],
                advance: 300.0,
            }),
            'J' => Ok(GlyphOutline {
                contours: vec![rect(200.0, 0.0, 700.0, 700.0)],
                advance: 800.0,
            }),
            '#' => Err(StickerError::UnsupportedGlyph(ch)),
            _ => Ok(GlyphOutline {
                contours: vec![rect(0.0, 0.0, 500.0, 700.0)],
                advance: 600.0,
            }),
        }
    }
}

/// A one-layer sticker with a square outline on a `w`x`h` canvas.
pub fn sticker(fr: f64, ip: f64, op: f64, w: u32, h: u32) -> AnimationDocument {
    serde_json::from_value(json!({
        "v": "5.5.2", "fr": fr, "ip": ip, "op": op, "w": w, "h": h, "nm": "duck", "ddd": 0,
        "assets": [],
        "layers": [{
            "ddd": 0, "ind": 1, "ty": 4, "nm": "body", "sr": 1,
            "ks": { "o": { "a": 0, "k": 100 }, "p": { "a": 0, "k": [256, 256, 0] } },
            "ao": 0, "ip": ip, "op": op, "st": 0, "bm": 0,
            "shapes": [{
                "ty": "gr", "nm": "square",
                "it": [
                    { "ty": "sh", "ks": { "a": 0, "k": {
                        "c": true,
                        "i": [[0, 0], [0, 0], [0, 0], [0, 0]],
                        "o": [[0, 0], [0, 0], [0, 0], [0, 0]],
                        "v": [[-50, -50], [50, -50], [50, 50], [-50, 50]]
                    } } },
                    { "ty": "fl", "c": { "a": 0, "k": [1, 0.8, 0, 1] }, "o": { "a": 0, "k": 100 }, "r": 1 },
                    { "ty": "tr", "p": { "a": 0, "k": [0, 0] }, "a": { "a": 0, "k": [0, 0] },
                      "s": { "a": 0, "k": [100, 100] }, "r": { "a": 0, "k": 0 }, "o": { "a": 0, "k": 100 } }
                ]
            }]
        }]
    }))
    .unwrap()
}

pub fn tgs(doc: &AnimationDocument) -> Vec<u8> {
    lottie_core::Codec::encode(doc).unwrap()
}

/// Routes pipeline logs to the test output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
