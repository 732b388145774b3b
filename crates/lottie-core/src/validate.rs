//! Platform limits for animated stickers and the normalizer that enforces them.

use crate::error::{LottieError, Result};
use lottie_data::model::AnimationDocument;
use tracing::info;

pub const ALLOWED_FRAME_RATES: [f64; 2] = [30.0, 60.0];
pub const MAX_DURATION_SECONDS: f64 = 3.0;
/// Out-point written when a document runs longer than [`MAX_DURATION_SECONDS`].
/// It is a literal frame count, not `MAX_DURATION_SECONDS * fr`.
pub const MAX_OUT_POINT: f64 = 180.0;
pub const CANVAS_SIZE: u32 = 512;
/// Upper bound on the gzip-compressed sticker.
pub const MAX_STICKER_BYTES: usize = 64 * 1024;

/// Which fix-ups [`normalize`] applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub frame_rate: bool,
    pub duration: bool,
    pub canvas: bool,
    pub three_d: bool,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Nearest allowed frame rate; ties go to the lower one.
pub fn snap_frame_rate(fr: f64) -> f64 {
    let [low, high] = ALLOWED_FRAME_RATES;
    if (fr - low).abs() <= (fr - high).abs() {
        low
    } else {
        high
    }
}

/// Frame rate and out-point [`normalize`] leaves on a document with this timing.
pub fn normalized_timing(fr: f64, ip: f64, op: f64) -> (f64, f64) {
    let fr = if ALLOWED_FRAME_RATES.contains(&fr) {
        fr
    } else {
        snap_frame_rate(fr)
    };
    let op = if (op - ip) / fr > MAX_DURATION_SECONDS {
        MAX_OUT_POINT
    } else {
        op
    };
    (fr, op)
}

/// Brings `doc` within the sticker limits. Idempotent.
///
/// Shape coordinates are not rescaled when the canvas size changes.
pub fn normalize(doc: &mut AnimationDocument) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    let (fr, op) = normalized_timing(doc.fr, doc.ip, doc.op);
    if fr != doc.fr {
        info!(from = doc.fr, to = fr, "fixing frame rate");
        doc.fr = fr;
        report.frame_rate = true;
    }

    if op != doc.op {
        info!(from = doc.op, to = op, "fixing duration");
        doc.op = op;
        report.duration = true;
    }

    if doc.w != CANVAS_SIZE || doc.h != CANVAS_SIZE {
        info!(w = doc.w, h = doc.h, "fixing width and height");
        doc.w = CANVAS_SIZE;
        doc.h = CANVAS_SIZE;
        report.canvas = true;
    }

    if doc.is_3d() {
        info!("fixing 3d layers");
        doc.ddd = Some(0);
        report.three_d = true;
    }

    report
}

/// Checks the limits [`normalize`] is expected to establish.
pub fn ensure_compliant(doc: &AnimationDocument) -> Result<()> {
    if !ALLOWED_FRAME_RATES.contains(&doc.fr) {
        return Err(LottieError::ConstraintViolation(format!(
            "frame rate {} is not one of {:?}",
            doc.fr, ALLOWED_FRAME_RATES
        )));
    }
    if doc.w != CANVAS_SIZE || doc.h != CANVAS_SIZE {
        return Err(LottieError::ConstraintViolation(format!(
            "canvas {}x{} is not {}x{}",
            doc.w, doc.h, CANVAS_SIZE, CANVAS_SIZE
        )));
    }
    if doc.is_3d() {
        return Err(LottieError::ConstraintViolation(
            "3D layers are not supported".into(),
        ));
    }
    if !(doc.ip < doc.op) || doc.op > MAX_OUT_POINT {
        return Err(LottieError::ConstraintViolation(format!(
            "timeline [{}, {}) is empty or ends after frame {}",
            doc.ip, doc.op, MAX_OUT_POINT
        )));
    }
    Ok(())
}

/// Checks the encoded sticker against [`MAX_STICKER_BYTES`].
pub fn ensure_size(encoded: &[u8], limit: usize) -> Result<()> {
    if encoded.len() > limit {
        return Err(LottieError::ConstraintViolation(format!(
            "encoded sticker is {} bytes, limit is {}",
            encoded.len(),
            limit
        )));
    }
    Ok(())
}
