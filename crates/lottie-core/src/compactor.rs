//! Size-reducing pass over the serialized document tree.
//!
//! Two rewrites are applied while walking every map and sequence:
//!
//! * floating-point leaves are rounded to two decimal digits;
//! * a non-empty sequence made only of `[0, 0]` pairs is replaced by `[]`.
//!
//! The second rewrite is only sound while the schema gives an empty sequence the
//! same meaning as a run of zero pairs (e.g. all-zero bezier tangents). Producers
//! that rely on the pair count matching a sibling array must disable it through
//! [`CompactOptions::collapse_zero_pairs`].
//!
//! Key names, key order, integers, strings, booleans and nulls are never touched.

use serde_json::{Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactOptions {
    /// Decimal digits kept on floating-point leaves.
    pub precision: i32,
    pub collapse_zero_pairs: bool,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            collapse_zero_pairs: true,
        }
    }
}

/// Compacts `tree` in place with the default options.
pub fn compact(tree: &mut Value) {
    compact_with(tree, CompactOptions::default());
}

pub fn compact_with(tree: &mut Value, options: CompactOptions) {
    let scale = 10f64.powi(options.precision);
    walk(tree, scale, options.collapse_zero_pairs);
}

fn walk(value: &mut Value, scale: f64, collapse: bool) {
    match value {
        Value::Array(items) => {
            // Round first so values that round to zero collapse in the same pass
            for item in items.iter_mut() {
                walk(item, scale, collapse);
            }
            if collapse && !items.is_empty() && items.iter().all(is_zero_pair) {
                items.clear();
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                walk(item, scale, collapse);
            }
        }
        Value::Number(n) if n.is_f64() => {
            if let Some(rounded) = n
                .as_f64()
                .filter(|f| f.is_finite())
                .and_then(|f| Number::from_f64((f * scale).round() / scale))
            {
                *n = rounded;
            }
        }
        _ => {}
    }
}

fn is_zero_pair(value: &Value) -> bool {
    match value.as_array() {
        Some(pair) => pair.len() == 2 && pair.iter().all(|c| c.as_f64() == Some(0.0)),
        None => false,
    }
}
