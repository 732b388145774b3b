//! Turns strings into positioned vector shapes.

use crate::glyph::GlyphOutlineProvider;
use crate::errors::StickerError;
use glam::DVec2;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape as _};
use lottie_data::model::{BezierPath, GroupShape, PathShape, Shape};
use tracing::debug;

/// Called for characters the font cannot draw, with the character, the font size,
/// the pen position (which the callback may advance) and the group being built.
pub type MissingGlyphFn<'a> = dyn FnMut(char, f64, &mut DVec2, &mut GroupShape) + 'a;

/// A rendered string.
#[derive(Clone, Debug)]
pub struct RenderedText {
    /// One item per drawn character: a path, or a group when the character has
    /// several contours. Baseline at `y = 0`, first pen position at `x = 0`.
    pub group: GroupShape,
    pub line_height: f64,
    /// Union of all glyph outlines and of any shapes `on_missing` added;
    /// zero-sized when nothing was drawn.
    pub bounds: Rect,
}

impl RenderedText {
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    /// Number of drawn characters.
    pub fn glyph_count(&self) -> usize {
        self.group.items.len()
    }
}

pub struct TextShapeBuilder<'a, P: GlyphOutlineProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: GlyphOutlineProvider + ?Sized> TextShapeBuilder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Lays `text` out at `size` canvas units per em.
    ///
    /// Newlines return the pen to `x = 0` one line lower. Characters without a
    /// glyph go to `on_missing` when given and are skipped otherwise. Advances
    /// come from the glyphs alone; no kerning is applied.
    pub fn render(
        &self,
        text: &str,
        size: f64,
        mut on_missing: Option<&mut MissingGlyphFn<'_>>,
    ) -> RenderedText {
        let metrics = self.provider.metrics();
        let scale = metrics.scale(size);
        let line_height = metrics.line_height(size);

        let mut group = GroupShape::new(Some(text.to_string()));
        let mut pos = DVec2::ZERO;
        let mut bounds: Option<Rect> = None;

        for ch in text.chars() {
            if ch == '\n' {
                pos.x = 0.0;
                pos.y += line_height;
                continue;
            }

            let outline = match self.provider.outline_for(ch) {
                Ok(outline) => outline,
                Err(StickerError::UnsupportedGlyph(_)) => {
                    if let Some(callback) = on_missing.as_mut() {
                        let before = group.items.len();
                        callback(ch, size, &mut pos, &mut group);
                        for added in &group.items[before..] {
                            if let Some(bbox) = shape_bounds(added) {
                                bounds = Some(bounds.map_or(bbox, |b| b.union(bbox)));
                            }
                        }
                    } else {
                        debug!(?ch, "skipping character without glyph");
                    }
                    continue;
                }
                Err(e) => {
                    debug!(?ch, error = %e, "glyph lookup failed, skipping");
                    continue;
                }
            };

            // Font units are Y-up; the canvas is Y-down.
            let placement =
                Affine::translate((pos.x, pos.y)) * Affine::scale_non_uniform(scale, -scale);

            let mut paths = Vec::with_capacity(outline.contours.len());
            for contour in &outline.contours {
                let placed = placement * contour.clone();
                let bbox = placed.bounding_box();
                bounds = Some(bounds.map_or(bbox, |b| b.union(bbox)));
                paths.extend(to_lottie_paths(&placed).into_iter().map(PathShape::new));
            }

            match paths.len() {
                0 => {}
                1 => group.push(Shape::Path(paths.remove(0))),
                _ => {
                    let mut letter = GroupShape::new(Some(ch.to_string()));
                    letter.items = paths.into_iter().map(Shape::Path).collect();
                    group.push(Shape::Group(letter));
                }
            }

            pos.x += outline.advance * scale;
        }

        RenderedText {
            group,
            line_height,
            bounds: bounds.unwrap_or(Rect::ZERO),
        }
    }
}

/// Converts a kurbo path into Lottie bezier outlines, one per subpath.
///
/// Lottie tangents are stored relative to their vertex; quadratic segments are
/// raised to cubics.
pub fn to_lottie_paths(path: &BezPath) -> Vec<BezierPath> {
    fn rel(p: Point, origin: Point) -> [f64; 2] {
        [p.x - origin.x, p.y - origin.y]
    }

    fn finish(current: &mut BezierPath, out: &mut Vec<BezierPath>) {
        let done = std::mem::replace(current, BezierPath::closed());
        if !done.is_empty() {
            out.push(done);
        }
    }

    let mut out = Vec::new();
    let mut current = BezierPath::closed();
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish(&mut current, &mut out);
                current.push_vertex([p.x, p.y], [0.0, 0.0], [0.0, 0.0]);
                last = p;
            }
            PathEl::LineTo(p) => {
                current.push_vertex([p.x, p.y], [0.0, 0.0], [0.0, 0.0]);
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                let c1 = last + (c - last) * (2.0 / 3.0);
                let c2 = p + (c - p) * (2.0 / 3.0);
                set_out_tangent(&mut current, rel(c1, last));
                current.push_vertex([p.x, p.y], rel(c2, p), [0.0, 0.0]);
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                set_out_tangent(&mut current, rel(c1, last));
                current.push_vertex([p.x, p.y], rel(c2, p), [0.0, 0.0]);
                last = p;
            }
            PathEl::ClosePath => {
                merge_closing_vertex(&mut current);
                finish(&mut current, &mut out);
            }
        }
    }
    finish(&mut current, &mut out);
    out
}

/// Converts a Lottie bezier outline back into a kurbo path.
pub fn from_lottie_path(path: &BezierPath) -> BezPath {
    let point = |p: [f64; 2]| Point::new(p[0], p[1]);
    let offset = |v: [f64; 2], t: Option<&[f64; 2]>| {
        let t = t.copied().unwrap_or([0.0, 0.0]);
        Point::new(v[0] + t[0], v[1] + t[1])
    };

    let mut out = BezPath::new();
    let n = path.v.len();
    if n == 0 {
        return out;
    }
    out.move_to(point(path.v[0]));
    let segments = if path.c { n } else { n - 1 };
    for k in 0..segments {
        let (a, b) = (k, (k + 1) % n);
        out.curve_to(
            offset(path.v[a], path.o.get(a)),
            offset(path.v[b], path.i.get(b)),
            point(path.v[b]),
        );
    }
    if path.c {
        out.close_path();
    }
    out
}

/// Bounds of the static outlines in `shape`, including nested groups offset by
/// their constant position.
fn shape_bounds(shape: &Shape) -> Option<Rect> {
    match shape {
        Shape::Path(path) => path
            .bezier()
            .filter(|b| !b.is_empty())
            .map(|b| from_lottie_path(b).bounding_box()),
        Shape::Group(group) => {
            let inner = group
                .items
                .iter()
                .filter_map(shape_bounds)
                .reduce(|a, b| a.union(b))?;
            let offset = group
                .transform
                .as_ref()
                .map(|t| {
                    let p = t.p.as_ref().and_then(|p| p.static_components());
                    let a = t.a.as_ref().and_then(|a| a.static_components());
                    let at = |c: &Option<Vec<f64>>, i: usize| {
                        c.as_ref().and_then(|c| c.get(i).copied()).unwrap_or(0.0)
                    };
                    (at(&p, 0) - at(&a, 0), at(&p, 1) - at(&a, 1))
                })
                .unwrap_or((0.0, 0.0));
            Some(inner + kurbo::Vec2::new(offset.0, offset.1))
        }
        _ => None,
    }
}

fn set_out_tangent(path: &mut BezierPath, tangent: [f64; 2]) {
    if let Some(o) = path.o.last_mut() {
        *o = tangent;
    }
}

// Closed contours usually end on their starting point; fold that duplicate
// vertex into the first one so the closing segment keeps its tangent.
fn merge_closing_vertex(path: &mut BezierPath) {
    let n = path.len();
    if n < 2 {
        return;
    }
    let (first, last) = (path.v[0], path.v[n - 1]);
    if (first[0] - last[0]).abs() < 1e-9 && (first[1] - last[1]).abs() < 1e-9 {
        path.i[0] = path.i[n - 1];
        path.v.pop();
        path.i.pop();
        path.o.pop();
    }
}
