//! Placement and styling of caption lines on the canvas.

use crate::config::OverlayConfig;
use crate::motion::{spring_pull, AnimationVariant, Timeline};
use glam::DVec2;
use kurbo::Rect;
use lottie_data::model::{FillShape, GroupShape, Property, Shape, StrokeShape};
use serde::{Deserialize, Serialize};

/// Where a line sits on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    Top,
    Middle,
    Bottom,
}

impl LineRole {
    /// Horizontal start of the side spring, or `None` for lines that start at rest.
    pub fn side_start_x(self, canvas_size: f64) -> Option<f64> {
        match self {
            LineRole::Top => Some(canvas_size),
            LineRole::Bottom => Some(-canvas_size),
            LineRole::Middle => None,
        }
    }

    /// Baseline height for this role.
    pub fn baseline_y(self, config: &OverlayConfig) -> f64 {
        let offsets = &config.line_offsets;
        match self {
            LineRole::Top => offsets.top,
            LineRole::Middle => config.canvas_size / 2.0 + offsets.middle,
            LineRole::Bottom => config.canvas_size - offsets.bottom,
        }
    }
}

/// One caption line while it is being built.
#[derive(Clone, Debug)]
pub struct TextLine {
    pub text: String,
    pub role: LineRole,
    pub group: GroupShape,
}

/// Resting position of a line group whose content spans `bounds`.
///
/// This is where the left edge of the bounding box goes; see [`place_line`].
pub fn resting_position(role: LineRole, bounds: Rect, config: &OverlayConfig) -> DVec2 {
    let width = bounds.width().max(0.0);
    DVec2::new((config.canvas_size - width) / 2.0, role.baseline_y(config))
}

/// Sets the line's position: constant at rest, or a side spring ending at rest
/// for [`AnimationVariant::SpringPullSide`].
///
/// The anchor is moved onto the left edge of `bounds`, so the position is the
/// box's left edge even when the first glyph has a side bearing.
pub fn place_line(
    line: &mut GroupShape,
    role: LineRole,
    bounds: Rect,
    variant: AnimationVariant,
    timeline: &Timeline,
    config: &OverlayConfig,
) -> DVec2 {
    let rest = resting_position(role, bounds, config);
    let transform = line.transform_mut();
    transform.a = Some(Property::vector(vec![bounds.x0, 0.0]));
    let position = transform.position_mut();
    *position = Property::vector(vec![rest.x, rest.y]);

    if variant == AnimationVariant::SpringPullSide {
        if let Some(start_x) = role.side_start_x(config.canvas_size) {
            *position = Property::vector(vec![start_x, rest.y]);
            let end = timeline.ip + (timeline.frames() / 2.0).floor();
            spring_pull(position, rest, timeline.ip, end, config.spring);
        }
    }
    rest
}

/// Appends the fill and the outline stroke as the last two items of `line`.
pub fn style_line(line: &mut GroupShape, config: &OverlayConfig) {
    line.push(Shape::Fill(FillShape::solid(config.fill_color)));
    line.push(Shape::Stroke(StrokeShape::solid(
        config.stroke_color,
        config.stroke_width,
    )));
}
