use glam::DVec2;
use lottie_data::model::{Keyframe, Property, PropertyValue};

pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

// Component-wise; extra components of the longer side are dropped.
impl Interpolatable for Vec<f64> {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| a + (b - a) * t)
            .collect()
    }
}

// Cubic Bezier Easing
pub fn solve_cubic_bezier(p1: DVec2, p2: DVec2, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson
    let mut t = x;
    for _ in 0..8 {
        let one_minus_t = 1.0 - t;
        let x_est = 3.0 * one_minus_t * one_minus_t * t * p1.x
            + 3.0 * one_minus_t * t * t * p2.x
            + t * t * t;

        let err = x_est - x;
        if err.abs() < 1e-6 {
            break;
        }

        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);

        if dx_dt.abs() < 1e-9 {
            break;
        }
        t -= err / dx_dt;
    }

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}

/// Samples properties at a frame.
pub struct Animator;

impl Animator {
    /// Value of `prop` at `frame` as raw components.
    ///
    /// Constants return their value at every frame. Tracks hold their first value
    /// before the first keyframe and their last value after the last one.
    /// Returns `None` when the property carries no numeric value.
    pub fn components_at(prop: &Property, frame: f64) -> Option<Vec<f64>> {
        match prop.k.as_ref()? {
            PropertyValue::Scalar(v) => Some(vec![*v]),
            PropertyValue::Vector(v) => Some(v.clone()),
            PropertyValue::Animated(keyframes) => Self::resolve_keyframes(keyframes, frame),
            PropertyValue::Bezier(_) | PropertyValue::Raw(_) => None,
        }
    }

    /// Position-like value at `frame`; missing components read as zero.
    pub fn point_at(prop: &Property, frame: f64) -> Option<DVec2> {
        let v = Self::components_at(prop, frame)?;
        Some(DVec2::new(
            v.first().copied().unwrap_or(0.0),
            v.get(1).copied().unwrap_or(0.0),
        ))
    }

    fn resolve_keyframes(keyframes: &[Keyframe], frame: f64) -> Option<Vec<f64>> {
        if keyframes.is_empty() {
            return None;
        }

        // Find the first keyframe where kf.t > frame
        let idx = keyframes.partition_point(|kf| kf.t <= frame);

        if idx == 0 {
            return keyframes[0].s.clone();
        }

        let len = keyframes.len();
        if idx >= len {
            let last = &keyframes[len - 1];
            // Use end value if present, else start value
            return last.e.clone().or_else(|| last.s.clone());
        }

        // Segment is [idx-1, idx]
        let kf_start = &keyframes[idx - 1];
        let kf_end = &keyframes[idx];

        let start_val = kf_start.s.clone()?;
        let end_val = kf_start
            .e
            .clone()
            .or_else(|| kf_end.s.clone())
            .unwrap_or_else(|| start_val.clone());

        let duration = kf_end.t - kf_start.t;
        if duration <= 0.0 || kf_start.is_hold() {
            return Some(start_val);
        }

        let local_t = (frame - kf_start.t) / duration;

        let p1 = kf_start
            .o
            .as_ref()
            .map(|o| DVec2::from(o.point()))
            .unwrap_or(DVec2::ZERO);
        let p2 = kf_start
            .i
            .as_ref()
            .map(|i| DVec2::from(i.point()))
            .unwrap_or(DVec2::ONE);

        let eased = solve_cubic_bezier(p1, p2, local_t);
        Some(start_val.lerp(&end_val, eased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::{EasingHandle, Keyframe};

    fn ramp() -> Property {
        // Keyframes at 0, 10, 20
        Property::track(vec![
            Keyframe::linear(0.0, vec![0.0]),
            Keyframe::linear(10.0, vec![10.0]),
            Keyframe::last(20.0, vec![30.0]),
        ])
    }

    fn at(prop: &Property, frame: f64) -> f64 {
        Animator::components_at(prop, frame).unwrap()[0]
    }

    #[test]
    fn test_animator_resolve_binary_search() {
        let prop = ramp();

        // 1. Exact match start
        assert_eq!(at(&prop, 0.0), 0.0);
        // 2. Exact match middle
        assert_eq!(at(&prop, 10.0), 10.0);
        // 3. Exact match end
        assert_eq!(at(&prop, 20.0), 30.0);
        // 4. Before first
        assert_eq!(at(&prop, -5.0), 0.0);
        // 5. After last
        assert_eq!(at(&prop, 25.0), 30.0);
        // 6. Mid-segment
        assert!((at(&prop, 5.0) - 5.0).abs() < 1e-6);
        // 7. Mid-segment 2
        assert!((at(&prop, 15.0) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_and_single_keyframe_are_equivalent() {
        let constant = Property::vector(vec![3.0, 4.0]);
        let single = Property::track(vec![Keyframe::last(12.0, vec![3.0, 4.0])]);
        for frame in [-10.0, 0.0, 12.0, 100.0] {
            assert_eq!(
                Animator::point_at(&constant, frame),
                Animator::point_at(&single, frame)
            );
        }
    }

    #[test]
    fn test_hold_keyframe_steps() {
        let mut first = Keyframe::linear(0.0, vec![1.0]);
        first.h = Some(1);
        let prop = Property::track(vec![first, Keyframe::last(10.0, vec![2.0])]);
        assert_eq!(at(&prop, 9.9), 1.0);
        assert_eq!(at(&prop, 10.0), 2.0);
    }

    #[test]
    fn test_ease_handles_shape_progress() {
        let mut first = Keyframe::linear(0.0, vec![0.0]);
        first.o = Some(EasingHandle::new(0.42, 0.0));
        first.i = Some(EasingHandle::new(0.58, 1.0));
        let prop = Property::track(vec![first, Keyframe::last(10.0, vec![100.0])]);

        // Ease-in-out: slow start, symmetric midpoint
        assert!(at(&prop, 2.0) < 20.0);
        assert!((at(&prop, 5.0) - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_non_numeric_values_have_no_components() {
        let prop = Property::fixed(PropertyValue::Raw(serde_json::json!({"t": "x"})));
        assert_eq!(Animator::components_at(&prop, 0.0), None);
        assert_eq!(Animator::components_at(&Property::default(), 0.0), None);
    }
}
