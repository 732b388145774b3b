//! Keyframed motion for caption letters and lines.
//!
//! Every animation here rewrites the position property of the groups it is
//! given and touches nothing else.

use glam::DVec2;
use lottie_core::validate::{normalized_timing, snap_frame_rate};
use lottie_core::Animator;
use lottie_data::model::{AnimationDocument, GroupShape, Keyframe, Property};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Supported caption animations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationVariant {
    /// Letters jitter around their resting place for the whole timeline.
    Shake,
    /// Letters drop in from above one after another.
    SpringPullTop,
    /// Top and bottom lines slide in from opposite sides.
    SpringPullSide,
}

impl AnimationVariant {
    pub const ALL: [AnimationVariant; 3] = [
        AnimationVariant::Shake,
        AnimationVariant::SpringPullTop,
        AnimationVariant::SpringPullSide,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&AnimationVariant::Shake)
    }

    /// Spring variants need time to settle; short timelines fall back to shaking.
    pub fn for_timeline(self, timeline: &Timeline, min_spring_seconds: f64) -> Self {
        if timeline.seconds() < min_spring_seconds {
            AnimationVariant::Shake
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationVariant::Shake => "shake",
            AnimationVariant::SpringPullTop => "spring_pull_top",
            AnimationVariant::SpringPullSide => "spring_pull_side",
        }
    }
}

impl fmt::Display for AnimationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown animation variant: {}", s))
    }
}

/// The frame range an animation is fitted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    pub ip: f64,
    pub op: f64,
    pub fr: f64,
}

impl Timeline {
    /// The timeline `doc` will have once normalized.
    pub fn of(doc: &AnimationDocument) -> Self {
        let (fr, op) = normalized_timing(doc.fr, doc.ip, doc.op);
        Self { ip: doc.ip, op, fr }
    }

    /// Length in frames.
    pub fn frames(&self) -> f64 {
        self.op - self.ip
    }

    pub fn seconds(&self) -> f64 {
        if self.fr > 0.0 {
            self.frames() / self.fr
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub x_radius: f64,
    pub y_radius: f64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            x_radius: 5.0,
            y_radius: 5.0,
        }
    }
}

/// Damped spring baked into keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// How slowly the overshoot decays; higher keeps it swinging longer.
    pub falloff: f64,
    /// Number of half-swings before landing.
    pub oscillations: u32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            falloff: 7.0,
            oscillations: 7,
        }
    }
}

fn point(p: DVec2) -> Vec<f64> {
    vec![p.x, p.y]
}

/// Replaces `position` with a random jitter around its value at `start`.
///
/// `steps` jitter keyframes are spread evenly over `[start, end)`, each offset
/// by at most the configured radii; the track returns to rest at `end`.
pub fn shake<R: Rng>(
    position: &mut Property,
    config: ShakeConfig,
    start: f64,
    end: f64,
    steps: u32,
    rng: &mut R,
) {
    let rest = Animator::point_at(position, start).unwrap_or(DVec2::ZERO);
    let steps = steps.max(1);
    let frame_time = (end - start) / steps as f64;

    let mut keyframes = Vec::with_capacity(steps as usize + 1);
    for i in 0..steps {
        let jitter = DVec2::new(
            rng.gen_range(-1.0..=1.0) * config.x_radius,
            rng.gen_range(-1.0..=1.0) * config.y_radius,
        );
        keyframes.push(Keyframe::linear(
            start + i as f64 * frame_time,
            point(rest + jitter),
        ));
    }
    keyframes.push(Keyframe::last(end, point(rest)));

    *position = Property::track(keyframes);
}

/// Replaces `position` with a spring from its value at `start` to `target`,
/// landing at `end`.
///
/// Before `start` the track holds the starting value.
pub fn spring_pull(
    position: &mut Property,
    target: DVec2,
    start: f64,
    end: f64,
    config: SpringConfig,
) {
    let from = Animator::point_at(position, start).unwrap_or(target);
    let offset = from - target;
    let n = config.oscillations.max(1);
    let delta = (end - start) / n as f64;

    let mut keyframes = Vec::with_capacity(n as usize + 1);
    for i in 0..n {
        let x = i as f64 / n as f64;
        let factor = (x * PI * n as f64).cos() * (1.0 - x.powf(1.0 / config.falloff));
        keyframes.push(Keyframe::linear(
            start + delta * i as f64,
            point(target + offset * factor),
        ));
    }
    keyframes.push(Keyframe::last(end, point(target)));

    *position = Property::track(keyframes);
}

/// Per-letter motion for one line.
///
/// `letter_count` is the character count of the line's text; it sets the
/// stagger of [`AnimationVariant::SpringPullTop`]. Letters whose turn would come
/// at or after the landing time stay at rest.
/// [`AnimationVariant::SpringPullSide`] moves whole lines and leaves letters alone.
#[allow(clippy::too_many_arguments)]
pub fn animate_letters<R: Rng>(
    letters: &mut [GroupShape],
    variant: AnimationVariant,
    timeline: &Timeline,
    letter_count: usize,
    drop_height: f64,
    shake_config: ShakeConfig,
    spring_config: SpringConfig,
    rng: &mut R,
) {
    match variant {
        AnimationVariant::Shake => {
            let steps = (snap_frame_rate(timeline.fr) / 2.0).round() as u32;
            for letter in letters.iter_mut() {
                shake(
                    letter.transform_mut().position_mut(),
                    shake_config,
                    timeline.ip,
                    timeline.op,
                    steps,
                    rng,
                );
            }
        }
        AnimationVariant::SpringPullTop => {
            let span = (timeline.frames() / 1.7).floor();
            let end_time = timeline.ip + span;
            let stagger = span / letter_count.max(1) as f64;
            for (index, letter) in letters.iter_mut().enumerate() {
                let start_time = timeline.ip + index as f64 * stagger;
                let position = letter.transform_mut().position_mut();
                if start_time < end_time {
                    *position = Property::vector(vec![0.0, -drop_height]);
                    spring_pull(position, DVec2::ZERO, start_time, end_time, spring_config);
                } else {
                    *position = Property::vector(vec![0.0, 0.0]);
                }
            }
        }
        AnimationVariant::SpringPullSide => {}
    }
}
