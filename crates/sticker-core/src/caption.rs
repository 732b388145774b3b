//! Caption text: up to three lines, or a free-form message wrapped into them.

use crate::layout::LineRole;
use serde::{Deserialize, Serialize};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caption {
    pub top: Option<String>,
    pub middle: Option<String>,
    pub bottom: Option<String>,
}

impl Caption {
    pub fn new(top: Option<String>, middle: Option<String>, bottom: Option<String>) -> Self {
        Self {
            top,
            middle,
            bottom,
        }
    }

    /// Wraps `message` at `width` grapheme clusters and spreads the lines over
    /// the three roles: one line goes on top, two on top and bottom, three fill
    /// all roles. Further lines are dropped.
    pub fn from_message(message: &str, width: usize) -> Self {
        let mut lines = wrap(message, width).into_iter();
        match lines.len() {
            0 => Self::default(),
            1 => Self::new(lines.next(), None, None),
            2 => Self::new(lines.next(), None, lines.next()),
            n => {
                if n > 3 {
                    warn!(lines = n, "caption too long, keeping the first three lines");
                }
                let top = lines.next();
                let middle = lines.next();
                let bottom = lines.next();
                Self::new(top, middle, bottom)
            }
        }
    }

    /// Non-empty lines in insertion order: top, bottom, then middle.
    pub fn lines(&self) -> Vec<(LineRole, &str)> {
        [
            (LineRole::Top, &self.top),
            (LineRole::Bottom, &self.bottom),
            (LineRole::Middle, &self.middle),
        ]
        .into_iter()
        .filter_map(|(role, text)| match text.as_deref() {
            Some(t) if !t.is_empty() => Some((role, t)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// Greedy word wrap measured in grapheme clusters.
///
/// Runs of whitespace collapse to one space; words longer than `width` are
/// split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut graphemes: Vec<&str> = word.graphemes(true).collect();

        let needed = if current_len == 0 {
            graphemes.len()
        } else {
            current_len + 1 + graphemes.len()
        };
        if needed <= width {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += graphemes.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while graphemes.len() > width {
            let rest = graphemes.split_off(width);
            lines.push(graphemes.concat());
            graphemes = rest;
        }
        current = graphemes.concat();
        current_len = graphemes.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
