//! Editor configuration.
//!
//! Every field has a default, so hosts only pass what they want to change.
//! Field names are camelCase on the wire to match JavaScript callers.

use serde::{Deserialize, Serialize};

use crate::store::ViewMode;
use crate::tag::{BlockTag, HeadingLevel};

/// Top-level configuration for an editor session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub overlay: OverlayConfig,
    pub layout: LayoutMetrics,
    /// Maximum number of undoable structural steps.
    pub history_depth: usize,
    /// View the store starts in.
    pub initial_view: ViewMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            layout: LayoutMetrics::default(),
            history_depth: 100,
            initial_view: ViewMode::Write,
        }
    }
}

/// Placement of heading controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Horizontal distance from the heading's left edge to the control.
    pub gutter_width: i32,
    /// Extra vertical offset per heading level, `h1` first, to line the
    /// control up with the heading's text baseline.
    pub heading_nudges: [i32; 6],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            gutter_width: 48,
            heading_nudges: [6, 0, 0, 0, 0, 0],
        }
    }
}

impl OverlayConfig {
    pub fn nudge(&self, level: HeadingLevel) -> i32 {
        self.heading_nudges[usize::from(level.number() - 1)]
    }
}

/// Block layout model used by the in-memory engine.
///
/// Real engines report measured offsets; this is a deterministic
/// approximation good enough for positioning logic and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMetrics {
    /// Left edge of every block.
    pub content_left: i32,
    /// Top of the first block.
    pub content_top: i32,
    /// Vertical space between consecutive blocks.
    pub block_gap: i32,
    /// Characters per wrapped line.
    pub chars_per_line: usize,
    /// Line height of body blocks.
    pub body_line_height: i32,
    /// Line height per heading level, `h1` first.
    pub heading_line_heights: [i32; 6],
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            content_left: 64,
            content_top: 0,
            block_gap: 16,
            chars_per_line: 80,
            body_line_height: 24,
            heading_line_heights: [40, 32, 28, 24, 24, 24],
        }
    }
}

impl LayoutMetrics {
    pub fn line_height(&self, tag: &BlockTag) -> i32 {
        match tag {
            BlockTag::Heading(level) => {
                self.heading_line_heights[usize::from(level.number() - 1)]
            }
            _ => self.body_line_height,
        }
    }

    /// Height of a block with `text_chars` characters of text.
    pub fn block_height(&self, tag: &BlockTag, text_chars: usize) -> i32 {
        let per_line = self.chars_per_line.max(1);
        let lines = text_chars.div_ceil(per_line).max(1);
        let lines = i32::try_from(lines).unwrap_or(i32::MAX);
        self.line_height(tag).saturating_mul(lines)
    }
}
