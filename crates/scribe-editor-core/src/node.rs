//! Block element handles.
//!
//! A [`BlockNode`] is a reference to an element mounted in the engine's
//! rendered tree. Handles are cheap to clone and compare by identity; they
//! never own a copy of the element.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Pixel offset relative to the scrollable editor container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub top: i32,
    pub left: i32,
}

impl Offset {
    pub fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }

    /// Shift by the given deltas.
    pub fn translate(self, dy: i32, dx: i32) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
        }
    }
}

/// A top-level element in the engine's rendered tree.
pub trait BlockNode: Clone {
    /// Element name as reported by the host (`"H1"` in the DOM, `"h1"` in HTML).
    fn tag_name(&self) -> SmolStr;

    /// Current layout offset.
    fn offset(&self) -> Offset;

    /// Serialized inner content.
    fn inner_html(&self) -> String;

    /// Whether the element is still part of the live tree.
    fn is_attached(&self) -> bool;

    /// Identity comparison: both handles point at the same element.
    fn same_node(&self, other: &Self) -> bool;
}
