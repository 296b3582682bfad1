//! The editing engine contract.
//!
//! The rich-text engine itself is an external collaborator. This trait is
//! the slice of it the synchronization pipeline needs: the live block list,
//! text statistics, change notification, extension registration and a
//! transactional block-retagging command with undo support.

use smol_str::SmolStr;

use crate::error::EngineError;
use crate::extension::{Extension, MarkType};
use crate::node::BlockNode;
use crate::tag::BlockTag;

/// Callback fired after every document mutation, whatever its source.
///
/// Carries no payload: "something changed" is all listeners may rely on.
pub type ChangeListener = Box<dyn FnMut()>;

/// Tag and attributes of a block, everything a retag step changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockShape {
    pub tag_name: SmolStr,
    pub attributes: String,
}

impl BlockShape {
    pub fn new(tag_name: impl Into<SmolStr>, attributes: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: attributes.into(),
        }
    }

    /// A bare element of the given kind.
    pub fn bare(tag: &BlockTag) -> Self {
        Self::new(tag.tag_name(), "")
    }
}

/// A committed "change this block's type" step.
///
/// Content is never part of the step: the block's inner content is carried
/// over unchanged in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTagChange {
    /// Sibling index of the block in the document root.
    pub index: usize,
    pub from: BlockShape,
    pub to: BlockShape,
}

impl BlockTagChange {
    /// The step that undoes this one.
    pub fn invert(&self) -> Self {
        Self {
            index: self.index,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

/// Editing engine as seen by the pipeline.
pub trait EditorEngine {
    /// Handle to a top-level block element.
    type Node: BlockNode;

    /// Direct children of the rendered document root, in document order.
    fn child_nodes(&self) -> Vec<Self::Node>;

    fn word_count(&self) -> usize;

    fn character_count(&self) -> usize;

    /// Register a change listener.
    fn on_change(&mut self, listener: ChangeListener);

    /// Look up a mark type in the engine's schema.
    fn mark_type(&self, name: &str) -> Option<MarkType>;

    /// Register a plugin under its stable name.
    fn register_extension(&mut self, extension: Box<dyn Extension>) -> Result<(), EngineError>;

    /// Replace `node`'s tag, keeping its content, as one undoable step.
    ///
    /// Returns `Ok(None)` when nothing was done: the node is no longer
    /// attached, or it already has the requested tag. Cursor and selection
    /// are not preserved across the swap.
    fn set_block_tag(
        &mut self,
        node: &Self::Node,
        tag: &BlockTag,
    ) -> Result<Option<BlockTagChange>, EngineError>;

    /// Undo the last step. Returns true if anything was undone.
    fn undo(&mut self) -> bool;

    /// Redo the last undone step. Returns true if anything was redone.
    fn redo(&mut self) -> bool;
}
