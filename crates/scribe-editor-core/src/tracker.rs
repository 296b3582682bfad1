//! Block node tracking.
//!
//! Derives the ordered list of top-level blocks from the engine and pushes
//! fresh text statistics into the store in the same pass, so the node list
//! and the counts always describe the same document state.

use web_time::Instant;

use crate::engine::EditorEngine;
use crate::node::{BlockNode, Offset};
use crate::store::{EditorStore, StoreAction};
use crate::tag::BlockTag;

/// A mounted top-level block, as seen by the last tracker pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedBlockNode<N> {
    pub node: N,
    pub tag: BlockTag,
    pub offset: Offset,
    /// Position among the root's children.
    pub index: usize,
}

impl<N: BlockNode> TrackedBlockNode<N> {
    pub fn from_node(index: usize, node: N) -> Self {
        Self {
            tag: BlockTag::classify(&node.tag_name()),
            offset: node.offset(),
            node,
            index,
        }
    }
}

/// Re-derives the tracked block list on every change.
#[derive(Debug, Default)]
pub struct BlockNodeTracker {
    passes: u64,
    last_pass: Option<Instant>,
}

impl BlockNodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one pass.
    ///
    /// Without an engine this does nothing and returns an empty list.
    pub fn track<E: EditorEngine>(
        &mut self,
        engine: Option<&E>,
        store: &EditorStore,
    ) -> Vec<TrackedBlockNode<E::Node>> {
        let Some(engine) = engine else {
            return Vec::new();
        };
        let started = Instant::now();

        let nodes: Vec<_> = engine
            .child_nodes()
            .into_iter()
            .enumerate()
            .map(|(index, node)| {
                let tracked = TrackedBlockNode::from_node(index, node);
                tracing::trace!(index, tag = ?tracked.tag, top = tracked.offset.top, "tracked block");
                tracked
            })
            .collect();

        store.dispatch(StoreAction::SetWordCount(engine.word_count()));
        store.dispatch(StoreAction::SetCharCount(engine.character_count()));

        self.passes += 1;
        self.last_pass = Some(started);

        let headings = nodes.iter().filter(|n| n.tag.is_heading()).count();
        tracing::debug!(
            pass = self.passes,
            nodes = nodes.len(),
            headings,
            elapsed_us = started.elapsed().as_micros() as u64,
            "block node pass"
        );

        nodes
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Start time of the most recent pass.
    pub fn last_pass(&self) -> Option<Instant> {
        self.last_pass
    }
}
