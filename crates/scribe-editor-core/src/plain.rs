//! In-memory editing engine.
//!
//! `PlainEngine` keeps the document as a flat list of top-level block
//! elements with HTML content. It implements the full [`EditorEngine`]
//! contract, so the pipeline can run natively (tests, headless hosts)
//! exactly as it runs against a browser engine.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::config::{EditorConfig, LayoutMetrics};
use crate::engine::{BlockShape, BlockTagChange, ChangeListener, EditorEngine};
use crate::error::EngineError;
use crate::extension::{Extension, InputKey, MarkCursor, MarkTransition, MarkType};
use crate::history::BlockHistory;
use crate::html::{self, HtmlBlock, TextStats};
use crate::node::{BlockNode, Offset};
use crate::tag::BlockTag;

/// Marks in the default schema.
const DEFAULT_MARKS: &[&str] = &["bold", "italic", "strike", "code", "highlight"];

struct ElementData {
    id: u64,
    tag_name: SmolStr,
    attributes: String,
    inner_html: RefCell<String>,
    attached: Cell<bool>,
    offset: Cell<Offset>,
}

/// Handle to an element of a [`PlainEngine`] document.
///
/// Clones share the element; equality is identity.
#[derive(Clone)]
pub struct PlainNode(Rc<ElementData>);

impl PlainNode {
    fn new(id: u64, shape: BlockShape, inner_html: String) -> Self {
        Self(Rc::new(ElementData {
            id,
            tag_name: shape.tag_name,
            attributes: shape.attributes,
            inner_html: RefCell::new(inner_html),
            attached: Cell::new(true),
            offset: Cell::new(Offset::default()),
        }))
    }

    /// Engine-unique element id. Never reused.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn attributes(&self) -> &str {
        &self.0.attributes
    }

    pub fn tag(&self) -> BlockTag {
        BlockTag::classify(&self.0.tag_name)
    }

    pub fn outer_html(&self) -> String {
        html::outer_html(
            &self.0.tag_name,
            &self.0.attributes,
            &self.0.inner_html.borrow(),
        )
    }

    fn shape(&self) -> BlockShape {
        BlockShape::new(self.0.tag_name.clone(), self.0.attributes.clone())
    }

    fn text_chars(&self) -> usize {
        html::block_text_segments(&self.0.tag_name, &self.0.inner_html.borrow())
            .iter()
            .map(|s| s.chars().count())
            .sum()
    }
}

impl PartialEq for PlainNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PlainNode {}

impl fmt::Debug for PlainNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainNode")
            .field("id", &self.0.id)
            .field("tag", &self.0.tag_name)
            .field("attached", &self.0.attached.get())
            .finish()
    }
}

impl BlockNode for PlainNode {
    fn tag_name(&self) -> SmolStr {
        self.0.tag_name.clone()
    }

    fn offset(&self) -> Offset {
        self.0.offset.get()
    }

    fn inner_html(&self) -> String {
        self.0.inner_html.borrow().clone()
    }

    fn is_attached(&self) -> bool {
        self.0.attached.get()
    }

    fn same_node(&self, other: &Self) -> bool {
        self == other
    }
}

/// In-memory [`EditorEngine`].
pub struct PlainEngine {
    children: Vec<PlainNode>,
    listeners: Vec<ChangeListener>,
    extensions: Vec<Box<dyn Extension>>,
    marks: Vec<MarkType>,
    history: BlockHistory,
    layout: LayoutMetrics,
    stats: TextStats,
    next_id: u64,
    notify_structural_edits: bool,
}

impl Default for PlainEngine {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl fmt::Debug for PlainEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainEngine")
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl PlainEngine {
    /// Empty document.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            children: Vec::new(),
            listeners: Vec::new(),
            extensions: Vec::new(),
            marks: DEFAULT_MARKS.iter().map(|m| MarkType::new(*m)).collect(),
            history: BlockHistory::new(config.history_depth),
            layout: config.layout.clone(),
            stats: TextStats::default(),
            next_id: 0,
            notify_structural_edits: true,
        }
    }

    /// Document initialized from concatenated block fragments.
    pub fn from_html(html: &str, config: &EditorConfig) -> Result<Self, EngineError> {
        let mut engine = Self::new(config);
        let blocks = html::parse_blocks(html)?;
        engine.children = blocks.into_iter().map(|b| engine.create(b)).collect();
        engine.refresh();
        Ok(engine)
    }

    /// Document initialized from an ordered list of block fragments.
    pub fn from_fragments<S: AsRef<str>>(
        fragments: &[S],
        config: &EditorConfig,
    ) -> Result<Self, EngineError> {
        let html: String = fragments.iter().map(AsRef::as_ref).collect();
        Self::from_html(&html, config)
    }

    /// Replace the schema's mark list.
    pub fn with_marks<I, S>(mut self, marks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.marks = marks.into_iter().map(MarkType::new).collect();
        self
    }

    /// Whether retag/undo/redo steps notify change listeners.
    ///
    /// Defaults to true. Turning it off models an engine that does not
    /// observe structural edits: trackers stay stale until the next
    /// content edit.
    pub fn set_notify_structural_edits(&mut self, notify: bool) {
        self.notify_structural_edits = notify;
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.children.iter().map(PlainNode::outer_html).collect()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Names of registered extensions, in registration order.
    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Offer a key to registered extensions. First taker wins.
    pub fn handle_key(&self, key: &InputKey, cursor: MarkCursor) -> Option<MarkTransition> {
        self.extensions
            .iter()
            .find_map(|ext| ext.handle_key(key, cursor))
    }

    // === Content edits (always notify) ===

    /// Replace the whole document. Clears undo history.
    pub fn set_content(&mut self, html: &str) -> Result<(), EngineError> {
        let blocks = html::parse_blocks(html)?;
        for old in self.children.drain(..) {
            old.0.attached.set(false);
        }
        self.children = blocks.into_iter().map(|b| self.create(b)).collect();
        self.history.clear();
        self.commit(true);
        Ok(())
    }

    /// Insert block fragments before `index` (clamped to the end).
    pub fn insert_html(&mut self, index: usize, html: &str) -> Result<Vec<PlainNode>, EngineError> {
        let blocks = html::parse_blocks(html)?;
        let nodes: Vec<PlainNode> = blocks.into_iter().map(|b| self.create(b)).collect();
        let at = index.min(self.children.len());
        self.children.splice(at..at, nodes.iter().cloned());
        // Sibling indices shifted under recorded steps.
        self.history.clear();
        self.commit(true);
        Ok(nodes)
    }

    /// Replace a block's content in place, like typing into it.
    ///
    /// Returns false for detached nodes.
    pub fn set_inner_html(&mut self, node: &PlainNode, inner_html: &str) -> Result<bool, EngineError> {
        html::validate_inner_html(inner_html)?;
        if !node.is_attached() || self.index_of(node).is_none() {
            return Ok(false);
        }
        *node.0.inner_html.borrow_mut() = inner_html.to_string();
        self.commit(true);
        Ok(true)
    }

    /// Remove a block. Returns false for detached nodes.
    pub fn remove_block(&mut self, node: &PlainNode) -> bool {
        let Some(index) = self.index_of(node) else {
            return false;
        };
        let removed = self.children.remove(index);
        removed.0.attached.set(false);
        self.history.clear();
        self.commit(true);
        true
    }

    // === Internals ===

    fn create(&mut self, block: HtmlBlock) -> PlainNode {
        let id = self.next_id;
        self.next_id += 1;
        PlainNode::new(
            id,
            BlockShape::new(block.tag_name, block.attributes),
            block.inner_html,
        )
    }

    fn index_of(&self, node: &PlainNode) -> Option<usize> {
        if !node.is_attached() {
            return None;
        }
        self.children.iter().position(|child| child == node)
    }

    /// Apply a retag step. The element at `step.index` is swapped for a new
    /// one with the target shape and the same content.
    fn apply_step(&mut self, step: &BlockTagChange) -> bool {
        let Some(old) = self.children.get(step.index).cloned() else {
            tracing::warn!(index = step.index, "block step points past the document end");
            return false;
        };
        if !old.0.tag_name.eq_ignore_ascii_case(&step.from.tag_name) {
            tracing::warn!(
                index = step.index,
                expected = %step.from.tag_name,
                found = %old.0.tag_name,
                "block step does not match document"
            );
            return false;
        }

        let content = old.0.inner_html.borrow().clone();
        let id = self.next_id;
        self.next_id += 1;
        let replacement = PlainNode::new(id, step.to.clone(), content);

        old.0.attached.set(false);
        self.children[step.index] = replacement;

        tracing::debug!(
            index = step.index,
            from = %step.from.tag_name,
            to = %step.to.tag_name,
            "applied block tag step"
        );

        self.commit(self.notify_structural_edits);
        true
    }

    fn refresh(&mut self) {
        let mut top = self.layout.content_top;
        for child in &self.children {
            child.0.offset.set(Offset::new(top, self.layout.content_left));
            let height = self.layout.block_height(&child.tag(), child.text_chars());
            top = top.saturating_add(height).saturating_add(self.layout.block_gap);
        }

        let inner: Vec<(SmolStr, String)> = self
            .children
            .iter()
            .map(|c| (c.0.tag_name.clone(), c.0.inner_html.borrow().clone()))
            .collect();
        self.stats = html::text_stats(inner.iter().map(|(t, i)| (t.as_str(), i.as_str())));
    }

    fn commit(&mut self, notify: bool) {
        self.refresh();
        if notify {
            tracing::trace!(
                blocks = self.children.len(),
                listeners = self.listeners.len(),
                "engine change"
            );
            for listener in self.listeners.iter_mut() {
                listener();
            }
        }
    }
}

impl EditorEngine for PlainEngine {
    type Node = PlainNode;

    fn child_nodes(&self) -> Vec<PlainNode> {
        self.children.clone()
    }

    fn word_count(&self) -> usize {
        self.stats.words
    }

    fn character_count(&self) -> usize {
        self.stats.characters
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn mark_type(&self, name: &str) -> Option<MarkType> {
        self.marks.iter().find(|m| m.name == name).cloned()
    }

    fn register_extension(&mut self, extension: Box<dyn Extension>) -> Result<(), EngineError> {
        if self.extensions.iter().any(|e| e.name() == extension.name()) {
            return Err(EngineError::DuplicateExtension(SmolStr::new(
                extension.name(),
            )));
        }
        tracing::debug!(name = extension.name(), "registered extension");
        self.extensions.push(extension);
        Ok(())
    }

    fn set_block_tag(
        &mut self,
        node: &PlainNode,
        tag: &BlockTag,
    ) -> Result<Option<BlockTagChange>, EngineError> {
        let Some(index) = self.index_of(node) else {
            tracing::warn!(node = node.id(), "retag of a detached block ignored");
            return Ok(None);
        };
        if node.tag() == *tag {
            return Ok(None);
        }

        let step = BlockTagChange {
            index,
            from: node.shape(),
            to: BlockShape::bare(tag),
        };
        if !self.apply_step(&step) {
            return Err(EngineError::Rejected(format!(
                "could not retag block {index}"
            )));
        }
        self.history.record(step.clone());
        Ok(Some(step))
    }

    fn undo(&mut self) -> bool {
        match self.history.take_undo() {
            Some(step) => self.apply_step(&step),
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.history.take_redo() {
            Some(step) => self.apply_step(&step),
            None => false,
        }
    }
}
