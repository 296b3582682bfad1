//! Adapter from a host-side editing engine to [`EditorEngine`].
//!
//! The host (typically a JavaScript rich-text editor) exposes a small handle
//! object; the rendered document is read straight from the DOM under
//! `handle.root`.

use scribe_editor_core::{
    BlockNode, BlockShape, BlockTag, BlockTagChange, ChangeListener, EditorEngine, EngineError,
    Extension, MarkType,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom::{DomNode, block_children};

#[wasm_bindgen(typescript_custom_section)]
const ENGINE_HANDLE_TS: &str = r#"
export interface ScribeEngineHandle {
    readonly root: HTMLElement;
    wordCount(): number;
    characterCount(): number;
    onChange(callback: () => void): void;
    hasMark(name: string): boolean;
    registerExtension(descriptor: { name: string; markType: { name: string } }): void;
    setBlockType(index: number, tagName: string): boolean;
    undo(): boolean;
    redo(): boolean;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// Host engine handle.
    #[wasm_bindgen(typescript_type = "ScribeEngineHandle")]
    #[derive(Clone)]
    pub type EngineHandle;

    /// Rendered document root.
    #[wasm_bindgen(method, getter)]
    pub fn root(this: &EngineHandle) -> HtmlElement;

    #[wasm_bindgen(method, js_name = wordCount)]
    pub fn word_count(this: &EngineHandle) -> u32;

    #[wasm_bindgen(method, js_name = characterCount)]
    pub fn character_count(this: &EngineHandle) -> u32;

    #[wasm_bindgen(method, js_name = onChange)]
    pub fn on_change(this: &EngineHandle, callback: &Closure<dyn FnMut()>);

    #[wasm_bindgen(method, js_name = hasMark)]
    pub fn has_mark(this: &EngineHandle, name: &str) -> bool;

    #[wasm_bindgen(method, catch, js_name = registerExtension)]
    pub fn register_extension(this: &EngineHandle, descriptor: JsValue) -> Result<(), JsValue>;

    /// Retag the root child at `index` inside one engine transaction.
    #[wasm_bindgen(method, catch, js_name = setBlockType)]
    pub fn set_block_type(this: &EngineHandle, index: u32, tag_name: &str)
    -> Result<bool, JsValue>;

    #[wasm_bindgen(method)]
    pub fn undo(this: &EngineHandle) -> bool;

    #[wasm_bindgen(method)]
    pub fn redo(this: &EngineHandle) -> bool;
}

/// [`EditorEngine`] over a host engine handle.
pub struct DomEngine {
    handle: EngineHandle,
    extensions: Vec<Box<dyn Extension>>,
    // Kept alive for as long as the host may call them.
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl DomEngine {
    pub fn new(handle: EngineHandle) -> Self {
        Self {
            handle,
            extensions: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }

    pub fn root(&self) -> HtmlElement {
        self.handle.root()
    }

    pub fn extension(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }

    fn index_of(&self, node: &DomNode) -> Option<usize> {
        block_children(&self.root())
            .iter()
            .position(|child| child.same_node(node))
    }
}

impl EditorEngine for DomEngine {
    type Node = DomNode;

    fn child_nodes(&self) -> Vec<DomNode> {
        block_children(&self.root())
    }

    fn word_count(&self) -> usize {
        self.handle.word_count() as usize
    }

    fn character_count(&self) -> usize {
        self.handle.character_count() as usize
    }

    fn on_change(&mut self, listener: ChangeListener) {
        let closure = Closure::wrap(listener);
        self.handle.on_change(&closure);
        self.listeners.push(closure);
    }

    fn mark_type(&self, name: &str) -> Option<MarkType> {
        self.handle.has_mark(name).then(|| MarkType::new(name))
    }

    fn register_extension(&mut self, extension: Box<dyn Extension>) -> Result<(), EngineError> {
        if self.extension(extension.name()).is_some() {
            return Err(EngineError::DuplicateExtension(extension.name().into()));
        }
        let descriptor = serde_wasm_bindgen::to_value(&extension.descriptor())
            .map_err(|e| EngineError::Rejected(e.to_string()))?;
        self.handle
            .register_extension(descriptor)
            .map_err(|e| EngineError::Rejected(js_error_message(&e)))?;
        tracing::debug!(name = extension.name(), "registered extension with host engine");
        self.extensions.push(extension);
        Ok(())
    }

    fn set_block_tag(
        &mut self,
        node: &DomNode,
        tag: &BlockTag,
    ) -> Result<Option<BlockTagChange>, EngineError> {
        if !node.is_attached() {
            return Ok(None);
        }
        let Some(index) = self.index_of(node) else {
            tracing::warn!(tag = %node.tag_name(), "block is not a child of the engine root");
            return Ok(None);
        };
        if BlockTag::classify(&node.tag_name()) == *tag {
            return Ok(None);
        }

        let from = BlockShape::new(node.tag_name().to_ascii_lowercase(), node.attributes());
        let to = BlockShape::bare(tag);
        let js_index = u32::try_from(index)
            .map_err(|_| EngineError::Rejected(format!("block index {index} out of range")))?;

        let applied = self
            .handle
            .set_block_type(js_index, &to.tag_name)
            .map_err(|e| EngineError::Rejected(js_error_message(&e)))?;
        if !applied {
            return Err(EngineError::Rejected(format!(
                "engine refused to retag block {index} as {}",
                to.tag_name
            )));
        }

        Ok(Some(BlockTagChange { index, from, to }))
    }

    fn undo(&mut self) -> bool {
        self.handle.undo()
    }

    fn redo(&mut self) -> bool {
        self.handle.redo()
    }
}

/// Best-effort message from a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{value:?}"),
    }
}
