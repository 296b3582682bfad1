//! Browser DOM layer for the scribe editor.
//!
//! This crate adapts a host-side rich-text engine and its rendered DOM tree
//! to the `EditorEngine` contract of `scribe-editor-core`, and draws heading
//! controls into an overlay container. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `DomNode`, a `BlockNode` over a live `HtmlElement`
//! - `engine`: `EngineHandle` import and the `DomEngine` adapter
//! - `render`: overlay control rendering
//! - `task`: deferring work out of event handlers
//!
//! # Re-exports
//!
//! This crate re-exports `scribe-editor-core` for convenience, so consumers
//! only need to depend on `scribe-editor-browser`.

// Re-export core crate
pub use scribe_editor_core;
pub use scribe_editor_core::*;

pub mod dom;
pub mod engine;
pub mod render;
pub mod task;

pub use dom::{DomNode, block_children};
pub use engine::{DomEngine, EngineHandle};
pub use render::{OverlayRenderer, SelectCallback};
pub use task::defer;
