//! scribe-editor-core: framework-free heading-overlay editor pipeline.
//!
//! This crate provides:
//! - `EditorStore` - shared view/metrics store with observer dispatch
//! - `EditorEngine` / `BlockNode` traits - the slice of a rich-text engine
//!   the pipeline needs
//! - `BlockNodeTracker`, `HeadingOverlay`, `mutator` - the change → track →
//!   overlay → mutate loop, owned by `EditorSession`
//! - `CodemarkExtension` - inline code entry/exit
//! - `PlainEngine` - in-memory engine over HTML block fragments

pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod extension;
pub mod history;
pub mod html;
pub mod mutator;
pub mod node;
pub mod overlay;
pub mod plain;
pub mod session;
pub mod store;
pub mod tag;
pub mod tracker;

pub use config::{EditorConfig, LayoutMetrics, OverlayConfig};
pub use content::{DEFAULT_CONTENT, default_content};
pub use engine::{BlockShape, BlockTagChange, ChangeListener, EditorEngine};
pub use error::{EngineError, HtmlError, SessionError, StoreError};
pub use extension::{
    CodemarkExtension, Extension, ExtensionDescriptor, InputKey, MarkCursor, MarkTransition,
    MarkType,
};
pub use history::BlockHistory;
pub use mutator::{change_heading, replace_block_tag};
pub use node::{BlockNode, Offset};
pub use overlay::{ControlView, HeadingCommand, HeadingControl, HeadingOverlay, LevelOption};
pub use plain::{PlainEngine, PlainNode};
pub use session::{EditorSession, EngineGuard};
pub use smol_str::SmolStr;
pub use store::{
    EditorStore, EditorViewState, RawAction, StoreAction, Subscription, ViewMode, reduce,
};
pub use tag::{BlockTag, HeadingLevel};
pub use tracker::{BlockNodeTracker, TrackedBlockNode};
