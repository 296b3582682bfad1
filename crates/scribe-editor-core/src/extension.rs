//! Engine extensions.
//!
//! Extensions register with an engine under a stable name. The only one
//! shipped here, [`CodemarkExtension`], changes how inline code spans are
//! entered and left while typing: the backtick delimiter and the arrow keys
//! at a span boundary toggle the mark instead of inserting characters or
//! moving the caret.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::engine::EditorEngine;
use crate::error::EngineError;

/// A mark type handed out by the engine's schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkType {
    pub name: SmolStr,
}

impl MarkType {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }
}

/// Serializable description passed to engines that host the plugin
/// themselves (e.g. a JavaScript editor).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    pub name: SmolStr,
    pub mark_type: MarkType,
}

/// Keys an extension may intercept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKey {
    Text(SmolStr),
    ArrowLeft,
    ArrowRight,
}

/// Where the caret sits relative to the nearest span of a mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarkCursor {
    /// Typing now would produce marked text.
    pub inside: bool,
    /// Caret is at the start boundary of a marked span.
    pub at_start: bool,
    /// Caret is at the end boundary of a marked span.
    pub at_end: bool,
}

/// Outcome of an intercepted key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkTransition {
    /// Start producing marked text; nothing is inserted.
    Enter(MarkType),
    /// Stop producing marked text; nothing is inserted.
    Exit(MarkType),
}

/// An engine plugin keyed by a stable name.
pub trait Extension {
    fn name(&self) -> &str;

    fn descriptor(&self) -> ExtensionDescriptor;

    /// Intercept a key. `None` leaves it to default engine handling.
    fn handle_key(&self, key: &InputKey, cursor: MarkCursor) -> Option<MarkTransition>;
}

/// Inline-code entry/exit behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodemarkExtension {
    mark_type: MarkType,
}

impl CodemarkExtension {
    pub const NAME: &'static str = "CodemarkExtension";
    pub const DELIMITER: &'static str = "`";

    pub fn new(mark_type: MarkType) -> Self {
        Self { mark_type }
    }

    /// Build from the engine schema's `code` mark.
    pub fn for_engine<E: EditorEngine + ?Sized>(engine: &E) -> Result<Self, EngineError> {
        engine
            .mark_type("code")
            .map(Self::new)
            .ok_or_else(|| EngineError::MissingMark(SmolStr::new_static("code")))
    }

    pub fn mark_type(&self) -> &MarkType {
        &self.mark_type
    }
}

impl Extension for CodemarkExtension {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn descriptor(&self) -> ExtensionDescriptor {
        ExtensionDescriptor {
            name: SmolStr::new_static(Self::NAME),
            mark_type: self.mark_type.clone(),
        }
    }

    fn handle_key(&self, key: &InputKey, cursor: MarkCursor) -> Option<MarkTransition> {
        let enter = || Some(MarkTransition::Enter(self.mark_type.clone()));
        let exit = || Some(MarkTransition::Exit(self.mark_type.clone()));

        match key {
            InputKey::Text(text) if text == Self::DELIMITER => {
                if !cursor.inside {
                    enter()
                } else if cursor.at_end {
                    exit()
                } else {
                    // Literal backtick inside a span.
                    None
                }
            }
            InputKey::ArrowRight if cursor.inside && cursor.at_end => exit(),
            InputKey::ArrowRight if !cursor.inside && cursor.at_start => enter(),
            InputKey::ArrowLeft if cursor.inside && cursor.at_start => exit(),
            InputKey::ArrowLeft if !cursor.inside && cursor.at_end => enter(),
            _ => None,
        }
    }
}
