//! Error types for the editor pipeline.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised by the shared editor store.
///
/// Both variants indicate a caller defect. They are fatal to the dispatch
/// call that produced them and leave the store state untouched.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Action tag outside the closed action set.
    #[error("unknown store action `{0}`")]
    #[diagnostic(
        code(scribe::store::unknown_action),
        help("valid actions are SET_VIEW, SET_WORD_COUNT and SET_CHAR_COUNT")
    )]
    UnknownAction(SmolStr),

    /// Known action tag carrying a payload of the wrong shape.
    #[error("invalid payload for `{action}`: {reason}")]
    #[diagnostic(code(scribe::store::invalid_payload))]
    InvalidPayload { action: SmolStr, reason: SmolStr },
}

/// Errors from scanning HTML block fragments.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum HtmlError {
    #[error("text outside of a block element at byte {offset}")]
    #[diagnostic(
        code(scribe::html::stray_text),
        help("initial content must be a sequence of block elements")
    )]
    StrayText { offset: usize },

    #[error("malformed tag at byte {offset}")]
    #[diagnostic(code(scribe::html::malformed_tag))]
    MalformedTag { offset: usize },

    #[error("`<{name}>` opened at byte {offset} is never closed")]
    #[diagnostic(code(scribe::html::unclosed))]
    Unclosed { name: SmolStr, offset: usize },

    #[error("expected `</{expected}>` but found `</{found}>` at byte {offset}")]
    #[diagnostic(code(scribe::html::mismatched))]
    Mismatched {
        expected: SmolStr,
        found: SmolStr,
        offset: usize,
    },
}

/// Errors reported by an editing engine.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The schema has no mark with this name.
    #[error("engine schema has no `{0}` mark")]
    #[diagnostic(code(scribe::engine::missing_mark))]
    MissingMark(SmolStr),

    /// An extension with this name is already registered.
    #[error("extension `{0}` is already registered")]
    #[diagnostic(code(scribe::engine::duplicate_extension))]
    DuplicateExtension(SmolStr),

    /// Content could not be parsed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Html(#[from] HtmlError),

    /// The engine refused a command.
    #[error("engine rejected command: {0}")]
    #[diagnostic(code(scribe::engine::rejected))]
    Rejected(String),
}

/// Errors surfaced by an editor session.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}
