//! Conversions between JS values and editor types.

use scribe_editor_browser::engine::js_error_message;
use scribe_editor_core::{EditorConfig, RawAction, SmolStr, StoreError};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const EDITOR_TS: &str = r#"
export type ViewMode = "write" | "output" | string;

export interface EditorViewState {
    view: ViewMode;
    wordCount: number;
    charCount: number;
}

export type EditorAction =
    | { type: "SET_VIEW"; payload: ViewMode }
    | { type: "SET_WORD_COUNT"; payload: number }
    | { type: "SET_CHAR_COUNT"; payload: number };

export interface EditorConfig {
    overlay?: { gutterWidth?: number; headingNudges?: number[] };
    layout?: Record<string, unknown>;
    historyDepth?: number;
    initialView?: ViewMode;
}
"#;

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Config from an optional plain object.
pub(crate) fn parse_config(value: JsValue) -> Result<EditorConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(EditorConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

/// `{ type, payload }` action object.
///
/// A missing or non-string `type` is an unknown action, like any other
/// unrecognised tag.
pub(crate) fn parse_action(value: JsValue) -> Result<RawAction, JsError> {
    let has_kind = js_sys::Reflect::get(&value, &JsValue::from_str("type"))
        .is_ok_and(|kind| kind.is_string());
    if !has_kind {
        let err = StoreError::UnknownAction(SmolStr::default());
        tracing::error!(%err, "rejected store action");
        return Err(JsError::new(&err.to_string()));
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&format!("Invalid action: {}", e)))
}

pub(crate) fn dom_error(value: JsValue) -> JsError {
    JsError::new(&js_error_message(&value))
}
