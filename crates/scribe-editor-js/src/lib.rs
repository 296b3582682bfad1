//! WASM bindings for the scribe heading-overlay editor.
//!
//! Provides `JsHeadingEditor`, which owns one editor session for a host
//! rich-text engine. The host constructs the editor, mounts it with its
//! engine handle and an overlay container, and reads view/metric state
//! through the shared store.

mod editor;
mod types;

pub use editor::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A host may load the module twice; the first subscriber wins.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
