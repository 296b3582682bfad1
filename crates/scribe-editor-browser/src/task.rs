//! Deferred work.

/// Run `task` on the microtask queue, after the current event handler
/// returns.
pub fn defer(task: impl FnOnce() + 'static) {
    wasm_bindgen_futures::spawn_local(async move { task() });
}
