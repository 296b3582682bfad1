//! JsHeadingEditor - the editor wrapper for JavaScript.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use scribe_editor_browser::{DomEngine, EngineHandle, OverlayRenderer, SelectCallback, defer};
use scribe_editor_core::{
    ControlView, EditorConfig, EditorEngine, EditorSession, EditorStore, EditorViewState,
    HeadingLevel, StoreAction, Subscription, ViewMode,
};

use crate::types::{dom_error, parse_action, parse_config, to_js};

struct Mounted {
    session: EditorSession<DomEngine>,
    renderer: OverlayRenderer,
}

type MountSlot = Rc<RefCell<Option<Mounted>>>;

/// Editor instance exposed to JavaScript.
///
/// Owns one session. The store lives outside the session borrow so state
/// reads and subscriptions keep working while the pipeline is running.
/// Every method takes `&self`: subscribers are called synchronously and may
/// call back into the editor.
#[wasm_bindgen]
pub struct JsHeadingEditor {
    config: EditorConfig,
    store: EditorStore,
    mounted: MountSlot,
    // A deferred re-render is queued.
    scheduled: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl JsHeadingEditor {
    /// Create an editor. `config` is an optional plain object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsHeadingEditor, JsError> {
        let config = parse_config(config)?;
        let store = EditorStore::new(EditorViewState::with_view(config.initial_view.clone()));
        Ok(Self {
            config,
            store,
            mounted: Rc::new(RefCell::new(None)),
            scheduled: Rc::new(Cell::new(false)),
        })
    }

    // === Mounting ===

    /// Attach the host engine and the overlay container.
    ///
    /// Registers the codemark extension with the engine, runs the initial
    /// tracking pass and renders controls. Each later engine change updates
    /// nodes and counts before the host's change callback returns; the
    /// controls are redrawn on the microtask queue.
    #[wasm_bindgen]
    pub fn mount(&self, engine: EngineHandle, overlay_root: HtmlElement) -> Result<(), JsError> {
        if self.is_mounted() {
            return Err(JsError::new("Editor is already mounted"));
        }

        let mut session = EditorSession::with_store(&self.config, self.store.clone());
        session
            .attach(DomEngine::new(engine))
            .map_err(|e| JsError::new(&e.to_string()))?;
        if let Some(mut engine) = session.engine_mut() {
            let weak = Rc::downgrade(&self.mounted);
            let scheduled = self.scheduled.clone();
            engine.on_change(Box::new(move || on_engine_change(&weak, &scheduled)));
        }
        let renderer = OverlayRenderer::new(overlay_root).map_err(dom_error)?;

        *self.slot()? = Some(Mounted { session, renderer });
        self.render()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.try_borrow().map(|m| m.is_some()).unwrap_or(true)
    }

    /// Detach from the engine and remove all controls.
    ///
    /// Change callbacks handed to the engine are released; destroy the host
    /// engine afterwards.
    #[wasm_bindgen]
    pub fn unmount(&self) -> Result<(), JsError> {
        if let Some(mut mounted) = self.slot()?.take() {
            mounted.renderer.clear();
            mounted.session.detach();
        }
        Ok(())
    }

    /// Re-derive nodes, counts and controls after an engine change.
    ///
    /// Safe to call from inside an engine change callback: if the editor is
    /// busy the refresh is queued instead.
    #[wasm_bindgen(js_name = handleChange)]
    pub fn handle_change(&self) -> Result<(), JsError> {
        let Ok(mut slot) = self.mounted.try_borrow_mut() else {
            schedule_refresh(&Rc::downgrade(&self.mounted), &self.scheduled);
            return Ok(());
        };
        if let Some(mounted) = slot.as_mut() {
            mounted.session.handle_change();
        }
        drop(slot);
        self.render()
    }

    // === Store ===

    /// Current `{ view, wordCount, charCount }`.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.store.state())
    }

    /// Dispatch a `{ type, payload }` action. Unknown types throw.
    #[wasm_bindgen]
    pub fn dispatch(&self, action: JsValue) -> Result<JsValue, JsError> {
        let raw = parse_action(action)?;
        let state = self
            .store
            .dispatch_raw(raw)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&state)
    }

    #[wasm_bindgen(js_name = setView)]
    pub fn set_view(&self, view: &str) -> Result<JsValue, JsError> {
        to_js(&self.store.dispatch(StoreAction::SetView(ViewMode::from(view))))
    }

    /// Call `callback(state)` after every successful dispatch. Returns an id
    /// for `unsubscribe`.
    #[wasm_bindgen]
    pub fn subscribe(&self, callback: js_sys::Function) -> f64 {
        let subscription = self.store.subscribe(move |state: &EditorViewState| {
            match serde_wasm_bindgen::to_value(state) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        tracing::error!(error = ?err, "store subscriber threw");
                    }
                }
                Err(err) => tracing::error!(%err, "could not serialize editor state"),
            }
        });
        subscription.id() as f64
    }

    #[wasm_bindgen]
    pub fn unsubscribe(&self, id: f64) -> bool {
        self.store.unsubscribe(Subscription::from_id(id as u64))
    }

    // === Headings ===

    /// Rendered heading controls, node-free.
    #[wasm_bindgen]
    pub fn controls(&self) -> Result<JsValue, JsError> {
        to_js(&self.control_views()?)
    }

    /// Change the root child at `index` to heading `level` (1-6).
    ///
    /// Returns false when nothing changed.
    #[wasm_bindgen(js_name = setHeadingLevel)]
    pub fn set_heading_level(&self, index: u32, level: u8) -> Result<bool, JsError> {
        let level = HeadingLevel::from_number(level)
            .ok_or_else(|| JsError::new(&format!("Invalid heading level: {}", level)))?;

        let changed = {
            let mut slot = self.slot()?;
            let mounted = slot.as_mut().ok_or_else(|| JsError::new("Editor is not mounted"))?;
            let node = mounted
                .session
                .nodes()
                .iter()
                .find(|tracked| tracked.index as u32 == index)
                .map(|tracked| tracked.node.clone())
                .ok_or_else(|| JsError::new(&format!("No block at index {}", index)))?;
            mounted
                .session
                .set_heading_level(&node, level)
                .map_err(|e| JsError::new(&e.to_string()))?
                .is_some()
        };

        self.render()?;
        Ok(changed)
    }

    #[wasm_bindgen]
    pub fn undo(&self) -> Result<bool, JsError> {
        let undone = self.with_session(|session| session.undo())?;
        self.render()?;
        Ok(undone)
    }

    #[wasm_bindgen]
    pub fn redo(&self) -> Result<bool, JsError> {
        let redone = self.with_session(|session| session.redo())?;
        self.render()?;
        Ok(redone)
    }
}

// Internal methods (not exposed to JS)
impl JsHeadingEditor {
    fn slot(&self) -> Result<std::cell::RefMut<'_, Option<Mounted>>, JsError> {
        self.mounted
            .try_borrow_mut()
            .map_err(|_| JsError::new("Editor is busy"))
    }

    fn with_session<R>(
        &self,
        f: impl FnOnce(&mut EditorSession<DomEngine>) -> R,
    ) -> Result<R, JsError> {
        let mut slot = self.slot()?;
        let mounted = slot.as_mut().ok_or_else(|| JsError::new("Editor is not mounted"))?;
        Ok(f(&mut mounted.session))
    }

    fn control_views(&self) -> Result<Vec<ControlView>, JsError> {
        let slot = self
            .mounted
            .try_borrow()
            .map_err(|_| JsError::new("Editor is busy"))?;
        Ok(slot
            .as_ref()
            .map(|m| m.session.controls().iter().map(|c| c.view()).collect())
            .unwrap_or_default())
    }

    fn render(&self) -> Result<(), JsError> {
        render(&Rc::downgrade(&self.mounted), &self.scheduled).map_err(dom_error)
    }
}

/// Flush the session and redraw controls.
fn render(weak: &Weak<RefCell<Option<Mounted>>>, scheduled: &Rc<Cell<bool>>) -> Result<(), JsValue> {
    let Some(cell) = weak.upgrade() else {
        return Ok(());
    };
    let Ok(mut slot) = cell.try_borrow_mut() else {
        schedule_refresh(weak, scheduled);
        return Ok(());
    };
    let Some(mounted) = slot.as_mut() else {
        return Ok(());
    };

    mounted.session.flush();
    let views: Vec<ControlView> = mounted.session.controls().iter().map(|c| c.view()).collect();
    let on_select = select_callback(weak.clone(), scheduled.clone());
    mounted.renderer.render(&views, &on_select)
}

/// Engine change callback: run the tracker pass now, redraw later.
///
/// When the editor is busy the change came from one of its own edits, which
/// processes it before returning.
fn on_engine_change(weak: &Weak<RefCell<Option<Mounted>>>, scheduled: &Rc<Cell<bool>>) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    if let Ok(mut slot) = cell.try_borrow_mut() {
        if let Some(mounted) = slot.as_mut() {
            mounted.session.handle_change();
        }
    }
    // May be running inside a control's click listener.
    schedule_refresh(weak, scheduled);
}

/// Queue one deferred render; repeated calls before it runs coalesce.
fn schedule_refresh(weak: &Weak<RefCell<Option<Mounted>>>, scheduled: &Rc<Cell<bool>>) {
    if scheduled.replace(true) {
        return;
    }
    let weak = weak.clone();
    let scheduled = scheduled.clone();
    defer(move || {
        scheduled.set(false);
        if let Err(err) = render(&weak, &scheduled) {
            tracing::error!(error = ?err, "overlay render failed");
        }
    });
}

fn select_callback(weak: Weak<RefCell<Option<Mounted>>>, scheduled: Rc<Cell<bool>>) -> SelectCallback {
    Rc::new(move |position, level| {
        let Some(cell) = weak.upgrade() else {
            return;
        };
        {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                tracing::warn!("heading selection while editor is busy, ignored");
                return;
            };
            let Some(mounted) = slot.as_mut() else {
                return;
            };
            if let Err(err) = mounted.session.select(position, level) {
                tracing::error!(%err, "heading change failed");
            }
        }
        // This runs inside a control's click listener; redraw afterwards.
        schedule_refresh(&weak, &scheduled);
    })
}
