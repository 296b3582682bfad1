//! Shared editor store: view mode and live document metrics.
//!
//! One store exists per editing session. It is read by several independent
//! UI regions (view tabs, footer counters) and written only through
//! [`EditorStore::dispatch`] / [`EditorStore::dispatch_raw`]. Every
//! successful dispatch notifies all subscribers synchronously.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::StoreError;

/// Active editor view.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub enum ViewMode {
    #[default]
    Write,
    Output,
    /// Any other view name a host chooses to use.
    Custom(SmolStr),
}

impl ViewMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Write => "write",
            Self::Output => "output",
            Self::Custom(name) => name.as_str(),
        }
    }
}

impl From<&str> for ViewMode {
    fn from(s: &str) -> Self {
        match s {
            "write" => Self::Write,
            "output" => Self::Output,
            other => Self::Custom(SmolStr::new(other)),
        }
    }
}

impl From<SmolStr> for ViewMode {
    fn from(s: SmolStr) -> Self {
        ViewMode::from(s.as_str())
    }
}

impl From<ViewMode> for SmolStr {
    fn from(view: ViewMode) -> Self {
        match view {
            ViewMode::Write => SmolStr::new_static("write"),
            ViewMode::Output => SmolStr::new_static("output"),
            ViewMode::Custom(name) => name,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-wide editor state.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorViewState {
    pub view: ViewMode,
    pub word_count: usize,
    pub char_count: usize,
}

impl EditorViewState {
    /// Initial state with a specific view.
    pub fn with_view(view: ViewMode) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }
}

/// The closed set of store actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreAction {
    SetView(ViewMode),
    SetWordCount(usize),
    SetCharCount(usize),
}

impl StoreAction {
    pub const SET_VIEW: &'static str = "SET_VIEW";
    pub const SET_WORD_COUNT: &'static str = "SET_WORD_COUNT";
    pub const SET_CHAR_COUNT: &'static str = "SET_CHAR_COUNT";

    /// Wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetView(_) => Self::SET_VIEW,
            Self::SetWordCount(_) => Self::SET_WORD_COUNT,
            Self::SetCharCount(_) => Self::SET_CHAR_COUNT,
        }
    }
}

/// Untyped action as sent by external callers: `{ "type": ..., "payload": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: SmolStr,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RawAction {
    pub fn new(kind: impl Into<SmolStr>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl From<&StoreAction> for RawAction {
    fn from(action: &StoreAction) -> Self {
        let payload = match action {
            StoreAction::SetView(view) => serde_json::Value::from(view.as_str()),
            StoreAction::SetWordCount(n) | StoreAction::SetCharCount(n) => {
                serde_json::Value::from(*n)
            }
        };
        RawAction::new(action.kind(), payload)
    }
}

impl TryFrom<RawAction> for StoreAction {
    type Error = StoreError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            StoreAction::SET_VIEW => match raw.payload.as_str() {
                Some(view) => Ok(StoreAction::SetView(ViewMode::from(view))),
                None => Err(invalid_payload(&raw.kind, "expected a string")),
            },
            StoreAction::SET_WORD_COUNT => count_payload(&raw).map(StoreAction::SetWordCount),
            StoreAction::SET_CHAR_COUNT => count_payload(&raw).map(StoreAction::SetCharCount),
            _ => Err(StoreError::UnknownAction(raw.kind)),
        }
    }
}

fn count_payload(raw: &RawAction) -> Result<usize, StoreError> {
    if let Some(n) = raw.payload.as_u64() {
        return usize::try_from(n).map_err(|_| invalid_payload(&raw.kind, "count out of range"));
    }
    // JS numbers may arrive as floats.
    match raw.payload.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => Ok(f as usize),
        _ => Err(invalid_payload(
            &raw.kind,
            "expected a non-negative integer",
        )),
    }
}

fn invalid_payload(action: &SmolStr, reason: &'static str) -> StoreError {
    StoreError::InvalidPayload {
        action: action.clone(),
        reason: SmolStr::new_static(reason),
    }
}

/// Pure reducer over the closed action set.
pub fn reduce(state: &EditorViewState, action: &StoreAction) -> EditorViewState {
    match action {
        StoreAction::SetView(view) => EditorViewState {
            view: view.clone(),
            ..state.clone()
        },
        StoreAction::SetWordCount(n) => EditorViewState {
            word_count: *n,
            ..state.clone()
        },
        StoreAction::SetCharCount(n) => EditorViewState {
            char_count: *n,
            ..state.clone()
        },
    }
}

/// Handle returned by [`EditorStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

type Listener = Rc<dyn Fn(&EditorViewState)>;

struct StoreInner {
    state: RefCell<EditorViewState>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    next_id: Cell<u64>,
}

/// Cheaply cloneable handle to the session's store.
///
/// All clones share the same state. The store is single-threaded: no borrow
/// is held while subscribers run, so a subscriber may read the store or
/// dispatch again.
#[derive(Clone)]
pub struct EditorStore {
    inner: Rc<StoreInner>,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorViewState::default())
    }
}

impl fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl EditorStore {
    pub fn new(initial: EditorViewState) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> EditorViewState {
        self.inner.state.borrow().clone()
    }

    /// Run `f` on a snapshot of the current state. `f` may dispatch.
    pub fn with_state<R>(&self, f: impl FnOnce(&EditorViewState) -> R) -> R {
        let state = self.state();
        f(&state)
    }

    /// Apply an action and notify subscribers. Returns the new state.
    pub fn dispatch(&self, action: StoreAction) -> EditorViewState {
        let next = {
            let current = self.inner.state.borrow();
            reduce(&current, &action)
        };
        *self.inner.state.borrow_mut() = next.clone();

        tracing::debug!(
            action = action.kind(),
            view = %next.view,
            words = next.word_count,
            chars = next.char_count,
            "store dispatch"
        );

        self.notify();
        next
    }

    /// Validate an untyped action and dispatch it.
    ///
    /// Unknown or malformed actions fail without touching state or
    /// notifying anyone.
    pub fn dispatch_raw(&self, raw: RawAction) -> Result<EditorViewState, StoreError> {
        let action = StoreAction::try_from(raw).inspect_err(|err| {
            tracing::error!(%err, "rejected store action");
        })?;
        Ok(self.dispatch(action))
    }

    /// Register a listener called after every successful dispatch.
    pub fn subscribe(&self, listener: impl Fn(&EditorViewState) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let sub = Subscription(id);
        self.inner
            .listeners
            .borrow_mut()
            .push((sub, Rc::new(listener)));
        sub
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != subscription);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so listeners can (un)subscribe or dispatch re-entrantly.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            // An earlier listener may have dispatched again; never hand out
            // anything older than the committed state.
            let state = self.state();
            listener(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_word_count_leaves_other_fields() {
        let store = EditorStore::new(EditorViewState {
            view: ViewMode::Output,
            word_count: 3,
            char_count: 17,
        });

        let state = store.dispatch(StoreAction::SetWordCount(42));
        assert_eq!(state.word_count, 42);
        assert_eq!(state.view, ViewMode::Output);
        assert_eq!(state.char_count, 17);
        assert_eq!(store.state(), state);
    }

    #[test]
    fn test_set_view_leaves_counts() {
        let store = EditorStore::default();
        store.dispatch(StoreAction::SetCharCount(9));
        let state = store.dispatch(StoreAction::SetView("preview".into()));
        assert_eq!(state.view, ViewMode::Custom("preview".into()));
        assert_eq!(state.char_count, 9);
        assert_eq!(state.word_count, 0);
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = EditorViewState::default();
        let actions = [
            StoreAction::SetView(ViewMode::Output),
            StoreAction::SetWordCount(5),
            StoreAction::SetCharCount(11),
        ];
        for action in &actions {
            let a = reduce(&state, action);
            let b = reduce(&state, action);
            assert_eq!(a, b);
            // Input untouched.
            assert_eq!(state, EditorViewState::default());
        }
    }

    #[test]
    fn test_unknown_action_fails_and_keeps_state() {
        let store = EditorStore::default();
        store.dispatch(StoreAction::SetWordCount(7));
        let before = store.state();

        let err = store
            .dispatch_raw(RawAction::new("SET_TITLE", json!("hello")))
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownAction("SET_TITLE".into()));

        // Same error kind every time.
        let again = store
            .dispatch_raw(RawAction::new("", serde_json::Value::Null))
            .unwrap_err();
        assert!(matches!(again, StoreError::UnknownAction(_)));

        assert_eq!(store.state(), before);
    }

    #[test]
    fn test_invalid_payloads_rejected() {
        let store = EditorStore::default();
        for raw in [
            RawAction::new(StoreAction::SET_WORD_COUNT, json!(-1)),
            RawAction::new(StoreAction::SET_WORD_COUNT, json!(1.5)),
            RawAction::new(StoreAction::SET_CHAR_COUNT, json!("12")),
            RawAction::new(StoreAction::SET_VIEW, json!(3)),
        ] {
            assert!(matches!(
                store.dispatch_raw(raw),
                Err(StoreError::InvalidPayload { .. })
            ));
        }
        assert_eq!(store.state(), EditorViewState::default());
    }

    #[test]
    fn test_raw_actions_accept_js_numbers() {
        let store = EditorStore::default();
        store
            .dispatch_raw(RawAction::new(StoreAction::SET_CHAR_COUNT, json!(128.0)))
            .unwrap();
        store
            .dispatch_raw(RawAction::new(StoreAction::SET_VIEW, json!("output")))
            .unwrap();
        let state = store.state();
        assert_eq!(state.char_count, 128);
        assert_eq!(state.view, ViewMode::Output);
    }

    #[test]
    fn test_raw_action_wire_shape() {
        let raw: RawAction =
            serde_json::from_value(json!({ "type": "SET_WORD_COUNT", "payload": 42 })).unwrap();
        assert_eq!(
            StoreAction::try_from(raw.clone()).unwrap(),
            StoreAction::SetWordCount(42)
        );
        assert_eq!(RawAction::from(&StoreAction::SetWordCount(42)), raw);
    }

    #[test]
    fn test_subscribers_notified_per_dispatch() {
        let store = EditorStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_a = seen.clone();
        let sub = store.subscribe(move |state| seen_a.borrow_mut().push(state.word_count));
        let seen_b = seen.clone();
        store.subscribe(move |state| seen_b.borrow_mut().push(state.word_count * 10));

        store.dispatch(StoreAction::SetWordCount(1));
        let _ = store.dispatch_raw(RawAction::new("NOPE", json!(null)));
        assert_eq!(*seen.borrow(), vec![1, 10]);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.dispatch(StoreAction::SetWordCount(2));
        assert_eq!(*seen.borrow(), vec![1, 10, 20]);
    }

    #[test]
    fn test_reentrant_dispatch_from_subscriber() {
        let store = EditorStore::default();
        let inner = store.clone();
        store.subscribe(move |state| {
            // Mirror word count into char count once.
            if state.char_count != state.word_count {
                inner.dispatch(StoreAction::SetCharCount(state.word_count));
            }
        });

        store.dispatch(StoreAction::SetWordCount(4));
        let state = store.state();
        assert_eq!(state.word_count, 4);
        assert_eq!(state.char_count, 4);
    }

    #[test]
    fn test_nested_dispatch_never_followed_by_older_state() {
        let store = EditorStore::default();
        let inner = store.clone();
        store.subscribe(move |state| {
            if state.word_count == 1 {
                inner.dispatch(StoreAction::SetCharCount(99));
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state| sink.borrow_mut().push(state.char_count));

        store.dispatch(StoreAction::SetWordCount(1));
        assert_eq!(store.state().char_count, 99);
        assert_eq!(seen.borrow().last(), Some(&99));
        assert!(seen.borrow().iter().all(|&chars| chars == 99));
    }

    #[test]
    fn test_with_state_allows_dispatch() {
        let store = EditorStore::default();
        let words = store.with_state(|state| {
            store.dispatch(StoreAction::SetWordCount(state.word_count + 3));
            state.word_count
        });
        assert_eq!(words, 0);
        assert_eq!(store.state().word_count, 3);
    }

    #[test]
    fn test_state_serializes_for_js() {
        let state = EditorViewState {
            view: ViewMode::Write,
            word_count: 12,
            char_count: 80,
        };
        insta::assert_yaml_snapshot!(state, @r"
        view: write
        wordCount: 12
        charCount: 80
        ");
    }
}
