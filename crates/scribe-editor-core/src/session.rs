//! Editor session: owns the change → track → overlay → mutate loop.
//!
//! The engine is injected once with [`EditorSession::attach`]. Every edit
//! made through the session, including raw engine access via
//! [`EditorSession::engine_mut`], re-runs the tracker pass before control
//! returns to the caller if the engine reported a change. Engine listeners
//! themselves only raise a dirty flag, so they never re-enter the session;
//! hosts whose engine changes on its own call [`EditorSession::flush`] from
//! their change callback.

use std::cell::Cell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::config::EditorConfig;
use crate::engine::{BlockTagChange, EditorEngine};
use crate::extension::CodemarkExtension;
use crate::error::SessionError;
use crate::mutator;
use crate::node::BlockNode;
use crate::overlay::{HeadingControl, HeadingOverlay};
use crate::store::{EditorStore, EditorViewState, StoreAction, ViewMode};
use crate::tag::{BlockTag, HeadingLevel};
use crate::tracker::{BlockNodeTracker, TrackedBlockNode};

/// Everything re-derived from the engine on each pass.
struct Derived<N> {
    tracker: BlockNodeTracker,
    overlay: HeadingOverlay,
    nodes: Vec<TrackedBlockNode<N>>,
    controls: Vec<HeadingControl<N>>,
}

impl<N: BlockNode> Derived<N> {
    fn refresh<E: EditorEngine<Node = N>>(&mut self, engine: Option<&E>, store: &EditorStore) {
        self.nodes = self.tracker.track(engine, store);
        self.controls = self.overlay.controls(&self.nodes);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.controls.clear();
    }
}

pub struct EditorSession<E: EditorEngine> {
    engine: Option<E>,
    store: EditorStore,
    derived: Derived<E::Node>,
    dirty: Rc<Cell<bool>>,
}

impl<E: EditorEngine> EditorSession<E> {
    /// Session with no engine and a fresh store.
    pub fn new(config: &EditorConfig) -> Self {
        let store = EditorStore::new(EditorViewState::with_view(config.initial_view.clone()));
        Self::with_store(config, store)
    }

    /// Session sharing an existing store with other UI regions.
    pub fn with_store(config: &EditorConfig, store: EditorStore) -> Self {
        Self {
            engine: None,
            store,
            derived: Derived {
                tracker: BlockNodeTracker::new(),
                overlay: HeadingOverlay::new(config.overlay.clone()),
                nodes: Vec::new(),
                controls: Vec::new(),
            },
            dirty: Rc::new(Cell::new(false)),
        }
    }

    /// Create a session and attach `engine` in one go.
    pub fn mount(config: &EditorConfig, engine: E) -> Result<Self, SessionError> {
        let mut session = Self::new(config);
        session.attach(engine)?;
        Ok(session)
    }

    /// Inject the engine: registers the change listener and the codemark
    /// extension, then runs the initial tracker pass.
    pub fn attach(&mut self, mut engine: E) -> Result<(), SessionError> {
        let codemark = CodemarkExtension::for_engine(&engine)?;
        engine.register_extension(Box::new(codemark))?;

        let dirty = self.dirty.clone();
        engine.on_change(Box::new(move || dirty.set(true)));

        self.engine = Some(engine);
        self.handle_change();
        Ok(())
    }

    /// Drop the engine. Nodes and controls are cleared.
    pub fn detach(&mut self) -> Option<E> {
        self.derived.clear();
        self.dirty.set(false);
        self.engine.take()
    }

    /// Re-derive nodes, counts and controls from the engine.
    pub fn handle_change(&mut self) -> &[HeadingControl<E::Node>] {
        self.dirty.set(false);
        self.derived.refresh(self.engine.as_ref(), &self.store);
        &self.derived.controls
    }

    /// Process a pending change notification, if any.
    pub fn flush(&mut self) -> bool {
        if !self.dirty.get() {
            return false;
        }
        self.handle_change();
        true
    }

    /// Whether the engine reported a change not yet processed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Change a block to heading `level`.
    pub fn set_heading_level(
        &mut self,
        node: &E::Node,
        level: HeadingLevel,
    ) -> Result<Option<BlockTagChange>, SessionError> {
        let Some(mut engine) = self.engine_mut() else {
            return Ok(None);
        };
        Ok(mutator::replace_block_tag(
            &mut *engine,
            node,
            &BlockTag::Heading(level),
        )?)
    }

    /// Pick `level` from the menu of control `control`.
    pub fn select(
        &mut self,
        control: usize,
        level: HeadingLevel,
    ) -> Result<Option<BlockTagChange>, SessionError> {
        let Some(command) = self.derived.controls.get(control).and_then(|c| c.select(level)) else {
            return Ok(None);
        };
        let Some(mut engine) = self.engine_mut() else {
            return Ok(None);
        };
        Ok(mutator::change_heading(&mut *engine, &command)?)
    }

    pub fn undo(&mut self) -> bool {
        self.edit(|engine| engine.undo()).unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        self.edit(|engine| engine.redo()).unwrap_or(false)
    }

    pub fn set_view(&self, view: ViewMode) -> EditorViewState {
        self.store.dispatch(StoreAction::SetView(view))
    }

    pub fn nodes(&self) -> &[TrackedBlockNode<E::Node>] {
        &self.derived.nodes
    }

    pub fn controls(&self) -> &[HeadingControl<E::Node>] {
        &self.derived.controls
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn tracker(&self) -> &BlockNodeTracker {
        &self.derived.tracker
    }

    pub fn overlay(&self) -> &HeadingOverlay {
        &self.derived.overlay
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Mutable engine access.
    ///
    /// The tracker pass for any change the engine reports runs when the
    /// guard is dropped, so the store never lags behind the engine once the
    /// edit is done.
    pub fn engine_mut(&mut self) -> Option<EngineGuard<'_, E>> {
        let engine = self.engine.as_mut()?;
        Some(EngineGuard {
            engine,
            derived: &mut self.derived,
            store: &self.store,
            dirty: &self.dirty,
        })
    }

    /// Run `f` against the engine, then process the change it made.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        let mut engine = self.engine_mut()?;
        Some(f(&mut *engine))
    }
}

/// Borrowed engine returned by [`EditorSession::engine_mut`].
pub struct EngineGuard<'a, E: EditorEngine> {
    engine: &'a mut E,
    derived: &'a mut Derived<E::Node>,
    store: &'a EditorStore,
    dirty: &'a Cell<bool>,
}

impl<E: EditorEngine> Deref for EngineGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.engine
    }
}

impl<E: EditorEngine> DerefMut for EngineGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.engine
    }
}

impl<E: EditorEngine> Drop for EngineGuard<'_, E> {
    fn drop(&mut self) {
        if self.dirty.replace(false) {
            self.derived.refresh(Some(&*self.engine), self.store);
        }
    }
}
