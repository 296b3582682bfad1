//! Undo/redo history for structural steps.

use crate::engine::BlockTagChange;

/// Bounded undo/redo stacks of committed block steps.
///
/// The history only records; the engine applies. `take_undo` hands back the
/// inverse of the most recent step for the engine to apply, and moves the
/// original onto the redo stack.
#[derive(Clone, Debug)]
pub struct BlockHistory {
    undo_stack: Vec<BlockTagChange>,
    redo_stack: Vec<BlockTagChange>,
    max_steps: usize,
}

impl Default for BlockHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl BlockHistory {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record a freshly applied step. Clears the redo stack.
    pub fn record(&mut self, step: BlockTagChange) {
        self.redo_stack.clear();
        self.undo_stack.push(step);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Step to apply in order to undo, if any.
    pub fn take_undo(&mut self) -> Option<BlockTagChange> {
        let step = self.undo_stack.pop()?;
        let inverse = step.invert();
        self.redo_stack.push(step);
        Some(inverse)
    }

    /// Step to apply in order to redo, if any.
    pub fn take_redo(&mut self) -> Option<BlockTagChange> {
        let step = self.redo_stack.pop()?;
        self.undo_stack.push(step.clone());
        Some(step)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
