//! Engine and EngineHandle - the solver instance and its one-shot reactive cell.
//!
//! The solver is loaded elsewhere. Layout nodes only hold an [`EngineHandle`]
//! and read it; whoever loads the solver calls [`EngineHandle::resolve`] once.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use taffy::TaffyTree;

use crate::layout::MeasureContext;

/// The Taffy tree every node of a layout shares.
pub type SolverTree = TaffyTree<MeasureContext>;

/// A live solver instance. Clones share the same tree.
#[derive(Clone)]
pub struct Engine {
    tree: Rc<RefCell<SolverTree>>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(TaffyTree::new())),
        }
    }

    /// Run `f` with exclusive access to the solver tree.
    pub(crate) fn with_tree<R>(&self, f: impl FnOnce(&mut SolverTree) -> R) -> R {
        f(&mut self.tree.borrow_mut())
    }

    /// Like [`Engine::with_tree`], but `None` when the tree is already borrowed.
    pub(crate) fn try_with_tree<R>(&self, f: impl FnOnce(&mut SolverTree) -> R) -> Option<R> {
        let mut tree = self.tree.try_borrow_mut().ok()?;
        Some(f(&mut tree))
    }

    /// Number of native nodes currently alive in the solver.
    pub fn node_count(&self) -> usize {
        self.tree.borrow().total_node_count()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Engine {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.tree.try_borrow().map(|tree| tree.total_node_count()).ok();
        f.debug_struct("Engine").field("nodes", &nodes).finish()
    }
}

/// Reactive cell holding either "not yet available" or a live [`Engine`].
///
/// Resolved exactly once. Reading it inside a derived or effect tracks it
/// like any other signal.
///
/// # Example
///
/// ```ignore
/// use spark_flex::engine::{Engine, EngineHandle};
///
/// let handle = EngineHandle::pending();
/// assert!(!handle.is_resolved());
///
/// handle.resolve(Engine::new());
/// assert!(handle.is_resolved());
/// ```
#[derive(Clone)]
pub struct EngineHandle {
    engine: Signal<Option<Engine>>,
    /// Shared by every clone; identifies the cell.
    cell: Rc<()>,
}

impl EngineHandle {
    /// A handle whose engine is still loading.
    pub fn pending() -> Self {
        Self {
            engine: signal(None),
            cell: Rc::new(()),
        }
    }

    /// A handle that is already resolved.
    pub fn resolved(engine: Engine) -> Self {
        Self {
            engine: signal(Some(engine)),
            cell: Rc::new(()),
        }
    }

    /// Whether both handles are clones of the same cell.
    pub fn same_cell(&self, other: &EngineHandle) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Resolve the handle. Only the first call has an effect.
    pub fn resolve(&self, engine: Engine) {
        if self.is_resolved() {
            tracing::warn!("layout engine handle resolved twice, keeping the first engine");
            return;
        }
        tracing::debug!("layout engine resolved");
        self.engine.set(Some(engine));
    }

    /// The engine, if resolved.
    pub fn get(&self) -> Option<Engine> {
        self.engine.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.get().is_some()
    }

    /// The underlying signal, for consumers that want to react to resolution.
    pub fn signal(&self) -> Signal<Option<Engine>> {
        self.engine.clone()
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use spark_signals::{effect, flush_sync};

    #[test]
    fn test_pending_then_resolved() {
        let handle = EngineHandle::pending();
        assert!(handle.get().is_none());

        let engine = Engine::new();
        handle.resolve(engine.clone());
        assert_eq!(handle.get(), Some(engine));
    }

    #[test]
    fn test_resolves_only_once() {
        let first = Engine::new();
        let handle = EngineHandle::resolved(first.clone());
        handle.resolve(Engine::new());
        assert_eq!(handle.get(), Some(first));
    }

    #[test]
    fn test_clones_share_resolution() {
        let handle = EngineHandle::pending();
        let other = handle.clone();
        handle.resolve(Engine::new());
        assert!(other.is_resolved());
        assert!(handle.same_cell(&other));
    }

    #[test]
    fn test_separate_handles_are_distinct_cells() {
        let engine = Engine::new();
        let a = EngineHandle::resolved(engine.clone());
        let b = EngineHandle::resolved(engine);
        assert!(!a.same_cell(&b));
        assert!(!EngineHandle::pending().same_cell(&EngineHandle::pending()));
    }

    #[test]
    fn test_resolution_notifies_effects() {
        let handle = EngineHandle::pending();
        let seen = Rc::new(Cell::new(false));

        let seen_in_effect = seen.clone();
        let engine_signal = handle.signal();
        let _stop = effect(move || {
            seen_in_effect.set(engine_signal.get().is_some());
        });
        flush_sync();
        assert!(!seen.get());

        handle.resolve(Engine::new());
        flush_sync();
        assert!(seen.get());
    }

    #[test]
    fn test_engine_identity() {
        let engine = Engine::new();
        assert_eq!(engine, engine.clone());
        assert_ne!(engine, Engine::new());
        assert_eq!(engine.node_count(), 0);
    }
}
