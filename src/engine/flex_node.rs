//! FlexNode - a node of the reactive layout tree.
//!
//! Callers edit a node's pending properties, commit them with
//! [`FlexNode::finalize_properties`], and run [`FlexNode::calculate_layout`]
//! to solve the tree. Results come back as spark-signals `Signal`s that
//! downstream rendering reads.
//!
//! # Commit protocol
//!
//! Each node remembers which properties its native node currently carries.
//! A commit applies every property present in the pending map and resets
//! every previously committed property that is gone, so only the delta
//! reaches the solver. The pending map is consumed by the commit.
//!
//! # Engine readiness
//!
//! The solver arrives through an [`EngineHandle`]. Until it resolves, commits
//! are validated and buffered as a snapshot, and solves do nothing. The first
//! operation that sees a resolved engine creates the native node and replays
//! the latest snapshot in full.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use taffy::prelude::TaffyMaxContent;
use taffy::{NodeId, Size};

use crate::config::LayoutConfig;
use crate::error::{FlexError, FlexResult};
use crate::layout::{
    apply, measure_node, read_property, to_scene_layout, MeasureContext, MeasureFunc, NodeStyle,
    Property, SceneLayout,
};
use crate::types::{Bounds, Inset, PropertyValue, ZERO_BOUNDS};

use super::handle::{EngineHandle, SolverTree};
use super::native::NativeNode;

// =============================================================================
// Output signals
// =============================================================================

/// Reactive outputs of a node, written once per solve.
#[derive(Clone)]
struct NodeSignals {
    outer_bounds: Signal<Bounds>,
    size: Signal<[f32; 2]>,
    relative_center: Signal<[f32; 2]>,
    border_inset: Signal<Inset>,
    padding_inset: Signal<Inset>,
    max_scroll_position: Signal<[f32; 2]>,
}

impl NodeSignals {
    fn new() -> Self {
        Self {
            outer_bounds: signal(ZERO_BOUNDS),
            size: signal([0.0; 2]),
            relative_center: signal([0.0; 2]),
            border_inset: signal([0.0; 4]),
            padding_inset: signal([0.0; 4]),
            max_scroll_position: signal([0.0; 2]),
        }
    }

    fn publish(&self, scene: &SceneLayout) {
        self.outer_bounds.set(scene.outer_bounds);
        self.size.set(scene.size);
        self.relative_center.set(scene.relative_center);
        self.border_inset.set(scene.border_inset);
        self.padding_inset.set(scene.padding_inset);
        self.max_scroll_position.set(scene.max_scroll_position);
    }
}

// =============================================================================
// Node state
// =============================================================================

type Shared = Rc<RefCell<NodeInner>>;

struct NodeInner {
    engine: EngineHandle,
    config: LayoutConfig,

    parent: Weak<RefCell<NodeInner>>,
    children: Vec<FlexNode>,
    index: i32,
    next_child_index: i32,

    /// Caller edits, name → value; `None` marks "no longer desired".
    pending: BTreeMap<String, Option<PropertyValue>>,
    /// Properties applied to `native` by the last successful commit.
    committed: BTreeSet<Property>,
    /// Last commit made before the engine resolved.
    snapshot: Option<BTreeMap<Property, PropertyValue>>,

    measure_func: Option<MeasureFunc>,
    native: Option<NativeNode>,
    destroyed: bool,

    signals: NodeSignals,
}

impl NodeInner {
    fn new(engine: EngineHandle, config: LayoutConfig, parent: Weak<RefCell<NodeInner>>, index: i32) -> Self {
        Self {
            engine,
            config,
            parent,
            children: Vec::new(),
            index,
            next_child_index: 0,
            pending: BTreeMap::new(),
            committed: BTreeSet::new(),
            snapshot: None,
            measure_func: None,
            native: None,
            destroyed: false,
            signals: NodeSignals::new(),
        }
    }

    fn measure_context(&self) -> Option<MeasureContext> {
        self.measure_func.clone().map(|func| MeasureContext {
            func,
            precision: self.config.precision,
        })
    }

    /// Create the native node if the engine is ready, replaying the buffered snapshot.
    fn ensure_native(&mut self) -> FlexResult<()> {
        if self.native.is_some() || self.destroyed {
            return Ok(());
        }
        let Some(engine) = self.engine.get() else {
            return Ok(());
        };

        let mut style = NodeStyle::default();
        let replayed = match &self.snapshot {
            Some(snapshot) => {
                apply_delta(&mut style, self.config.precision, &BTreeSet::new(), snapshot)?;
                snapshot.keys().copied().collect()
            }
            None => BTreeSet::new(),
        };

        let native = NativeNode::create(engine, style)?;
        if let Some(context) = self.measure_context() {
            native.set_measure(Some(context))?;
        }
        tracing::debug!(id = ?native.id, replayed = replayed.len(), "created native layout node");

        self.snapshot = None;
        self.committed = replayed;
        self.native = Some(native);
        Ok(())
    }

    /// Children in solve order: ascending index, insertion order on ties.
    fn ordered_children(&self) -> Vec<FlexNode> {
        let mut children = self.children.clone();
        children.sort_by_key(FlexNode::index);
        children
    }
}

/// Resolve pending names, dropping entries marked absent.
fn resolve_pending(
    pending: &BTreeMap<String, Option<PropertyValue>>,
) -> FlexResult<BTreeMap<Property, PropertyValue>> {
    pending
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|value| (name, value)))
        .map(|(name, value)| {
            let property =
                Property::from_name(name).ok_or_else(|| FlexError::UnknownProperty(name.clone()))?;
            Ok((property, value.clone()))
        })
        .collect()
}

/// Apply `next` and reset whatever of `committed` it no longer contains.
///
/// Returns how many properties were reset.
fn apply_delta(
    style: &mut NodeStyle,
    precision: f32,
    committed: &BTreeSet<Property>,
    next: &BTreeMap<Property, PropertyValue>,
) -> FlexResult<usize> {
    for (&property, value) in next {
        apply(property, style, precision, Some(value))?;
    }

    let mut reset = 0;
    for &property in committed.iter().filter(|property| !next.contains_key(property)) {
        apply(property, style, precision, None)?;
        reset += 1;
    }
    Ok(reset)
}

// =============================================================================
// FlexNode
// =============================================================================

/// A node of the layout tree. Cheap to clone; clones refer to the same node.
///
/// # Example
///
/// ```ignore
/// use spark_flex::{Engine, EngineHandle, FlexNode, LayoutConfig};
///
/// let root = FlexNode::new(EngineHandle::resolved(Engine::new()), LayoutConfig::default())?;
/// let child = root.create_child();
///
/// root.set_property("height", 1.0);
/// root.finalize_properties()?;
/// child.set_property("flexGrow", 1.0);
/// child.finalize_properties()?;
///
/// root.calculate_layout()?;
/// assert_eq!(child.bounds()[1][1], 1.0);
/// ```
#[derive(Clone)]
pub struct FlexNode {
    inner: Shared,
}

impl FlexNode {
    /// Create a root node.
    pub fn new(engine: EngineHandle, config: LayoutConfig) -> FlexResult<Self> {
        config.validate()?;
        Ok(Self::from_inner(NodeInner::new(engine, config, Weak::new(), 0)))
    }

    fn from_inner(inner: NodeInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    fn from_shared(inner: Shared) -> Self {
        Self { inner }
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Create a child with the next default index. It shares this node's
    /// engine handle and unit configuration.
    pub fn create_child(&self) -> FlexNode {
        let mut inner = self.inner.borrow_mut();
        let index = inner.next_child_index;
        inner.next_child_index += 1;

        let parent = if inner.destroyed {
            Weak::new()
        } else {
            Rc::downgrade(&self.inner)
        };
        let child = Self::from_inner(NodeInner::new(
            inner.engine.clone(),
            inner.config,
            parent,
            index,
        ));
        if !inner.destroyed {
            inner.children.push(child.clone());
        }
        child
    }

    /// Attach `child` at the end of this node's children, detaching it from a
    /// previous parent. Destroyed nodes, ancestors of `self`, and nodes built
    /// on another engine handle or unit configuration are ignored.
    pub fn add_child(&self, child: &FlexNode) {
        if self.is_destroyed() || child.is_destroyed() || self.is_descendant_of(child) {
            tracing::debug!("ignored invalid layout child attachment");
            return;
        }
        if !self.shares_tree_with(child) {
            tracing::debug!("ignored layout child from another engine or config");
            return;
        }
        if let Some(old_parent) = child.parent() {
            if old_parent == *self {
                return;
            }
            old_parent.remove_child(child);
        }
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Detach `child` without releasing its native node, so the subtree can be
    /// attached again later. Does nothing if `child` is not a child of `self`.
    pub fn remove_child(&self, child: &FlexNode) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.children.iter().position(|c| c == child) {
                Some(position) => Some(inner.children.remove(position)),
                None => None,
            }
        };
        let Some(removed) = removed else {
            return;
        };

        removed.inner.borrow_mut().parent = Weak::new();

        let parent = self.inner.borrow();
        let child = removed.inner.borrow();
        if let (Some(parent_native), Some(child_native)) = (&parent.native, &child.native) {
            if let Err(err) = parent_native.detach_child(child_native.id) {
                tracing::warn!(%err, "failed to detach native layout child");
            }
        }
    }

    /// Release the native node. Idempotent and irreversible: the node leaves
    /// its parent, its children become roots, and it never takes part in a
    /// solve again. Signals keep their last values.
    pub fn destroy(&self) {
        let (native, parent, children) = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return;
            }
            inner.destroyed = true;
            inner.pending.clear();
            inner.committed.clear();
            inner.snapshot = None;
            inner.measure_func = None;
            (
                inner.native.take(),
                std::mem::take(&mut inner.parent),
                std::mem::take(&mut inner.children),
            )
        };

        if let Some(parent) = parent.upgrade() {
            parent.borrow_mut().children.retain(|c| c != self);
        }
        for child in &children {
            child.inner.borrow_mut().parent = Weak::new();
        }
        // frees the Taffy node
        drop(native);
        tracing::debug!(orphans = children.len(), "destroyed layout node");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    pub fn parent(&self) -> Option<FlexNode> {
        self.inner.borrow().parent.upgrade().map(Self::from_shared)
    }

    /// Children in solve order.
    pub fn children(&self) -> Vec<FlexNode> {
        self.inner.borrow().ordered_children()
    }

    /// Nearest ancestor without a parent, or the node itself.
    pub fn root(&self) -> FlexNode {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.parent();
        while let Some(parent) = node {
            depth += 1;
            node = parent.parent();
        }
        depth
    }

    /// Native ids and units only agree within one handle and one config.
    fn shares_tree_with(&self, other: &FlexNode) -> bool {
        let this = self.inner.borrow();
        let other = other.inner.borrow();
        this.engine.same_cell(&other.engine) && this.config == other.config
    }

    fn is_descendant_of(&self, other: &FlexNode) -> bool {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            if current == *other {
                return true;
            }
            node = current.parent();
        }
        false
    }

    /// Order key among siblings.
    pub fn index(&self) -> i32 {
        self.inner.borrow().index
    }

    /// Change the order key. Takes effect on the next solve.
    pub fn set_index(&self, index: i32) {
        self.inner.borrow_mut().index = index;
    }

    // =========================================================================
    // Pending properties
    // =========================================================================

    /// Set a pending property. Last write wins.
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.inner
            .borrow_mut()
            .pending
            .insert(name.into(), Some(value.into()));
    }

    /// Mark a pending property as no longer desired.
    pub fn unset_property(&self, name: impl Into<String>) {
        self.inner.borrow_mut().pending.insert(name.into(), None);
    }

    /// Forget a pending edit entirely.
    pub fn remove_property(&self, name: &str) {
        self.inner.borrow_mut().pending.remove(name);
    }

    /// Set several pending properties, e.g. a map deserialized from a config file.
    pub fn set_properties<K, V>(&self, properties: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let mut inner = self.inner.borrow_mut();
        for (name, value) in properties {
            inner.pending.insert(name.into(), Some(value.into()));
        }
    }

    /// Snapshot of the pending map.
    pub fn pending_properties(&self) -> BTreeMap<String, Option<PropertyValue>> {
        self.inner.borrow().pending.clone()
    }

    /// Names of the properties applied by the last successful commit, sorted.
    pub fn committed_properties(&self) -> Vec<&'static str> {
        let inner = self.inner.borrow();
        let mut names: Vec<&'static str> = match &inner.snapshot {
            Some(snapshot) => snapshot.keys().map(|p| p.name()).collect(),
            None => inner.committed.iter().map(|p| p.name()).collect(),
        };
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Commit the pending properties.
    ///
    /// Properties present in the pending map are applied, properties committed
    /// before but absent now are reset to their defaults. The pending map is
    /// consumed. On error nothing changes and the pending map is kept.
    pub fn finalize_properties(&self) -> FlexResult<()> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if inner.destroyed {
            inner.pending.clear();
            return Ok(());
        }

        let next = resolve_pending(&inner.pending)?;
        inner.ensure_native()?;
        let precision = inner.config.precision;

        match inner.native.as_mut() {
            Some(native) => {
                let mut style = native.style.clone();
                let reset = apply_delta(&mut style, precision, &inner.committed, &next)?;
                let changed = native.restyle(style)?;
                tracing::debug!(
                    id = ?native.id,
                    applied = next.len(),
                    reset,
                    changed,
                    "committed layout properties"
                );
                inner.committed = next.into_keys().collect();
            }
            None => {
                let mut scratch = NodeStyle::default();
                apply_delta(&mut scratch, precision, &BTreeSet::new(), &next)?;
                tracing::debug!(buffered = next.len(), "layout engine pending, buffered commit");
                inner.snapshot = Some(next);
            }
        }

        inner.pending.clear();
        Ok(())
    }

    // =========================================================================
    // Measure slot
    // =========================================================================

    /// Install (`Some`) or remove (`None`) the intrinsic size callback.
    pub fn set_measure_func(&self, func: Option<MeasureFunc>) -> FlexResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return Ok(());
        }
        inner.measure_func = func;
        let context = inner.measure_context();
        match &inner.native {
            Some(native) => native.set_measure(context),
            None => Ok(()),
        }
    }

    /// Ask the solver to measure this node again on the next solve.
    pub fn mark_dirty(&self) -> FlexResult<()> {
        match &self.inner.borrow().native {
            Some(native) => native.mark_dirty(),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Solve
    // =========================================================================

    /// Solve the tree this node belongs to and refresh every node's signals,
    /// parent before child.
    ///
    /// Does nothing while the engine is unresolved or the node is destroyed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn calculate_layout(&self) -> FlexResult<()> {
        if self.is_destroyed() {
            return Ok(());
        }
        let root = self.root();
        let Some(engine) = root.inner.borrow().engine.get() else {
            return Ok(());
        };

        let Some(root_id) = root.sync_subtree()? else {
            return Ok(());
        };

        let mut updates = Vec::new();
        engine.with_tree(|tree| {
            tree.compute_layout_with_measure(
                root_id,
                Size::MAX_CONTENT,
                |known, available, _id, context, _style| measure_node(known, available, context),
            )?;
            root.collect_updates(tree, None, &mut updates)
        })?;

        // borrows are released; subscribers may call back into the tree
        for (signals, scene) in &updates {
            signals.publish(scene);
        }
        tracing::debug!(nodes = updates.len(), "layout solved");
        Ok(())
    }

    /// Create missing native nodes and push child order into the solver.
    ///
    /// Returns this node's native id, if it has one.
    fn sync_subtree(&self) -> FlexResult<Option<NodeId>> {
        let children = {
            let mut inner = self.inner.borrow_mut();
            inner.ensure_native()?;
            if inner.native.is_none() {
                return Ok(None);
            }
            inner.ordered_children()
        };

        let mut ids = Vec::with_capacity(children.len());
        for child in &children {
            if let Some(id) = child.sync_subtree()? {
                ids.push(id);
            }
        }

        let inner = self.inner.borrow();
        let Some(native) = &inner.native else {
            return Ok(None);
        };
        native.set_children(&ids)?;
        Ok(Some(native.id))
    }

    /// Read solved rectangles, parent before child.
    fn collect_updates(
        &self,
        tree: &SolverTree,
        parent_size: Option<Size<f32>>,
        out: &mut Vec<(NodeSignals, SceneLayout)>,
    ) -> FlexResult<()> {
        let inner = self.inner.borrow();
        let Some(native) = &inner.native else {
            return Ok(());
        };

        let layout = *tree.layout(native.id)?;
        let scene = to_scene_layout(
            &layout,
            parent_size.unwrap_or(layout.size),
            inner.config.scene_scale(),
            native.style.overflow,
        );
        out.push((inner.signals.clone(), scene));

        for child in inner.ordered_children() {
            child.collect_updates(tree, Some(layout.size), out)?;
        }
        Ok(())
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// `[[offsetX, offsetY], [width, height]]` in scene units, center-relative, y up.
    pub fn outer_bounds(&self) -> Signal<Bounds> {
        self.inner.borrow().signals.outer_bounds.clone()
    }

    /// Current value of [`FlexNode::outer_bounds`].
    pub fn bounds(&self) -> Bounds {
        self.outer_bounds().get()
    }

    pub fn size(&self) -> Signal<[f32; 2]> {
        self.inner.borrow().signals.size.clone()
    }

    pub fn relative_center(&self) -> Signal<[f32; 2]> {
        self.inner.borrow().signals.relative_center.clone()
    }

    /// Border widths `[top, right, bottom, left]`.
    pub fn border_inset(&self) -> Signal<Inset> {
        self.inner.borrow().signals.border_inset.clone()
    }

    /// Padding `[top, right, bottom, left]`.
    pub fn padding_inset(&self) -> Signal<Inset> {
        self.inner.borrow().signals.padding_inset.clone()
    }

    /// How far content overflows on each axis when overflow is `scroll`.
    pub fn max_scroll_position(&self) -> Signal<[f32; 2]> {
        self.inner.borrow().signals.max_scroll_position.clone()
    }

    pub fn config(&self) -> LayoutConfig {
        self.inner.borrow().config
    }

    /// Value the native node currently carries for `name`, in solver units.
    ///
    /// `None` while there is no native node.
    pub fn resolved_property(&self, name: &str) -> FlexResult<Option<PropertyValue>> {
        let property =
            Property::from_name(name).ok_or_else(|| FlexError::UnknownProperty(name.to_string()))?;
        let mut inner = self.inner.borrow_mut();
        inner.ensure_native()?;
        Ok(inner
            .native
            .as_ref()
            .and_then(|native| read_property(property, &native.style)))
    }

    /// Whether the native node exists.
    pub fn is_attached_to_engine(&self) -> bool {
        self.inner.borrow().native.is_some()
    }
}

impl PartialEq for FlexNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for FlexNode {}

impl fmt::Debug for FlexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("FlexNode")
                .field("index", &inner.index)
                .field("children", &inner.children.len())
                .field("committed", &inner.committed)
                .field("native", &inner.native.as_ref().map(|n| n.id))
                .field("destroyed", &inner.destroyed)
                .finish(),
            Err(_) => f.write_str("FlexNode { <borrowed> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use std::cell::Cell;

    use spark_signals::{effect, flush_sync};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn resolved_root() -> (Engine, FlexNode) {
        let engine = Engine::new();
        let root = FlexNode::new(EngineHandle::resolved(engine.clone()), LayoutConfig::default())
            .unwrap();
        (engine, root)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = LayoutConfig::default().with_precision(0.0);
        assert!(matches!(
            FlexNode::new(EngineHandle::pending(), config),
            Err(FlexError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_create_child_assigns_increasing_index() {
        let (_engine, root) = resolved_root();
        let a = root.create_child();
        let b = root.create_child();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(a.parent(), Some(root.clone()));
        assert_eq!(root.children(), vec![a.clone(), b.clone()]);
        assert_eq!(b.depth(), 1);
        assert_eq!(a.create_child().depth(), 2);
    }

    #[test]
    fn test_children_order_by_index_then_insertion() {
        let (_engine, root) = resolved_root();
        let a = root.create_child();
        let b = root.create_child();
        let c = root.create_child();
        a.set_index(5);
        b.set_index(1);
        c.set_index(1);
        assert_eq!(root.children(), vec![b, c, a]);
    }

    #[test]
    fn test_commit_applies_and_consumes_pending() {
        let (_engine, root) = resolved_root();
        root.set_property("flexDirection", "row");
        root.set_property("width", 1.0);
        root.finalize_properties().unwrap();

        assert!(root.pending_properties().is_empty());
        assert_eq!(root.committed_properties(), vec!["flexDirection", "width"]);
        assert_eq!(
            root.resolved_property("flexDirection").unwrap(),
            Some(PropertyValue::from("row"))
        );
    }

    #[test]
    fn test_empty_commit_resets_everything() {
        let (_engine, root) = resolved_root();
        root.set_property("flexDirection", "row");
        root.set_property("paddingTop", 0.1);
        root.finalize_properties().unwrap();

        root.finalize_properties().unwrap();
        assert!(root.committed_properties().is_empty());
        assert_eq!(
            root.resolved_property("flexDirection").unwrap(),
            Some(PropertyValue::from("column"))
        );
        assert_eq!(
            root.resolved_property("paddingTop").unwrap(),
            Some(PropertyValue::Number(0.0))
        );
    }

    #[test]
    fn test_unset_property_resets_it() {
        let (_engine, root) = resolved_root();
        root.set_property("flexGrow", 2.0);
        root.set_property("flexShrink", 1.0);
        root.finalize_properties().unwrap();

        root.unset_property("flexGrow");
        root.set_property("flexShrink", 1.0);
        root.finalize_properties().unwrap();

        assert_eq!(root.committed_properties(), vec!["flexShrink"]);
        assert_eq!(
            root.resolved_property("flexGrow").unwrap(),
            Some(PropertyValue::Number(0.0))
        );
    }

    #[test]
    fn test_failed_commit_changes_nothing() {
        let (_engine, root) = resolved_root();
        root.set_property("flexDirection", "row");
        root.finalize_properties().unwrap();

        root.set_property("width", 1.0);
        root.set_property("alignItems", "centerx");
        let err = root.finalize_properties().unwrap_err();
        assert!(err.to_string().starts_with("unexpected value centerx"));

        assert_eq!(root.committed_properties(), vec!["flexDirection"]);
        assert_eq!(
            root.resolved_property("width").unwrap(),
            Some(PropertyValue::from("auto"))
        );
        assert_eq!(root.pending_properties().len(), 2);
    }

    #[test]
    fn test_unknown_property_fails_commit() {
        let (_engine, root) = resolved_root();
        root.set_property("colour", "red");
        assert!(matches!(
            root.finalize_properties(),
            Err(FlexError::UnknownProperty(name)) if name == "colour"
        ));
    }

    #[test]
    fn test_commit_before_engine_is_validated_and_buffered() {
        let handle = EngineHandle::pending();
        let root = FlexNode::new(handle.clone(), LayoutConfig::default()).unwrap();

        root.set_property("alignSelf", 3);
        assert!(root.finalize_properties().is_err());

        root.set_property("alignSelf", "center");
        root.finalize_properties().unwrap();
        assert!(!root.is_attached_to_engine());
        assert_eq!(root.resolved_property("alignSelf").unwrap(), None);
        assert_eq!(root.committed_properties(), vec!["alignSelf"]);

        handle.resolve(Engine::new());
        assert_eq!(
            root.resolved_property("alignSelf").unwrap(),
            Some(PropertyValue::from("center"))
        );
        assert!(root.is_attached_to_engine());
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let handle = EngineHandle::pending();
        let root = FlexNode::new(handle.clone(), LayoutConfig::default()).unwrap();

        root.set_property("flexGrow", 1.0);
        root.finalize_properties().unwrap();
        root.set_property("flexShrink", 1.0);
        root.finalize_properties().unwrap();

        handle.resolve(Engine::new());
        assert_eq!(
            root.resolved_property("flexGrow").unwrap(),
            Some(PropertyValue::Number(0.0))
        );
        assert_eq!(
            root.resolved_property("flexShrink").unwrap(),
            Some(PropertyValue::Number(1.0))
        );
        assert_eq!(root.committed_properties(), vec!["flexShrink"]);
    }

    #[test]
    fn test_solve_without_engine_is_noop() {
        let root = FlexNode::new(EngineHandle::pending(), LayoutConfig::default()).unwrap();
        root.set_property("height", 1.0);
        root.finalize_properties().unwrap();
        root.calculate_layout().unwrap();
        assert_eq!(root.bounds(), ZERO_BOUNDS);
    }

    #[test]
    fn test_single_root_bounds() {
        let (_engine, root) = resolved_root();
        root.set_property("width", 2.0);
        root.set_property("height", 1.0);
        root.finalize_properties().unwrap();
        root.calculate_layout().unwrap();

        let [[x, y], [w, h]] = root.bounds();
        assert!(approx(x, 0.0) && approx(y, 0.0));
        assert!(approx(w, 2.0) && approx(h, 1.0));
    }

    #[test]
    fn test_pixel_size_scales_output() {
        let engine = Engine::new();
        let config = LayoutConfig::default().with_pixel_size(10.0);
        let root = FlexNode::new(EngineHandle::resolved(engine), config).unwrap();
        root.set_property("width", 0.5);
        root.set_property("height", 0.25);
        root.finalize_properties().unwrap();
        root.calculate_layout().unwrap();

        let [w, h] = root.size().get();
        assert!(approx(w, 5.0) && approx(h, 2.5));
    }

    #[test]
    fn test_border_and_padding_insets() {
        let (_engine, root) = resolved_root();
        root.set_property("width", 1.0);
        root.set_property("height", 1.0);
        root.set_property("borderLeft", 0.02);
        root.set_property("paddingTop", 0.05);
        root.finalize_properties().unwrap();
        root.calculate_layout().unwrap();

        let [top, right, bottom, left] = root.border_inset().get();
        assert!(approx(left, 0.02));
        assert!(approx(top, 0.0) && approx(right, 0.0) && approx(bottom, 0.0));
        assert!(approx(root.padding_inset().get()[0], 0.05));
    }

    #[test]
    fn test_scroll_extent() {
        let (_engine, root) = resolved_root();
        root.set_property("height", 1.0);
        root.set_property("width", 1.0);
        root.set_property("overflow", "scroll");
        root.finalize_properties().unwrap();

        let child = root.create_child();
        child.set_property("height", 3.0);
        child.set_property("flexShrink", 0.0);
        child.finalize_properties().unwrap();
        root.calculate_layout().unwrap();

        let [x, y] = root.max_scroll_position().get();
        assert!(approx(x, 0.0));
        assert!(approx(y, 2.0));
    }

    #[test]
    fn test_measure_func_sizes_leaf() {
        let (_engine, root) = resolved_root();
        let leaf = root.create_child();
        leaf.set_property("alignSelf", "flex-start");
        leaf.finalize_properties().unwrap();

        let func: MeasureFunc = Rc::new(|_known, _available| Size {
            width: 0.3,
            height: 0.2,
        });
        leaf.set_measure_func(Some(func)).unwrap();
        root.calculate_layout().unwrap();

        let [w, h] = leaf.size().get();
        assert!(approx(w, 0.3) && approx(h, 0.2));

        leaf.set_measure_func(None).unwrap();
        root.calculate_layout().unwrap();
        assert_eq!(leaf.size().get(), [0.0, 0.0]);
    }

    #[test]
    fn test_measure_func_installed_before_engine() {
        let handle = EngineHandle::pending();
        let root = FlexNode::new(handle.clone(), LayoutConfig::default()).unwrap();
        let func: MeasureFunc = Rc::new(|_known, _available| Size {
            width: 0.1,
            height: 0.4,
        });
        root.set_measure_func(Some(func)).unwrap();

        handle.resolve(Engine::new());
        root.calculate_layout().unwrap();
        let [w, h] = root.size().get();
        assert!(approx(w, 0.1) && approx(h, 0.4));
    }

    #[test]
    fn test_mark_dirty_remeasures() {
        let (_engine, root) = resolved_root();
        let width = Rc::new(Cell::new(0.1f32));
        let width_for_measure = width.clone();
        let func: MeasureFunc = Rc::new(move |_known, _available| Size {
            width: width_for_measure.get(),
            height: 0.1,
        });
        root.set_measure_func(Some(func)).unwrap();
        root.calculate_layout().unwrap();
        assert!(approx(root.size().get()[0], 0.1));

        width.set(0.2);
        root.mark_dirty().unwrap();
        root.calculate_layout().unwrap();
        assert!(approx(root.size().get()[0], 0.2));
    }

    #[test]
    fn test_destroy_is_idempotent_and_frees_native() {
        let (engine, root) = resolved_root();
        let child = root.create_child();
        root.calculate_layout().unwrap();
        assert_eq!(engine.node_count(), 2);

        child.destroy();
        child.destroy();
        assert!(child.is_destroyed());
        assert_eq!(engine.node_count(), 1);
        assert!(root.children().is_empty());

        root.remove_child(&child);
        root.add_child(&child);
        assert!(root.children().is_empty());
        child.calculate_layout().unwrap();
        child.finalize_properties().unwrap();
    }

    #[test]
    fn test_destroy_orphans_children() {
        let (_engine, root) = resolved_root();
        let middle = root.create_child();
        let leaf = middle.create_child();
        middle.destroy();
        assert_eq!(leaf.parent(), None);
        assert_eq!(leaf.root(), leaf);
    }

    #[test]
    fn test_dropping_last_handle_frees_native() {
        let (engine, root) = resolved_root();
        {
            let child = root.create_child();
            root.calculate_layout().unwrap();
            root.remove_child(&child);
        }
        assert_eq!(engine.node_count(), 1);
    }

    #[test]
    fn test_reattach_keeps_native_node() {
        let (engine, root) = resolved_root();
        root.set_property("height", 1.0);
        root.finalize_properties().unwrap();
        let child = root.create_child();
        child.set_property("flexGrow", 1.0);
        child.finalize_properties().unwrap();
        root.calculate_layout().unwrap();

        root.remove_child(&child);
        assert_eq!(child.parent(), None);
        assert_eq!(engine.node_count(), 2);

        root.add_child(&child);
        root.calculate_layout().unwrap();
        assert!(approx(child.bounds()[1][1], 1.0));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let (_engine, root) = resolved_root();
        let child = root.create_child();
        child.add_child(&root);
        assert_eq!(root.parent(), None);
        assert_eq!(child.children(), vec![]);
    }

    #[test]
    fn test_add_child_rejects_other_engine() {
        let (engine_a, a) = resolved_root();
        a.set_property("height", 1.0);
        a.finalize_properties().unwrap();
        let a1 = a.create_child();
        a1.set_property("flexGrow", 1.0);
        a1.finalize_properties().unwrap();
        a.calculate_layout().unwrap();
        let before = a1.bounds();

        let (_engine_b, b) = resolved_root();
        let b_child = b.create_child();
        b.calculate_layout().unwrap();

        a.add_child(&b_child);
        assert_eq!(a.children(), vec![a1.clone()]);
        assert_eq!(b_child.parent(), Some(b.clone()));

        a.calculate_layout().unwrap();
        assert_eq!(a1.bounds(), before);
        assert!(approx(a1.bounds()[1][1], 1.0));
        assert_eq!(engine_a.node_count(), 2);
    }

    #[test]
    fn test_add_child_rejects_other_handle_on_same_engine() {
        let engine = Engine::new();
        let a = FlexNode::new(EngineHandle::resolved(engine.clone()), LayoutConfig::default())
            .unwrap();
        let b = FlexNode::new(EngineHandle::resolved(engine), LayoutConfig::default()).unwrap();
        a.add_child(&b);
        assert_eq!(b.parent(), None);
    }

    #[test]
    fn test_add_child_rejects_other_precision() {
        let handle = EngineHandle::resolved(Engine::new());
        let parent = FlexNode::new(handle.clone(), LayoutConfig::default()).unwrap();
        parent.set_property("height", 1.0);
        parent.finalize_properties().unwrap();

        let coarse = FlexNode::new(handle.clone(), LayoutConfig::default().with_precision(0.1))
            .unwrap();
        coarse.set_property("flexGrow", 1.0);
        coarse.finalize_properties().unwrap();

        parent.add_child(&coarse);
        assert_eq!(coarse.parent(), None);
        assert!(parent.children().is_empty());

        let same = FlexNode::new(handle, LayoutConfig::default()).unwrap();
        same.set_property("flexGrow", 1.0);
        same.finalize_properties().unwrap();
        parent.add_child(&same);
        parent.calculate_layout().unwrap();
        assert!(approx(same.bounds()[1][1], 1.0));
    }

    #[test]
    fn test_bounds_signal_notifies() {
        let (_engine, root) = resolved_root();
        let runs = Rc::new(Cell::new(0));
        let runs_in_effect = runs.clone();
        let bounds = root.outer_bounds();
        let _stop = effect(move || {
            let _ = bounds.get();
            runs_in_effect.set(runs_in_effect.get() + 1);
        });
        flush_sync();
        let before = runs.get();

        root.set_property("height", 1.0);
        root.finalize_properties().unwrap();
        root.calculate_layout().unwrap();
        flush_sync();
        assert!(runs.get() > before);
    }

    #[test]
    fn test_set_properties_from_json() {
        let (_engine, root) = resolved_root();
        let props: BTreeMap<String, PropertyValue> =
            serde_json::from_str(r#"{ "width": "50%", "flexGrow": 2, "display": "none" }"#).unwrap();
        root.set_properties(props);
        root.finalize_properties().unwrap();
        assert_eq!(root.committed_properties(), vec!["display", "flexGrow", "width"]);
        assert_eq!(
            root.resolved_property("width").unwrap(),
            Some(PropertyValue::from("50%"))
        );
    }
}
