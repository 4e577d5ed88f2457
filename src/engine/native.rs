//! NativeNode - a layout node's handle into the solver tree.

use taffy::NodeId;

use crate::error::FlexResult;
use crate::layout::{to_taffy_style, MeasureContext, NodeStyle};

use super::handle::Engine;

/// Solver-side half of a layout node: the Taffy node plus the attribute
/// record it was styled from. Dropping it frees the Taffy node.
pub(crate) struct NativeNode {
    pub(crate) engine: Engine,
    pub(crate) id: NodeId,
    pub(crate) style: NodeStyle,
}

impl NativeNode {
    /// Allocate a leaf styled from `style`.
    pub(crate) fn create(engine: Engine, style: NodeStyle) -> FlexResult<Self> {
        let id = engine.with_tree(|tree| tree.new_leaf(to_taffy_style(&style)))?;
        Ok(Self { engine, id, style })
    }

    /// Replace the attribute record. Only touches the solver when it changed.
    pub(crate) fn restyle(&mut self, style: NodeStyle) -> FlexResult<bool> {
        if style == self.style {
            return Ok(false);
        }
        self.engine
            .with_tree(|tree| tree.set_style(self.id, to_taffy_style(&style)))?;
        self.style = style;
        Ok(true)
    }

    pub(crate) fn set_measure(&self, context: Option<MeasureContext>) -> FlexResult<()> {
        self.engine.with_tree(|tree| {
            tree.set_node_context(self.id, context)?;
            tree.mark_dirty(self.id)
        })?;
        Ok(())
    }

    pub(crate) fn mark_dirty(&self) -> FlexResult<()> {
        self.engine.with_tree(|tree| tree.mark_dirty(self.id))?;
        Ok(())
    }

    /// Set the ordered native children, skipping the call when unchanged.
    pub(crate) fn set_children(&self, children: &[NodeId]) -> FlexResult<()> {
        self.engine.with_tree(|tree| {
            if tree.children(self.id)? != children {
                tree.set_children(self.id, children)?;
            }
            Ok::<_, taffy::TaffyError>(())
        })?;
        Ok(())
    }

    /// Detach `child` from this node if the solver still has it here.
    pub(crate) fn detach_child(&self, child: NodeId) -> FlexResult<()> {
        self.engine.with_tree(|tree| {
            if tree.parent(child) == Some(self.id) {
                tree.remove_child(self.id, child)?;
            }
            Ok::<_, taffy::TaffyError>(())
        })?;
        Ok(())
    }
}

impl Drop for NativeNode {
    fn drop(&mut self) {
        let id = self.id;
        match self.engine.try_with_tree(|tree| tree.remove(id)) {
            Some(Ok(_)) => tracing::trace!(?id, "released native layout node"),
            Some(Err(err)) => tracing::warn!(?id, %err, "failed to release native layout node"),
            None => tracing::warn!(?id, "solver busy, native layout node not released"),
        }
    }
}
