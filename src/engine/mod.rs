//! Layout Engine - the solver handle and the reactive node tree.
//!
//! - [`Engine`]: one shared Taffy tree
//! - [`EngineHandle`]: reactive cell the engine is resolved into, possibly late
//! - [`FlexNode`]: a tree node; buffers, commits, solves, and publishes signals

mod flex_node;
mod handle;
mod native;

pub use flex_node::FlexNode;
pub use handle::{Engine, EngineHandle, SolverTree};
