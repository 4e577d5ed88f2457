//! Layout Module - property table and the Taffy bridge.
//!
//! - [`setter`]: property names, validation, unit conversion into [`NodeStyle`]
//! - [`taffy_bridge`]: [`NodeStyle`] → `taffy::Style`, measure callbacks, and
//!   solved `taffy::Layout` → scene-space [`SceneLayout`]

mod node_style;
pub mod setter;
pub mod taffy_bridge;

pub use node_style::NodeStyle;
pub use setter::{apply, read_property, setter, EdgeFamily, Property};
pub use taffy_bridge::{
    measure_node, to_scene_layout, to_taffy_style, MeasureContext, MeasureFunc, SceneLayout,
};
