//! # spark-flex
//!
//! Reactive flexbox layout tree for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity and [Taffy](https://github.com/DioxusLabs/taffy)
//! for flexbox computation.
//!
//! ## Architecture
//!
//! ```text
//! set_property → pending map → finalize_properties → NodeStyle → taffy::Style
//!                                                                     │
//! outer_bounds signal ← scene transform ← taffy::Layout ← calculate_layout
//! ```
//!
//! The solver is reached through an [`EngineHandle`] that may resolve after
//! nodes are created and configured. Nothing is lost in between: the last
//! commit is replayed when the engine appears.
//!
//! ## Modules
//!
//! - [`types`] - Property values, lengths, edges, keyword enums
//! - [`engine`] - Engine handle and the [`FlexNode`] tree
//! - [`layout`] - Property setter table and the Taffy bridge
//! - [`config`] - Unit configuration
//! - [`error`] - Error type

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{Engine, EngineHandle, FlexNode};
pub use error::{FlexError, FlexResult};
pub use layout::{MeasureFunc, Property, SceneLayout};
pub use types::{Bounds, Inset, PropertyValue, ZERO_BOUNDS};
