//! NodeStyle - the attribute record of a solver-native node.
//!
//! Every field is in solver units: lengths are already divided by precision.
//! The setter table writes these fields, the Taffy bridge turns the record
//! into a `taffy::Style`, and the getter reads them back.

use crate::types::{
    Align, Display, Edges, FlexDirection, FlexWrap, JustifyContent, Length, Overflow,
    PositionType,
};

/// Attribute record of one native node.
///
/// # Property Categories
///
/// - **Container (5)**: flexDirection, flexWrap, justifyContent, alignItems, alignContent
/// - **Item (4)**: flexGrow, flexShrink, flexBasis, alignSelf
/// - **Dimensions (7)**: width, height, min/max width and height, aspectRatio
/// - **Edges (16)**: margin, padding, border and position, four edges each
/// - **Other (5)**: display, positionType, overflow, rowGap, columnGap
///
/// `Default` is the solver's factory state.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    // =========================================================================
    // CONTAINER
    // =========================================================================
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: Align,
    pub align_content: Align,

    // =========================================================================
    // ITEM
    // =========================================================================
    pub flex_grow: f32,
    /// Shrinking is opt-in: the factory default is 0.
    pub flex_shrink: f32,
    pub flex_basis: Length,
    /// `Auto` defers to the parent's alignItems.
    pub align_self: Align,

    // =========================================================================
    // DIMENSIONS
    // =========================================================================
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    /// `None` until set.
    pub aspect_ratio: Option<f32>,

    // =========================================================================
    // EDGES
    // =========================================================================
    pub margin: Edges<Length>,
    pub padding: Edges<Length>,
    pub border: Edges<Length>,
    /// Insets used by relative/absolute positioning.
    pub position: Edges<Length>,

    // =========================================================================
    // OTHER
    // =========================================================================
    pub display: Display,
    pub position_type: PositionType,
    pub overflow: Overflow,
    pub row_gap: Length,
    pub column_gap: Length,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            flex_direction: FlexDirection::Column,
            flex_wrap: FlexWrap::NoWrap,
            justify_content: JustifyContent::FlexStart,
            align_items: Align::Stretch,
            align_content: Align::FlexStart,

            flex_grow: 0.0,
            flex_shrink: 0.0,
            flex_basis: Length::Auto,
            align_self: Align::Auto,

            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::Auto,
            max_height: Length::Auto,
            aspect_ratio: None,

            margin: Edges::uniform(Length::ZERO),
            padding: Edges::uniform(Length::ZERO),
            border: Edges::uniform(Length::ZERO),
            position: Edges::uniform(Length::Auto),

            display: Display::Flex,
            position_type: PositionType::Relative,
            overflow: Overflow::Visible,
            row_gap: Length::ZERO,
            column_gap: Length::ZERO,
        }
    }
}
