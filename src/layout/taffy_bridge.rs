//! Taffy Bridge - Integration with the Taffy layout engine
//!
//! Converts a native node's [`NodeStyle`] to a Taffy style, adapts measure
//! callbacks between logical units and solver points, and turns Taffy's
//! resolved rectangles into scene-space geometry.

use std::rc::Rc;

use taffy::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems, AvailableSpace,
    Dimension as TaffyDimension, Display as TaffyDisplay, FlexDirection as TaffyFlexDirection,
    FlexWrap as TaffyFlexWrap, JustifyContent as TaffyJustifyContent, Layout, LengthPercentage,
    LengthPercentageAuto, Overflow as TaffyOverflow, Point, Position as TaffyPosition, Rect, Size,
    Style,
};

use crate::types::{
    Align, Bounds, Display, Edges, FlexDirection, FlexWrap, Inset, JustifyContent, Length,
    Overflow, PositionType,
};

use super::node_style::NodeStyle;

// =============================================================================
// DIMENSION CONVERSION
// =============================================================================

/// Convert a solver-unit Length to Taffy's Dimension.
fn to_taffy_dimension(length: Length) -> TaffyDimension {
    match length {
        Length::Auto => TaffyDimension::Auto,
        Length::Points(n) => TaffyDimension::Length(n),
        Length::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

/// Convert a solver-unit Length to Taffy's LengthPercentageAuto.
fn to_taffy_lpa(length: Length) -> LengthPercentageAuto {
    match length {
        Length::Auto => LengthPercentageAuto::Auto,
        Length::Points(n) => LengthPercentageAuto::Length(n),
        Length::Percent(p) => LengthPercentageAuto::Percent(p / 100.0),
    }
}

/// Convert a solver-unit Length to Taffy's LengthPercentage.
///
/// The setter table never stores `Auto` on these fields; it maps to zero.
fn to_taffy_lp(length: Length) -> LengthPercentage {
    match length {
        Length::Auto => LengthPercentage::Length(0.0),
        Length::Points(n) => LengthPercentage::Length(n),
        Length::Percent(p) => LengthPercentage::Percent(p / 100.0),
    }
}

fn to_taffy_rect<T>(edges: Edges<Length>, convert: impl Fn(Length) -> T) -> Rect<T> {
    Rect {
        left: convert(edges.left),
        right: convert(edges.right),
        top: convert(edges.top),
        bottom: convert(edges.bottom),
    }
}

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

// One-to-one keyword mappings, in declaration order.

impl From<JustifyContent> for TaffyJustifyContent {
    fn from(justify: JustifyContent) -> Self {
        use JustifyContent as J;
        match justify {
            J::FlexStart => Self::FlexStart,
            J::Center => Self::Center,
            J::FlexEnd => Self::FlexEnd,
            J::SpaceBetween => Self::SpaceBetween,
            J::SpaceAround => Self::SpaceAround,
            J::SpaceEvenly => Self::SpaceEvenly,
        }
    }
}

impl From<FlexDirection> for TaffyFlexDirection {
    fn from(direction: FlexDirection) -> Self {
        match direction {
            FlexDirection::Column => Self::Column,
            FlexDirection::ColumnReverse => Self::ColumnReverse,
            FlexDirection::Row => Self::Row,
            FlexDirection::RowReverse => Self::RowReverse,
        }
    }
}

impl From<FlexWrap> for TaffyFlexWrap {
    fn from(wrap: FlexWrap) -> Self {
        match wrap {
            FlexWrap::NoWrap => Self::NoWrap,
            FlexWrap::Wrap => Self::Wrap,
            FlexWrap::WrapReverse => Self::WrapReverse,
        }
    }
}

/// Item alignment (alignItems / alignSelf). `Auto` leaves it to the parent.
///
/// Taffy has no distributed item alignment; space-between and space-around
/// use their CSS fallbacks (flex-start and center).
fn to_taffy_align_items(align: Align) -> Option<TaffyAlignItems> {
    match align {
        Align::Auto => None,
        Align::FlexStart | Align::SpaceBetween => Some(TaffyAlignItems::FlexStart),
        Align::Center | Align::SpaceAround => Some(TaffyAlignItems::Center),
        Align::FlexEnd => Some(TaffyAlignItems::FlexEnd),
        Align::Stretch => Some(TaffyAlignItems::Stretch),
        Align::Baseline => Some(TaffyAlignItems::Baseline),
    }
}

/// Line alignment (alignContent). Baseline has no line form and falls back to flex-start.
fn to_taffy_align_content(align: Align) -> Option<TaffyAlignContent> {
    match align {
        Align::Auto => None,
        Align::FlexStart | Align::Baseline => Some(TaffyAlignContent::FlexStart),
        Align::Center => Some(TaffyAlignContent::Center),
        Align::FlexEnd => Some(TaffyAlignContent::FlexEnd),
        Align::Stretch => Some(TaffyAlignContent::Stretch),
        Align::SpaceBetween => Some(TaffyAlignContent::SpaceBetween),
        Align::SpaceAround => Some(TaffyAlignContent::SpaceAround),
    }
}

fn to_taffy_overflow(overflow: Overflow) -> TaffyOverflow {
    match overflow {
        Overflow::Visible => TaffyOverflow::Visible,
        Overflow::Hidden => TaffyOverflow::Hidden,
        Overflow::Scroll => TaffyOverflow::Scroll,
    }
}

fn to_taffy_position(position: PositionType) -> TaffyPosition {
    match position {
        PositionType::Relative => TaffyPosition::Relative,
        PositionType::Absolute => TaffyPosition::Absolute,
    }
}

fn to_taffy_display(display: Display) -> TaffyDisplay {
    match display {
        Display::Flex => TaffyDisplay::Flex,
        Display::None => TaffyDisplay::None,
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build a Taffy Style from a native node's attribute record.
pub fn to_taffy_style(style: &NodeStyle) -> Style {
    let overflow = to_taffy_overflow(style.overflow);

    Style {
        display: to_taffy_display(style.display),
        position: to_taffy_position(style.position_type),
        inset: to_taffy_rect(style.position, to_taffy_lpa),

        // Flex container properties
        flex_direction: style.flex_direction.into(),
        flex_wrap: style.flex_wrap.into(),
        justify_content: Some(style.justify_content.into()),
        align_items: to_taffy_align_items(style.align_items),
        align_content: to_taffy_align_content(style.align_content),

        // Flex item properties
        flex_grow: style.flex_grow,
        flex_shrink: style.flex_shrink,
        flex_basis: to_taffy_dimension(style.flex_basis),
        align_self: to_taffy_align_items(style.align_self),

        // Dimensions
        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        min_size: Size {
            width: to_taffy_dimension(style.min_width),
            height: to_taffy_dimension(style.min_height),
        },
        max_size: Size {
            width: to_taffy_dimension(style.max_width),
            height: to_taffy_dimension(style.max_height),
        },
        aspect_ratio: style.aspect_ratio,

        // Spacing
        margin: to_taffy_rect(style.margin, to_taffy_lpa),
        padding: to_taffy_rect(style.padding, to_taffy_lp),
        border: to_taffy_rect(style.border, to_taffy_lp),
        gap: Size {
            width: to_taffy_lp(style.column_gap),
            height: to_taffy_lp(style.row_gap),
        },

        overflow: Point {
            x: overflow,
            y: overflow,
        },

        ..Default::default()
    }
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Intrinsic size callback of a leaf node, in logical units.
///
/// Receives the dimensions the solver already knows and the space available
/// to the node; returns the content size.
pub type MeasureFunc = Rc<dyn Fn(Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32>>;

/// Taffy node context of a measured leaf.
#[derive(Clone)]
pub struct MeasureContext {
    pub func: MeasureFunc,
    pub precision: f32,
}

/// Measure function handed to Taffy: converts solver points to logical units
/// around the user callback.
pub fn measure_node(
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
    context: Option<&mut MeasureContext>,
) -> Size<f32> {
    let Some(context) = context else {
        return Size::ZERO;
    };
    let precision = context.precision;

    let to_logical = |space: AvailableSpace| match space {
        AvailableSpace::Definite(points) => AvailableSpace::Definite(points * precision),
        other => other,
    };

    let measured = (context.func)(
        Size {
            width: known_dimensions.width.map(|w| w * precision),
            height: known_dimensions.height.map(|h| h * precision),
        },
        Size {
            width: to_logical(available_space.width),
            height: to_logical(available_space.height),
        },
    );

    Size {
        width: measured.width / precision,
        height: measured.height / precision,
    }
}

// =============================================================================
// RESULT EXTRACTION
// =============================================================================

/// A node's solved geometry in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneLayout {
    /// `[[offsetX, offsetY], [width, height]]`.
    pub outer_bounds: Bounds,
    pub size: [f32; 2],
    /// Center relative to the parent's center, y up.
    pub relative_center: [f32; 2],
    pub border_inset: Inset,
    pub padding_inset: Inset,
    pub max_scroll_position: [f32; 2],
}

fn to_inset(rect: Rect<f32>, scale: f32) -> Inset {
    [rect.top * scale, rect.right * scale, rect.bottom * scale, rect.left * scale]
}

/// Convert a Taffy layout (top-left origin, y down, points, relative to the
/// parent box) into scene space.
///
/// `parent_size` is the parent's resolved size in points; a root passes its own.
/// `scale` is `pixel_size * precision`.
pub fn to_scene_layout(
    layout: &Layout,
    parent_size: Size<f32>,
    scale: f32,
    overflow: Overflow,
) -> SceneLayout {
    let width = layout.size.width;
    let height = layout.size.height;

    let center_x = layout.location.x + width * 0.5 - parent_size.width * 0.5;
    let center_y = layout.location.y + height * 0.5 - parent_size.height * 0.5;

    let size = [width * scale, height * scale];
    // scene y grows upward
    let relative_center = [center_x * scale, -center_y * scale];

    let max_scroll_position = if overflow == Overflow::Scroll {
        [
            (layout.content_size.width - width).max(0.0) * scale,
            (layout.content_size.height - height).max(0.0) * scale,
        ]
    } else {
        [0.0, 0.0]
    };

    SceneLayout {
        outer_bounds: [relative_center, size],
        size,
        relative_center,
        border_inset: to_inset(layout.border, scale),
        padding_inset: to_inset(layout.padding, scale),
        max_scroll_position,
    }
}
