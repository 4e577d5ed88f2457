//! Property Setter Table - semantic layout properties → native node attributes.
//!
//! [`Property`] enumerates every property name the layout tree accepts. Each
//! one has a setter ([`apply`]) that validates a [`PropertyValue`], converts it
//! to solver units and writes it into a [`NodeStyle`], or resets it to the
//! factory default when the value is absent. [`read_property`] reads it back.
//!
//! Unit handling:
//! - plain numbers on length properties are logical units, divided by precision
//! - `"N%"` strings keep their magnitude and become percent lengths
//! - `"auto"` is accepted where the solver field has an auto state
//! - unit-less factors (flexGrow, flexShrink, aspectRatio) are never quantized

use crate::error::{FlexError, FlexResult};
use crate::types::{Edge, Edges, Keyword, Length, PropertyValue};

use super::node_style::NodeStyle;

// =============================================================================
// EDGE FAMILIES
// =============================================================================

/// A property group with four directional values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeFamily {
    Border,
    Margin,
    Padding,
    Position,
}

impl EdgeFamily {
    pub const ALL: [Self; 4] = [Self::Border, Self::Margin, Self::Padding, Self::Position];

    /// Name prefix shared by the four edge properties.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::Position => "position",
        }
    }

    pub const fn property(self, edge: Edge) -> Property {
        match self {
            Self::Border => Property::Border(edge),
            Self::Margin => Property::Margin(edge),
            Self::Padding => Property::Padding(edge),
            Self::Position => Property::Position(edge),
        }
    }

    fn rule(self) -> LengthRule {
        match self {
            Self::Border => LengthRule::POINTS,
            Self::Padding => LengthRule::POINTS_OR_PERCENT,
            Self::Margin | Self::Position => LengthRule::ANY,
        }
    }

    fn edges(self, style: &NodeStyle) -> &Edges<Length> {
        match self {
            Self::Border => &style.border,
            Self::Margin => &style.margin,
            Self::Padding => &style.padding,
            Self::Position => &style.position,
        }
    }

    fn edges_mut(self, style: &mut NodeStyle) -> &mut Edges<Length> {
        match self {
            Self::Border => &mut style.border,
            Self::Margin => &mut style.margin,
            Self::Padding => &mut style.padding,
            Self::Position => &mut style.position,
        }
    }
}

// =============================================================================
// PROPERTY TABLE
// =============================================================================

/// Every layout property the tree accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    // Container
    FlexDirection,
    FlexWrap,
    JustifyContent,
    AlignItems,
    AlignContent,

    // Item
    FlexGrow,
    FlexShrink,
    FlexBasis,
    AlignSelf,

    // Dimensions
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    AspectRatio,

    // Edges
    Border(Edge),
    Margin(Edge),
    Padding(Edge),
    Position(Edge),

    // Other
    Display,
    PositionType,
    Overflow,
    RowGap,
    ColumnGap,
}

impl Property {
    /// The authoritative property list.
    pub const ALL: [Self; 37] = [
        Self::AlignContent,
        Self::AlignItems,
        Self::AlignSelf,
        Self::AspectRatio,
        Self::Border(Edge::Top),
        Self::Border(Edge::Right),
        Self::Border(Edge::Bottom),
        Self::Border(Edge::Left),
        Self::ColumnGap,
        Self::Display,
        Self::FlexBasis,
        Self::FlexDirection,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::FlexWrap,
        Self::Height,
        Self::JustifyContent,
        Self::Margin(Edge::Top),
        Self::Margin(Edge::Right),
        Self::Margin(Edge::Bottom),
        Self::Margin(Edge::Left),
        Self::MaxHeight,
        Self::MaxWidth,
        Self::MinHeight,
        Self::MinWidth,
        Self::Overflow,
        Self::Padding(Edge::Top),
        Self::Padding(Edge::Right),
        Self::Padding(Edge::Bottom),
        Self::Padding(Edge::Left),
        Self::Position(Edge::Top),
        Self::Position(Edge::Right),
        Self::Position(Edge::Bottom),
        Self::Position(Edge::Left),
        Self::PositionType,
        Self::RowGap,
        Self::Width,
    ];

    /// Resolve a property name. Edge-family names are resolved by prefix and
    /// direction suffix (`"paddingLeft"` → `Padding(Left)`).
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "flexDirection" => Self::FlexDirection,
            "flexWrap" => Self::FlexWrap,
            "justifyContent" => Self::JustifyContent,
            "alignItems" => Self::AlignItems,
            "alignContent" => Self::AlignContent,
            "flexGrow" => Self::FlexGrow,
            "flexShrink" => Self::FlexShrink,
            "flexBasis" => Self::FlexBasis,
            "alignSelf" => Self::AlignSelf,
            "width" => Self::Width,
            "height" => Self::Height,
            "minWidth" => Self::MinWidth,
            "minHeight" => Self::MinHeight,
            "maxWidth" => Self::MaxWidth,
            "maxHeight" => Self::MaxHeight,
            "aspectRatio" => Self::AspectRatio,
            "display" => Self::Display,
            "positionType" => Self::PositionType,
            "overflow" => Self::Overflow,
            "rowGap" => Self::RowGap,
            "columnGap" => Self::ColumnGap,
            _ => {
                return EdgeFamily::ALL.into_iter().find_map(|family| {
                    let suffix = name.strip_prefix(family.prefix())?;
                    Edge::from_suffix(suffix).map(|edge| family.property(edge))
                });
            }
        };
        Some(property)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::FlexDirection => "flexDirection",
            Self::FlexWrap => "flexWrap",
            Self::JustifyContent => "justifyContent",
            Self::AlignItems => "alignItems",
            Self::AlignContent => "alignContent",
            Self::FlexGrow => "flexGrow",
            Self::FlexShrink => "flexShrink",
            Self::FlexBasis => "flexBasis",
            Self::AlignSelf => "alignSelf",
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "minWidth",
            Self::MinHeight => "minHeight",
            Self::MaxWidth => "maxWidth",
            Self::MaxHeight => "maxHeight",
            Self::AspectRatio => "aspectRatio",
            Self::Display => "display",
            Self::PositionType => "positionType",
            Self::Overflow => "overflow",
            Self::RowGap => "rowGap",
            Self::ColumnGap => "columnGap",
            Self::Border(edge) => match edge {
                Edge::Top => "borderTop",
                Edge::Right => "borderRight",
                Edge::Bottom => "borderBottom",
                Edge::Left => "borderLeft",
            },
            Self::Margin(edge) => match edge {
                Edge::Top => "marginTop",
                Edge::Right => "marginRight",
                Edge::Bottom => "marginBottom",
                Edge::Left => "marginLeft",
            },
            Self::Padding(edge) => match edge {
                Edge::Top => "paddingTop",
                Edge::Right => "paddingRight",
                Edge::Bottom => "paddingBottom",
                Edge::Left => "paddingLeft",
            },
            Self::Position(edge) => match edge {
                Edge::Top => "positionTop",
                Edge::Right => "positionRight",
                Edge::Bottom => "positionBottom",
                Edge::Left => "positionLeft",
            },
        }
    }

    /// The edge family and direction of an edge property.
    pub const fn edge(self) -> Option<(EdgeFamily, Edge)> {
        match self {
            Self::Border(edge) => Some((EdgeFamily::Border, edge)),
            Self::Margin(edge) => Some((EdgeFamily::Margin, edge)),
            Self::Padding(edge) => Some((EdgeFamily::Padding, edge)),
            Self::Position(edge) => Some((EdgeFamily::Position, edge)),
            _ => None,
        }
    }

    /// Allowed keywords of an enumerated property.
    pub fn keywords(self) -> Option<&'static [&'static str]> {
        use crate::types as t;

        match self {
            Self::AlignItems | Self::AlignContent | Self::AlignSelf => Some(t::Align::KEYWORDS),
            Self::JustifyContent => Some(t::JustifyContent::KEYWORDS),
            Self::FlexDirection => Some(t::FlexDirection::KEYWORDS),
            Self::FlexWrap => Some(t::FlexWrap::KEYWORDS),
            Self::Overflow => Some(t::Overflow::KEYWORDS),
            Self::PositionType => Some(t::PositionType::KEYWORDS),
            Self::Display => Some(t::Display::KEYWORDS),
            _ => None,
        }
    }
}

// =============================================================================
// VALUE CONVERSION
// =============================================================================

/// Which length forms a property accepts.
#[derive(Debug, Clone, Copy)]
struct LengthRule {
    auto: bool,
    percent: bool,
}

impl LengthRule {
    const POINTS: Self = Self {
        auto: false,
        percent: false,
    };
    const POINTS_OR_PERCENT: Self = Self {
        auto: false,
        percent: true,
    };
    const ANY: Self = Self {
        auto: true,
        percent: true,
    };
}

fn keyword_or<K: Keyword>(value: Option<&PropertyValue>, default: K) -> FlexResult<K> {
    let Some(value) = value else {
        return Ok(default);
    };
    value
        .as_str()
        .and_then(K::from_keyword)
        .ok_or_else(|| FlexError::invalid_keyword(value, K::KEYWORDS))
}

fn length_or(
    property: Property,
    value: Option<&PropertyValue>,
    precision: f32,
    rule: LengthRule,
    default: Length,
) -> FlexResult<Length> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value {
        PropertyValue::Number(n) if n.is_finite() => Ok(Length::Points(n / precision)),
        PropertyValue::Text(text) => {
            if rule.percent {
                if let Some(percent) = value.as_percent() {
                    return Ok(Length::Percent(percent));
                }
            }
            if rule.auto && text.trim() == "auto" {
                return Ok(Length::Auto);
            }
            Err(FlexError::invalid_value(property.name(), value))
        }
        PropertyValue::Number(_) => Err(FlexError::invalid_value(property.name(), value)),
    }
}

fn number_or(property: Property, value: Option<&PropertyValue>, default: f32) -> FlexResult<f32> {
    let Some(value) = value else {
        return Ok(default);
    };
    value
        .as_number()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FlexError::invalid_value(property.name(), value))
}

// =============================================================================
// SETTER / GETTER
// =============================================================================

/// Apply `value` to `property` of a native node, or reset it when `None`.
///
/// `precision` is the logical size of one solver point.
pub fn apply(
    property: Property,
    style: &mut NodeStyle,
    precision: f32,
    value: Option<&PropertyValue>,
) -> FlexResult<()> {
    let defaults = NodeStyle::default();
    let length = |rule: LengthRule, default: Length| length_or(property, value, precision, rule, default);

    match property {
        Property::FlexDirection => style.flex_direction = keyword_or(value, defaults.flex_direction)?,
        Property::FlexWrap => style.flex_wrap = keyword_or(value, defaults.flex_wrap)?,
        Property::JustifyContent => {
            style.justify_content = keyword_or(value, defaults.justify_content)?;
        }
        Property::AlignItems => style.align_items = keyword_or(value, defaults.align_items)?,
        Property::AlignContent => style.align_content = keyword_or(value, defaults.align_content)?,
        Property::AlignSelf => style.align_self = keyword_or(value, defaults.align_self)?,
        Property::Display => style.display = keyword_or(value, defaults.display)?,
        Property::PositionType => style.position_type = keyword_or(value, defaults.position_type)?,
        Property::Overflow => style.overflow = keyword_or(value, defaults.overflow)?,

        Property::FlexGrow => style.flex_grow = number_or(property, value, defaults.flex_grow)?,
        Property::FlexShrink => style.flex_shrink = number_or(property, value, defaults.flex_shrink)?,
        Property::AspectRatio => {
            style.aspect_ratio = match value {
                Some(_) => Some(number_or(property, value, 0.0)?),
                None => defaults.aspect_ratio,
            };
        }

        Property::FlexBasis => style.flex_basis = length(LengthRule::ANY, defaults.flex_basis)?,
        Property::Width => style.width = length(LengthRule::ANY, defaults.width)?,
        Property::Height => style.height = length(LengthRule::ANY, defaults.height)?,
        Property::MinWidth => style.min_width = length(LengthRule::ANY, defaults.min_width)?,
        Property::MinHeight => style.min_height = length(LengthRule::ANY, defaults.min_height)?,
        Property::MaxWidth => style.max_width = length(LengthRule::ANY, defaults.max_width)?,
        Property::MaxHeight => style.max_height = length(LengthRule::ANY, defaults.max_height)?,
        Property::RowGap => style.row_gap = length(LengthRule::POINTS_OR_PERCENT, defaults.row_gap)?,
        Property::ColumnGap => {
            style.column_gap = length(LengthRule::POINTS_OR_PERCENT, defaults.column_gap)?;
        }

        Property::Border(edge) => apply_edge(EdgeFamily::Border, edge, style, &length)?,
        Property::Margin(edge) => apply_edge(EdgeFamily::Margin, edge, style, &length)?,
        Property::Padding(edge) => apply_edge(EdgeFamily::Padding, edge, style, &length)?,
        Property::Position(edge) => apply_edge(EdgeFamily::Position, edge, style, &length)?,
    }

    tracing::trace!(property = property.name(), value = ?value, "applied layout property");
    Ok(())
}

/// Write one edge, leaving the other three untouched.
fn apply_edge(
    family: EdgeFamily,
    edge: Edge,
    style: &mut NodeStyle,
    length: &impl Fn(LengthRule, Length) -> FlexResult<Length>,
) -> FlexResult<()> {
    let default = family.edges(&NodeStyle::default()).get(edge);
    let resolved = length(family.rule(), default)?;
    family.edges_mut(style).set(edge, resolved);
    Ok(())
}

/// Apply a property by name. Unknown names fail with [`FlexError::UnknownProperty`].
pub fn setter(
    name: &str,
    style: &mut NodeStyle,
    precision: f32,
    value: Option<&PropertyValue>,
) -> FlexResult<()> {
    let property =
        Property::from_name(name).ok_or_else(|| FlexError::UnknownProperty(name.to_string()))?;
    apply(property, style, precision, value)
}

/// Read the applied value of `property` back from a native node, in solver units.
///
/// Returns `None` only for an unset aspect ratio.
pub fn read_property(property: Property, style: &NodeStyle) -> Option<PropertyValue> {
    let keyword = |k: &'static str| Some(PropertyValue::from(k));

    match property {
        Property::FlexDirection => keyword(style.flex_direction.keyword()),
        Property::FlexWrap => keyword(style.flex_wrap.keyword()),
        Property::JustifyContent => keyword(style.justify_content.keyword()),
        Property::AlignItems => keyword(style.align_items.keyword()),
        Property::AlignContent => keyword(style.align_content.keyword()),
        Property::AlignSelf => keyword(style.align_self.keyword()),
        Property::Display => keyword(style.display.keyword()),
        Property::PositionType => keyword(style.position_type.keyword()),
        Property::Overflow => keyword(style.overflow.keyword()),
        Property::FlexGrow => Some(PropertyValue::Number(style.flex_grow)),
        Property::FlexShrink => Some(PropertyValue::Number(style.flex_shrink)),
        Property::AspectRatio => style.aspect_ratio.map(PropertyValue::Number),
        Property::FlexBasis => Some(style.flex_basis.to_value()),
        Property::Width => Some(style.width.to_value()),
        Property::Height => Some(style.height.to_value()),
        Property::MinWidth => Some(style.min_width.to_value()),
        Property::MinHeight => Some(style.min_height.to_value()),
        Property::MaxWidth => Some(style.max_width.to_value()),
        Property::MaxHeight => Some(style.max_height.to_value()),
        Property::RowGap => Some(style.row_gap.to_value()),
        Property::ColumnGap => Some(style.column_gap.to_value()),
        Property::Border(_) | Property::Margin(_) | Property::Padding(_) | Property::Position(_) => {
            let (family, edge) = property.edge()?;
            Some(family.edges(style).get(edge).to_value())
        }
    }
}
