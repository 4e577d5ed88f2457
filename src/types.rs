//! Core types for spark-flex.
//!
//! Property values as callers write them, the typed keyword enums the setter
//! table validates against, and the geometry tuples the output signals carry.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Property values
// =============================================================================

/// A value written into a node's pending property map.
///
/// Numbers are logical scene units (or unit-less factors such as `flexGrow`).
/// Text carries keywords (`"row"`, `"auto"`) and percentages (`"50%"`).
///
/// # Examples
///
/// ```
/// use spark_flex::types::PropertyValue;
///
/// let width = PropertyValue::from(0.5);
/// let half = PropertyValue::from("50%");
/// assert_eq!(half.as_percent(), Some(50.0));
/// assert_eq!(width.as_number(), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f32),
    Text(String),
}

impl PropertyValue {
    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    /// Magnitude of a percentage string (`"50%"` → `50.0`).
    pub fn as_percent(&self) -> Option<f32> {
        let digits = self.as_str()?.trim().strip_suffix('%')?;
        digits.trim().parse::<f32>().ok().filter(|p| p.is_finite())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value as f32)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f32)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// =============================================================================
// Length - solver-unit dimension
// =============================================================================

/// A length as stored on a native node, in solver units.
///
/// - `Auto`: content-determined
/// - `Points(n)`: absolute, already divided by precision
/// - `Percent(n)`: percentage of the parent (0-100), never quantized
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    #[default]
    Auto,
    Points(f32),
    Percent(f32),
}

impl Length {
    /// Zero points, the default for spacing edges.
    pub const ZERO: Self = Self::Points(0.0);

    /// Read back as a property value (`Number(points)`, `"50%"` or `"auto"`).
    pub fn to_value(self) -> PropertyValue {
        match self {
            Self::Auto => PropertyValue::from("auto"),
            Self::Points(n) => PropertyValue::Number(n),
            Self::Percent(p) => PropertyValue::Text(format!("{p}%")),
        }
    }
}

// =============================================================================
// Edges
// =============================================================================

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Property-name suffix for this edge (`"Top"`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Right => "Right",
            Self::Bottom => "Bottom",
            Self::Left => "Left",
        }
    }

    /// Resolve a property-name suffix to an edge.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.suffix() == suffix)
    }
}

/// Four values indexed by [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Edges<T> {
    /// Same value on every edge.
    pub const fn uniform(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn get(&self, edge: Edge) -> T {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn set(&mut self, edge: Edge, value: T) {
        match edge {
            Edge::Top => self.top = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
            Edge::Left => self.left = value,
        }
    }
}

// =============================================================================
// Keyword enums - enumerated layout properties
// =============================================================================

/// An enumerated property value with a fixed allowed-string list.
pub trait Keyword: Copy + Sized + 'static {
    /// Every accepted keyword, in declaration order.
    const KEYWORDS: &'static [&'static str];

    fn from_keyword(keyword: &str) -> Option<Self>;

    fn keyword(self) -> &'static str;
}

/// Declares a keyword enum with its fixed allowed-string list.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident { $($variant:ident => $keyword:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("`", $keyword, "`")]
                $variant,
            )+
        }

        impl Keyword for $name {
            const KEYWORDS: &'static [&'static str] = &[$($keyword),+];

            fn from_keyword(keyword: &str) -> Option<Self> {
                match keyword {
                    $($keyword => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn keyword(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

keyword_enum! {
    /// Shared keyword set of alignContent, alignItems and alignSelf.
    Align default Auto {
        Auto => "auto",
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        Stretch => "stretch",
        Baseline => "baseline",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
    }
}

keyword_enum! {
    /// Justify content (main axis distribution).
    JustifyContent default FlexStart {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
        SpaceEvenly => "space-evenly",
    }
}

keyword_enum! {
    /// Flex direction. Column is the solver's factory default.
    FlexDirection default Column {
        Column => "column",
        ColumnReverse => "column-reverse",
        Row => "row",
        RowReverse => "row-reverse",
    }
}

keyword_enum! {
    /// Flex wrap behavior.
    FlexWrap default NoWrap {
        NoWrap => "no-wrap",
        Wrap => "wrap",
        WrapReverse => "wrap-reverse",
    }
}

keyword_enum! {
    /// Overflow behavior on both axes.
    Overflow default Visible {
        Visible => "visible",
        Hidden => "hidden",
        Scroll => "scroll",
    }
}

keyword_enum! {
    /// Positioning scheme.
    PositionType default Relative {
        Relative => "relative",
        Absolute => "absolute",
    }
}

keyword_enum! {
    /// Whether the node takes part in layout.
    Display default Flex {
        Flex => "flex",
        None => "none",
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// `[[offsetX, offsetY], [width, height]]` in scene units.
///
/// The offset is the node's center relative to its parent's center, y up.
pub type Bounds = [[f32; 2]; 2];

/// Bounds of a node that was never solved.
pub const ZERO_BOUNDS: Bounds = [[0.0, 0.0], [0.0, 0.0]];

/// Per-edge insets `[top, right, bottom, left]` in scene units.
pub type Inset = [f32; 4];
