//! Drawing Surface Module
//! The retained 2D vector-drawing contract the chart renderer draws onto.
//!
//! A surface holds a tree of nodes (groups, shapes and text). Each node has
//! geometry ([`Shape`]) and presentation ([`Style`]). Nodes can carry
//! pointer-enter / pointer-leave handlers and timed opacity transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 2D point in surface pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// RGB color. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const STEELBLUE: Color = Color::rgb(70, 130, 180);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Horizontal alignment of a text node relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Node geometry. Coordinates are relative to the parent group.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group {
        offset: Point,
    },
    Line {
        from: Point,
        to: Point,
    },
    Polyline {
        points: Vec<Point>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Text {
        at: Point,
        content: String,
        anchor: TextAnchor,
        /// Rotation in degrees, clockwise, around `at`.
        rotation: f64,
        font_size: f64,
    },
    /// Floating multi-line annotation (tooltips).
    Label {
        at: Point,
        lines: Vec<String>,
    },
}

impl Shape {
    pub fn text(at: Point, content: impl Into<String>, anchor: TextAnchor, font_size: f64) -> Self {
        Shape::Text {
            at,
            content: content.into(),
            anchor,
            rotation: 0.0,
            font_size,
        }
    }
}

/// Node presentation attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub class: Option<String>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    pub opacity: f32,
    pub font_family: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            class: None,
            stroke: None,
            stroke_width: 1.0,
            fill: None,
            opacity: 1.0,
            font_family: None,
        }
    }
}

impl Style {
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }
}

/// Handle to a node appended to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Enter,
    Leave,
}

/// Pointer event delivered to node handlers. `position` is in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

/// Handler bound to a node. It receives the surface so it can restyle other
/// nodes (e.g. show a tooltip).
pub type PointerHandler = Box<dyn FnMut(&mut dyn DrawingSurface, &PointerEvent)>;

/// External 2D vector-drawing capability.
pub trait DrawingSurface {
    /// Append a node under `parent` (or at the surface root).
    fn append(&mut self, parent: Option<NodeId>, shape: Shape) -> NodeId;

    fn set_shape(&mut self, node: NodeId, shape: Shape);

    fn set_style(&mut self, node: NodeId, style: Style);

    fn on_pointer(&mut self, node: NodeId, kind: PointerKind, handler: PointerHandler);

    /// Animate the node's opacity from its current value to `target`.
    fn transition_opacity(&mut self, node: NodeId, target: f32, duration: Duration);

    /// Remove every node, handler and transition.
    fn clear(&mut self);

    fn append_styled(&mut self, parent: Option<NodeId>, shape: Shape, style: Style) -> NodeId {
        let node = self.append(parent, shape);
        self.set_style(node, style);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#4682b4"), Some(Color::STEELBLUE));
        assert_eq!(Color::from_hex("#333"), Some(Color::rgb(0x33, 0x33, 0x33)));
        assert_eq!(Color::from_hex("333333"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::STEELBLUE.to_string(), "#4682b4");
    }

    #[test]
    fn test_style_builder() {
        let style = Style::default().class("data-point").fill(Color::BLACK);
        assert!(style.has_class("data-point"));
        assert!(!style.has_class("axis"));
        assert_eq!(style.fill, Some(Color::BLACK));
        assert_eq!(style.opacity, 1.0);
    }
}
