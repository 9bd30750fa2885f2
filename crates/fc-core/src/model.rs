//! Core data model for FC canvases.
//!
//! An [`Element`] is a positioned, rotatable text or image unit with a depth
//! value that decides stacking. Elements carry an opaque [`ElementId`]; the
//! scene that owns them keeps them in insertion order, which is unrelated to
//! depth. Coordinates and rotation are unbounded: elements may be dragged
//! off-canvas and spun past 360° without normalization.

use crate::id::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

// ─── Kind ────────────────────────────────────────────────────────────────

/// File extensions that make a content string an image locator.
pub const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// The element kinds a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
}

impl ElementKind {
    /// Classify content the way imports do: `Image` iff the content ends in a
    /// known image extension (ASCII case-insensitive), `Text` otherwise.
    ///
    /// This is lossy for text that happens to end in `.png` and friends; such
    /// text comes back as an image after a text round trip.
    pub fn infer(content: &str) -> Self {
        if has_image_extension(content) {
            Self::Image
        } else {
            Self::Text
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// True when `locator` ends in `.jpg`, `.jpeg`, `.png` or `.gif`.
pub fn has_image_extension(locator: &str) -> bool {
    let bytes = locator.as_bytes();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        bytes.len() >= ext.len() && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext.as_bytes())
    })
}

// ─── Size ────────────────────────────────────────────────────────────────

/// Explicit display size. Width and height travel together, so an element
/// either has both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── Box metrics ─────────────────────────────────────────────────────────

/// Approximate on-screen measurements used for hit testing and link
/// geometry. The canvas never measures real glyphs; these estimates stand in
/// for the rendered box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    /// Advance width of one character of text content.
    pub char_width: f64,
    /// Height of one line of text content.
    pub line_height: f64,
    /// Padding around text content on every side.
    pub padding: f64,
    /// Box used for images that carry no explicit size.
    pub fallback_image: Size,
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding: 5.0,
            fallback_image: Size::new(100.0, 100.0),
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// A single visual unit on the canvas.
#[derive(Debug, Clone)]
pub struct Element {
    /// Stable identity; never serialized.
    pub id: ElementId,
    pub kind: ElementKind,
    /// Literal text, or the image source locator.
    pub content: String,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    /// Degrees, unbounded.
    pub rotation: f64,
    /// Only meaningful for images.
    pub size: Option<Size>,
    /// Stacking order; higher paints on top.
    pub depth: i64,
}

impl Element {
    /// Create an element with a freshly minted ID, zero rotation, no size
    /// and depth 0.
    pub fn new(kind: ElementKind, content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: ElementId::mint(kind),
            kind,
            content: content.into(),
            x,
            y,
            rotation: 0.0,
            size: None,
            depth: 0,
        }
    }

    pub fn text(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(ElementKind::Text, content, x, y)
    }

    pub fn image(locator: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(ElementKind::Image, locator, x, y)
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: i64) -> Self {
        self.depth = depth;
        self
    }

    pub fn width(&self) -> Option<f64> {
        self.size.map(|s| s.width)
    }

    pub fn height(&self) -> Option<f64> {
        self.size.map(|s| s.height)
    }

    /// Drag target: overwrite the position, no clamping.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Additive rotation; the angle is never wrapped into `[0, 360)`.
    pub fn rotate_by(&mut self, delta_degrees: f64) {
        self.rotation += delta_degrees;
    }

    pub fn set_depth(&mut self, depth: i64) {
        self.depth = depth;
    }

    /// Layer up by one step. Collisions with other depths are left alone.
    pub fn raise(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Layer down by one step.
    pub fn lower(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Replace the text after an edit session. Returns `false` (and changes
    /// nothing) for images, whose content is a locator rather than text.
    pub fn set_content(&mut self, text: impl Into<String>) -> bool {
        if self.kind != ElementKind::Text {
            return false;
        }
        self.content = text.into();
        true
    }

    /// Approximate bounding box at zero rotation.
    pub fn bounds(&self, metrics: &BoxMetrics) -> Rect {
        let (w, h) = match (self.kind, self.size) {
            (_, Some(size)) => (size.width, size.height),
            (ElementKind::Image, None) => (metrics.fallback_image.width, metrics.fallback_image.height),
            (ElementKind::Text, None) => {
                let lines = self.content.split('\n');
                let (count, widest) = lines.fold((0usize, 0usize), |(n, w), line| {
                    (n + 1, w.max(line.chars().count()))
                });
                (
                    widest as f64 * metrics.char_width + 2.0 * metrics.padding,
                    count as f64 * metrics.line_height + 2.0 * metrics.padding,
                )
            }
        };
        Rect::from_origin_size((self.x, self.y), (w, h))
    }

    pub fn center(&self, metrics: &BoxMetrics) -> Point {
        self.bounds(metrics).center()
    }
}
