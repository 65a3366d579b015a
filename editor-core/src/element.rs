//! Design elements - the building blocks of a scene.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment within the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned (default).
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
    /// Justified. Renderers treat this as left-aligned; SVG has no
    /// native justification.
    Justify,
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::Left
    }
}

/// Case transformation applied to text content at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Render content as-is (default).
    None,
    /// ALL CAPS.
    Uppercase,
    /// all lowercase.
    Lowercase,
    /// First Letter Of Each Word.
    Capitalize,
}

impl Default for TextTransform {
    fn default() -> Self {
        Self::None
    }
}

/// How an image bitmap fills its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    /// Scale to cover the box, cropping overflow (default).
    Cover,
    /// Scale to fit entirely inside the box.
    Contain,
    /// Stretch to the box dimensions, ignoring aspect ratio.
    Fill,
    /// Place at natural size, cropped to the box.
    None,
}

impl Default for ObjectFit {
    fn default() -> Self {
        Self::Cover
    }
}

/// Geometric primitive rendered by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle, optionally with rounded corners.
    Rectangle,
    /// Circle inscribed in the element box.
    Circle,
    /// Isoceles triangle pointing up, filling the element box.
    Triangle,
}

/// Outline style for shape strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Continuous line (default).
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::Solid
    }
}

/// Drop shadow cast by a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Horizontal offset in design units.
    pub offset_x: f32,
    /// Vertical offset in design units.
    pub offset_y: f32,
    /// Blur radius in design units.
    pub blur: f32,
    /// Shadow color as hex.
    pub color: String,
}

fn default_font_size() -> f32 {
    16.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_weight() -> u16 {
    400
}

fn default_line_height() -> f32 {
    1.2
}

fn default_filter_percent() -> f32 {
    100.0
}

/// The content a design element carries.
///
/// Each variant owns only the fields that make sense for it, so a text
/// element cannot accidentally carry a stroke and a shape cannot carry a
/// font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A block of text.
    Text {
        /// Text content; newlines split it into rendered lines.
        content: String,
        /// Font size in design units.
        #[serde(default = "default_font_size")]
        font_size: f32,
        /// Font family name.
        #[serde(default = "default_font_family")]
        font_family: String,
        /// Numeric font weight (400 = normal, 700 = bold).
        #[serde(default = "default_font_weight")]
        font_weight: u16,
        /// Text color as hex.
        color: String,
        /// Horizontal alignment.
        #[serde(default)]
        text_align: TextAlign,
        /// Line height as a multiple of the font size.
        #[serde(default = "default_line_height")]
        line_height: f32,
        /// Additional spacing between characters, in design units.
        #[serde(default)]
        letter_spacing: f32,
        /// Case transformation applied at render time.
        #[serde(default)]
        text_transform: TextTransform,
        /// Optional fill behind the text box, as hex.
        #[serde(default)]
        background_color: Option<String>,
    },

    /// A bitmap image.
    Image {
        /// Source URI or base64 data URI.
        src: String,
        /// Brightness in percent (100 = unchanged, range 0-200).
        #[serde(default = "default_filter_percent")]
        brightness: f32,
        /// Contrast in percent (100 = unchanged, range 0-200).
        #[serde(default = "default_filter_percent")]
        contrast: f32,
        /// Saturation in percent (100 = unchanged, range 0-200).
        #[serde(default = "default_filter_percent")]
        saturation: f32,
        /// Gaussian blur radius in design units.
        #[serde(default)]
        blur: f32,
        /// How the bitmap fills the element box.
        #[serde(default)]
        object_fit: ObjectFit,
    },

    /// A vector shape primitive.
    Shape {
        /// Which primitive to render.
        shape: ShapeKind,
        /// Fill color as hex.
        fill: String,
        /// Optional outline color as hex.
        #[serde(default)]
        stroke: Option<String>,
        /// Outline width in design units.
        #[serde(default)]
        stroke_width: f32,
        /// Outline dash pattern.
        #[serde(default)]
        stroke_style: StrokeStyle,
        /// Corner radius in design units (rectangles only).
        #[serde(default)]
        border_radius: f32,
        /// Optional drop shadow.
        #[serde(default)]
        shadow: Option<Shadow>,
    },
}

/// Position, size, and paint order of an element.
///
/// Coordinates are design units (CSS px at 1x zoom), origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position of the top-left corner.
    pub x: f32,
    /// Y position of the top-left corner.
    pub y: f32,
    /// Width in design units (non-negative; enforced at the UI boundary).
    pub width: f32,
    /// Height in design units (non-negative; enforced at the UI boundary).
    pub height: f32,
    /// Rotation in degrees, about the box center.
    pub rotation: f32,
    /// Paint order key; higher paints on top. Ties break by insertion order.
    pub z_index: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            z_index: 0,
        }
    }
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A design element with content, placement, and layer attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Position, size, rotation, and paint order.
    pub transform: Transform,
    /// Opacity in 0..=1.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Whether the element is rendered at all.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Whether the element is protected from UI edits.
    #[serde(default)]
    pub locked: bool,
    /// Optional display label shown in the layer panel.
    #[serde(default)]
    pub name: Option<String>,
}

impl Element {
    /// Create a new element with the given kind and default placement.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            opacity: 1.0,
            visible: true,
            locked: false,
            name: None,
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Check if a point (in canvas coordinates) is within this element's box.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let t = &self.transform;
        x >= t.x && x <= t.x + t.width && y >= t.y && y <= t.y + t.height
    }
}
