//! Element struct types for the badge template model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and persisted-blob deserialization. Field
//! names serialize in camelCase because that is how historical template
//! blobs were written.
//!
//! Each element kind implements [`ElementMeta`] to declare its display
//! label and editor default. This metadata drives the editor palette.

use serde::{Deserialize, Serialize};

/// Metadata that every element struct must provide.
///
/// The label and editor default live next to each struct definition,
/// so adding a new element kind is self-contained — implement this
/// trait and the compiler will guide you to the remaining exhaustive
/// matches in `ElementKind`.
pub trait ElementMeta: Sized {
    /// Human-readable display label (e.g. "Guest Field", "QR Code").
    fn label() -> &'static str;

    /// Sensible starter value for the editor palette.
    ///
    /// Distinct from `Default` — editor defaults have example content
    /// so new elements are immediately useful, not empty.
    fn editor_default() -> Self;
}

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// Device units per millimeter: the square badge is 100 mm and renders
/// at 400 units.
pub const UNITS_PER_MM: f32 = 4.0;

/// Fixed physical badge sizes. The canvas is never derived from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageSize {
    /// 100 × 100 mm square badge (400 × 400 device units).
    #[default]
    Square100,
    /// A6 portrait, 105 × 148 mm.
    A6,
    /// CR80 card, 54 × 86 mm.
    Cr80,
}

impl PageSize {
    /// Physical dimensions in millimeters, (width, height).
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::Square100 => (100.0, 100.0),
            PageSize::A6 => (105.0, 148.0),
            PageSize::Cr80 => (54.0, 86.0),
        }
    }

    /// Canvas size in device units, (width, height).
    pub fn canvas(self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (w * UNITS_PER_MM, h * UNITS_PER_MM)
    }
}

// ============================================================================
// TEXT STYLE
// ============================================================================

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font weight. The closed set matches what the badge printer's paint
/// sink can rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

fn default_font_family() -> String {
    "Helvetica".to_string()
}

fn default_font_size() -> f32 {
    16.0
}

fn default_color() -> String {
    "#000000".to_string()
}

/// Shared text styling for `text` and `guest_field` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: FontWeight::Normal,
            color: default_color(),
            text_align: TextAlign::Left,
        }
    }
}

// ============================================================================
// ELEMENT VARIANTS
// ============================================================================

/// Free text. `content` may contain `{token}` placeholders resolved by
/// the binder at render time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl ElementMeta for Text {
    fn label() -> &'static str {
        "Text"
    }
    fn editor_default() -> Self {
        Self {
            content: "Text".into(),
            ..Default::default()
        }
    }
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Image by reference: URL, data URI, or the `{profilePicture}` token.
/// The paint sink fetches and rasterizes; this crate only carries the
/// resolved reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub src: String,
}

impl ElementMeta for Image {
    fn label() -> &'static str {
        "Image"
    }
    fn editor_default() -> Self {
        Self {
            src: "{profilePicture}".into(),
        }
    }
}

/// QR code. The payload is opaque to the editor; when empty, the renderer
/// substitutes the registration's confirmation code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qr {
    #[serde(default)]
    pub payload: String,
}

impl ElementMeta for Qr {
    fn label() -> &'static str {
        "QR Code"
    }
    fn editor_default() -> Self {
        Self::default()
    }
}

/// Geometric primitive shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Line,
}

fn default_border_width() -> f32 {
    1.0
}

fn default_shape_fill() -> String {
    "#e0e0e0".to_string()
}

/// Filled/stroked shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default, alias = "shapeType")]
    pub shape: ShapeKind,
    #[serde(default = "default_shape_fill")]
    pub background_color: String,
    #[serde(default = "default_color")]
    pub border_color: String,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            background_color: default_shape_fill(),
            border_color: default_color(),
            border_width: default_border_width(),
        }
    }
}

impl ElementMeta for Shape {
    fn label() -> &'static str {
        "Shape"
    }
    fn editor_default() -> Self {
        Self::default()
    }
}

/// Guest attributes a `guest_field` element can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestFieldKey {
    Name,
    Company,
    JobTitle,
    Email,
    Phone,
    GuestType,
    QrCode,
}

/// Binding to one guest attribute, resolved structurally by the binder
/// instead of token substitution. Carries the same text style as [`Text`];
/// the style is ignored for the `qrCode` key (rendered as a barcode node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestField {
    pub field: GuestFieldKey,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl ElementMeta for GuestField {
    fn label() -> &'static str {
        "Guest Field"
    }
    fn editor_default() -> Self {
        Self {
            field: GuestFieldKey::Name,
            style: TextStyle {
                font_size: 24.0,
                font_weight: FontWeight::Bold,
                text_align: TextAlign::Center,
                ..Default::default()
            },
        }
    }
}

impl GuestField {
    pub fn new(field: GuestFieldKey) -> Self {
        Self {
            field,
            style: TextStyle::default(),
        }
    }
}
