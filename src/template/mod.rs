//! # Badge Template Model
//!
//! A single type hierarchy that is both the Rust API and the persisted
//! JSON shape. [`Template`] is constructible in Rust and deserializable
//! from stored blobs.
//!
//! ```ignore
//! use gafete::template::*;
//!
//! // Rust construction
//! let mut template = Template::new("evt-1", "Standard badge");
//! template.elements.push(Element::with_defaults(ElementKind::Text(Text::new("Hi"))));
//!
//! // Blob deserialization (both historical shapes)
//! let elements = parse_elements(&serde_json::json!([{ "type": "qr" }]))?;
//! let elements = parse_elements(&serde_json::json!({"elements": [{ "type": "qr" }]}))?;
//! ```
//!
//! Templates are immutable-by-replacement: the editor clones, mutates the
//! clone, and swaps it in. That is what makes undo/redo plain value
//! history instead of inverse-operation replay.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::{Violation, validate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GafeteError;

fn default_true() -> bool {
    true
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_template_name() -> String {
    "Badge".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

// ============================================================================
// ELEMENT
// ============================================================================

/// One positioned graphic primitive. Common geometry lives here; the
/// variant payload is flattened alongside under a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Opaque id, stable for the document's lifetime.
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Degrees, kept in [0, 360).
    #[serde(default)]
    pub rotation: f32,
    /// Paint-order override. Ties break by sequence order (stable sort).
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// A syntactically valid default element for a kind: non-zero size,
    /// in-bounds position, editor-default payload.
    pub fn with_defaults(kind: ElementKind) -> Self {
        let (width, height) = match &kind {
            ElementKind::Text(_) => (160.0, 40.0),
            ElementKind::Image(_) => (120.0, 120.0),
            ElementKind::Qr(_) => (100.0, 100.0),
            ElementKind::Shape(_) => (120.0, 80.0),
            ElementKind::GuestField(_) => (320.0, 40.0),
        };
        Self {
            id: new_id(),
            x: 20.0,
            y: 20.0,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            visible: true,
            kind,
        }
    }

    /// Clone with a fresh id, offset so the copy is visibly distinct.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy.x += 20.0;
        copy.y += 20.0;
        copy
    }
}

/// Define the ElementKind enum and all dispatch methods from a single list.
///
/// Adding a new element kind: add one line here, then define the struct in
/// `types.rs` with `impl ElementMeta`. The compiler walks you through the
/// remaining exhaustive matches in the renderer and editor.
macro_rules! define_elements {
    ($($variant:ident($inner:ty)),+ $(,)?) => {
        /// The closed element variant set.
        ///
        /// `#[serde(tag = "type")]` yields blobs like
        /// `{"type": "guestField", "field": "name", ...}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", rename_all = "camelCase")]
        pub enum ElementKind {
            $($variant($inner),)+
        }

        impl ElementKind {
            /// Human-readable display label (from [`ElementMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(ElementKind::$variant(_) => <$inner>::label(),)+ }
            }

            /// Editor defaults for every element kind (from
            /// [`ElementMeta::editor_default`]). Single source of truth —
            /// [`element_types`] and [`default_element`] both derive from it.
            pub fn all_editor_defaults() -> Vec<Self> {
                vec![$(ElementKind::$variant(<$inner>::editor_default()),)+]
            }
        }
    };
}

define_elements! {
    Text(Text),
    Image(Image),
    Qr(Qr),
    Shape(Shape),
    GuestField(GuestField),
}

/// Element kind metadata for the editor palette.
#[derive(Debug, Clone, Serialize)]
pub struct ElementTypeMeta {
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
}

/// Extract the serde type tag from an ElementKind (the `"type"` field).
fn serde_type_name(kind: &ElementKind) -> String {
    serde_json::to_value(kind).unwrap()["type"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Element kind metadata for the editor palette.
///
/// Type names come from serde serialization, labels from
/// [`ElementKind::label`] — both exhaustive over the enum, so the compiler
/// catches new variants.
pub fn element_types() -> Vec<ElementTypeMeta> {
    ElementKind::all_editor_defaults()
        .iter()
        .map(|k| ElementTypeMeta {
            type_name: serde_type_name(k),
            label: k.label().to_string(),
        })
        .collect()
}

/// Create a full element with editor defaults by type name.
/// Returns `None` for unknown type names.
pub fn default_element(type_name: &str) -> Option<Element> {
    ElementKind::all_editor_defaults()
        .into_iter()
        .find(|k| serde_type_name(k) == type_name)
        .map(Element::with_defaults)
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// Draft vs published. Publishing is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Official,
}

/// Standard layouts apply length-driven font sizing to the name, company,
/// and job-title guest fields; custom layouts honor the element's explicit
/// `fontSize` verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutFlavor {
    Standard,
    #[default]
    Custom,
}

/// The badge document: page geometry, background, ordered elements.
///
/// Element order has no layout meaning (positions are absolute) but is the
/// default paint order; `zIndex` overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default = "default_template_name")]
    pub name: String,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub layout: LayoutFlavor,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default)]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    /// New empty custom template for an event.
    pub fn new(event_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            event_id: event_id.into(),
            name: name.into(),
            page_size: PageSize::default(),
            background_color: default_background(),
            background_image: None,
            layout: LayoutFlavor::Custom,
            status: TemplateStatus::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
            elements: Vec::new(),
        }
    }

    /// The synthesized default badge: the standard guest-field layout the
    /// editor falls back to when neither the remote store nor the cache
    /// has anything for an event.
    pub fn default_badge(event_id: impl Into<String>) -> Self {
        let mut t = Self::new(event_id, "Default badge");
        t.layout = LayoutFlavor::Standard;

        let mut name = Element::with_defaults(ElementKind::GuestField(GuestField {
            field: GuestFieldKey::Name,
            style: TextStyle {
                font_size: 32.0,
                font_weight: FontWeight::Bold,
                text_align: TextAlign::Center,
                ..Default::default()
            },
        }));
        name.x = 40.0;
        name.y = 110.0;
        name.width = 320.0;
        name.height = 60.0;

        let mut job = Element::with_defaults(ElementKind::GuestField(GuestField {
            field: GuestFieldKey::JobTitle,
            style: TextStyle {
                font_size: 16.0,
                color: "#555555".into(),
                text_align: TextAlign::Center,
                ..Default::default()
            },
        }));
        job.x = 40.0;
        job.y = 175.0;
        job.width = 320.0;
        job.height = 30.0;
        job.z_index = 1;

        let mut company = Element::with_defaults(ElementKind::GuestField(GuestField {
            field: GuestFieldKey::Company,
            style: TextStyle {
                font_size: 18.0,
                text_align: TextAlign::Center,
                ..Default::default()
            },
        }));
        company.x = 40.0;
        company.y = 210.0;
        company.width = 320.0;
        company.height = 30.0;
        company.z_index = 2;

        let mut qr = Element::with_defaults(ElementKind::GuestField(GuestField {
            field: GuestFieldKey::QrCode,
            style: TextStyle::default(),
        }));
        qr.x = 150.0;
        qr.y = 260.0;
        qr.width = 100.0;
        qr.height = 100.0;
        qr.z_index = 3;

        t.elements = vec![name, job, company, qr];
        t
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Mutable lookup by id.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Indices of `elements` in effective paint order: stable sort by
    /// `z_index`, ties keep sequence order.
    pub fn paint_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| self.elements[i].z_index);
        order
    }
}

// ============================================================================
// BLOB TOLERANCE
// ============================================================================

/// Parse the `template_json` blob's element list.
///
/// Historical rows stored either the raw element array or the full
/// `{"elements": [...]}` document — both are accepted.
pub fn parse_elements(blob: &serde_json::Value) -> Result<Vec<Element>, GafeteError> {
    let array = match blob {
        serde_json::Value::Array(_) => blob.clone(),
        serde_json::Value::Object(map) => map
            .get("elements")
            .cloned()
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        other => {
            return Err(GafeteError::InvalidTemplate(format!(
                "template_json must be an array or object, got {}",
                other
            )));
        }
    };
    serde_json::from_value(array)
        .map_err(|e| GafeteError::InvalidTemplate(format!("bad element list: {}", e)))
}

/// Decode a full template from a stored blob, tolerating both shapes.
///
/// A bare element array becomes a template with default metadata for the
/// given event; a full object is deserialized directly (missing fields
/// fall back to defaults).
pub fn template_from_blob(
    event_id: &str,
    blob: &serde_json::Value,
) -> Result<Template, GafeteError> {
    match blob {
        serde_json::Value::Array(_) => {
            let mut t = Template::new(event_id, default_template_name());
            t.elements = parse_elements(blob)?;
            Ok(t)
        }
        serde_json::Value::Object(_) => {
            let mut t: Template = serde_json::from_value(blob.clone())
                .map_err(|e| GafeteError::InvalidTemplate(format!("bad template blob: {}", e)))?;
            if t.event_id.is_empty() {
                t.event_id = event_id.to_string();
            }
            Ok(t)
        }
        other => Err(GafeteError::InvalidTemplate(format!(
            "template_json must be an array or object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_round_trip() {
        let el = Element::with_defaults(ElementKind::Text(Text::new("hi")));
        let v = serde_json::to_value(&el).unwrap();
        assert_eq!(v["type"], "text");
        assert_eq!(v["content"], "hi");
        let back: Element = serde_json::from_value(v).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_guest_field_tag() {
        let el = Element::with_defaults(ElementKind::GuestField(GuestField::new(
            GuestFieldKey::QrCode,
        )));
        let v = serde_json::to_value(&el).unwrap();
        assert_eq!(v["type"], "guestField");
        assert_eq!(v["field"], "qrCode");
    }

    #[test]
    fn test_parse_elements_raw_array() {
        let blob = json!([
            {"type": "text", "content": "hello"},
            {"type": "qr"}
        ]);
        let els = parse_elements(&blob).unwrap();
        assert_eq!(els.len(), 2);
        assert!(matches!(els[0].kind, ElementKind::Text(_)));
    }

    #[test]
    fn test_parse_elements_wrapped() {
        let blob = json!({"elements": [{"type": "image", "src": "x.png"}]});
        let els = parse_elements(&blob).unwrap();
        assert_eq!(els.len(), 1);
    }

    #[test]
    fn test_parse_elements_rejects_scalar() {
        assert!(parse_elements(&json!(42)).is_err());
    }

    #[test]
    fn test_template_from_bare_array() {
        let t = template_from_blob("evt-1", &json!([{"type": "shape"}])).unwrap();
        assert_eq!(t.event_id, "evt-1");
        assert_eq!(t.elements.len(), 1);
    }

    #[test]
    fn test_paint_order_stable_on_ties() {
        let mut t = Template::new("e", "t");
        for i in 0..3 {
            let mut el = Element::with_defaults(ElementKind::Qr(Qr::default()));
            el.id = format!("el-{}", i);
            el.z_index = 0;
            t.elements.push(el);
        }
        assert_eq!(t.paint_order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_paint_order_z_override() {
        let mut t = Template::new("e", "t");
        for (i, z) in [5, 1, 3].iter().enumerate() {
            let mut el = Element::with_defaults(ElementKind::Qr(Qr::default()));
            el.id = format!("el-{}", i);
            el.z_index = *z;
            t.elements.push(el);
        }
        assert_eq!(t.paint_order(), vec![1, 2, 0]);
    }

    #[test]
    fn test_default_badge_layout() {
        let t = Template::default_badge("evt-7");
        assert_eq!(t.layout, LayoutFlavor::Standard);
        assert_eq!(t.elements.len(), 4);
        assert!(t.elements.iter().all(|e| e.visible));
    }

    #[test]
    fn test_element_types_complete() {
        let types = element_types();
        let defaults = ElementKind::all_editor_defaults();
        assert_eq!(types.len(), defaults.len());

        let mut seen = std::collections::HashSet::new();
        for meta in &types {
            assert!(
                seen.insert(meta.type_name.clone()),
                "Duplicate type: {}",
                meta.type_name
            );
            let el = default_element(&meta.type_name);
            assert!(el.is_some(), "No default for type: {}", meta.type_name);
        }
        assert!(default_element("polygon").is_none());
    }
}
