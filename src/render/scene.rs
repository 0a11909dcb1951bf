//! Scene graph types: the fully-resolved, paintable output of the
//! renderer.
//!
//! A [`SceneGraph`] carries absolute positions, resolved text, and the
//! resolved QR payload with pre-encoded modules. The external
//! paint/print/PDF sink needs no knowledge of templates or guest records.
//! The whole tree derives `PartialEq` so determinism can be asserted
//! directly in tests.

use serde::{Deserialize, Serialize};

use crate::template::{FontWeight, ShapeKind, TextAlign};

/// The paintable badge: fixed canvas, background, nodes in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneGraph {
    /// Canvas width in device units (400 for the square badge).
    pub width: f32,
    /// Canvas height in device units.
    pub height: f32,
    pub background_color: String,
    #[serde(default)]
    pub background_image: Option<String>,
    /// Nodes in effective paint order, bottom to top.
    pub nodes: Vec<PaintNode>,
}

/// One positioned paint node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintNode {
    /// Id of the source element, for hit-testing and debugging overlays.
    pub element_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise about the node center.
    pub rotation: f32,
    #[serde(flatten)]
    pub content: NodeContent,
}

/// Resolved node payload, discriminated like the element set it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum NodeContent {
    Text {
        content: String,
        font_family: String,
        font_size: f32,
        font_weight: FontWeight,
        color: String,
        text_align: TextAlign,
    },
    Image {
        src: String,
    },
    Barcode {
        /// The scannable confirmation-code payload.
        payload: String,
        /// Pre-encoded QR modules so the sink needs no QR library.
        modules: QrMatrix,
    },
    Shape {
        shape: ShapeKind,
        background_color: String,
        border_color: String,
        border_width: f32,
    },
    /// The one user-visible failure: a registration with no guest data.
    Placeholder {
        message: String,
    },
}

/// A square QR module matrix in row-major order; `true` is a dark module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrMatrix {
    pub width: usize,
    pub modules: Vec<bool>,
}

impl QrMatrix {
    /// Encode a payload into modules. Encoding failures (payload too long
    /// for any QR version) yield an empty matrix rather than an error;
    /// the renderer stays total.
    pub fn encode(payload: &str) -> Self {
        match qrcode::QrCode::new(payload.as_bytes()) {
            Ok(code) => {
                let width = code.width();
                let modules = code
                    .to_colors()
                    .into_iter()
                    .map(|c| matches!(c, qrcode::Color::Dark))
                    .collect();
                Self { width, modules }
            }
            Err(_) => Self {
                width: 0,
                modules: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
