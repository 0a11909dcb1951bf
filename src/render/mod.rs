//! # Layout Renderer
//!
//! Pure mapping from (template, registration) to a paintable
//! [`SceneGraph`]. No hidden state, no I/O, no clock: the same inputs
//! yield an identical scene whether called from the editor preview, the
//! bulk print path, or the export path.

pub mod autosize;
pub mod scene;

pub use scene::{NodeContent, PaintNode, QrMatrix, SceneGraph};

use rayon::prelude::*;

use crate::binder::{confirmation_code, resolve_field, resolve_tokens};
use crate::guest::Registration;
use crate::template::{
    Element, ElementKind, GuestFieldKey, LayoutFlavor, Template, TextStyle,
};

/// Message shown on the placeholder badge for a registration without
/// guest data.
pub const INVALID_GUEST_MESSAGE: &str = "Invalid attendee data";

/// Render a template against one registration.
///
/// Invisible elements are skipped; the rest paint in stable z-order.
/// A registration with no guest payload renders the explicit invalid
/// placeholder instead of an empty badge.
pub fn render(template: &Template, reg: &Registration) -> SceneGraph {
    if reg.guest.is_none() {
        return render_invalid(template);
    }

    let (width, height) = template.page_size.canvas();
    let mut nodes = Vec::with_capacity(template.elements.len());

    for index in template.paint_order() {
        let el = &template.elements[index];
        if !el.visible {
            continue;
        }
        nodes.push(PaintNode {
            element_id: el.id.clone(),
            x: el.x,
            y: el.y,
            width: el.width,
            height: el.height,
            rotation: el.rotation,
            content: node_content(template, el, reg),
        });
    }

    SceneGraph {
        width,
        height,
        background_color: template.background_color.clone(),
        background_image: template.background_image.clone(),
        nodes,
    }
}

/// Render a batch of registrations in parallel. Safe because [`render`]
/// is pure; the output order matches the input order.
pub fn render_bulk(template: &Template, regs: &[Registration]) -> Vec<SceneGraph> {
    regs.par_iter().map(|reg| render(template, reg)).collect()
}

/// The placeholder scene for the missing-guest case: same canvas, one
/// centered message node.
pub fn render_invalid(template: &Template) -> SceneGraph {
    let (width, height) = template.page_size.canvas();
    SceneGraph {
        width,
        height,
        background_color: template.background_color.clone(),
        background_image: None,
        nodes: vec![PaintNode {
            element_id: String::new(),
            x: 0.0,
            y: height / 2.0 - 20.0,
            width,
            height: 40.0,
            rotation: 0.0,
            content: NodeContent::Placeholder {
                message: INVALID_GUEST_MESSAGE.to_string(),
            },
        }],
    }
}

/// Resolve one element to its node payload.
fn node_content(template: &Template, el: &Element, reg: &Registration) -> NodeContent {
    match &el.kind {
        ElementKind::Text(text) => text_node(
            resolve_tokens(&text.content, reg),
            &text.style,
            text.style.font_size,
        ),
        ElementKind::Image(image) => NodeContent::Image {
            src: resolve_tokens(&image.src, reg),
        },
        ElementKind::Qr(qr) => {
            let payload = if qr.payload.is_empty() {
                confirmation_code(reg.id)
            } else {
                resolve_tokens(&qr.payload, reg)
            };
            barcode_node(payload)
        }
        ElementKind::Shape(shape) => NodeContent::Shape {
            shape: shape.shape,
            background_color: shape.background_color.clone(),
            border_color: shape.border_color.clone(),
            border_width: shape.border_width,
        },
        ElementKind::GuestField(gf) => {
            if gf.field == GuestFieldKey::QrCode {
                barcode_node(confirmation_code(reg.id))
            } else {
                let resolved = resolve_field(gf.field, reg);
                let size = effective_font_size(template, gf.field, &resolved, gf.style.font_size);
                text_node(resolved, &gf.style, size)
            }
        }
    }
}

fn text_node(content: String, style: &TextStyle, font_size: f32) -> NodeContent {
    NodeContent::Text {
        content,
        font_family: style.font_family.clone(),
        font_size,
        font_weight: style.font_weight,
        color: style.color.clone(),
        text_align: style.text_align,
    }
}

fn barcode_node(payload: String) -> NodeContent {
    let modules = QrMatrix::encode(&payload);
    NodeContent::Barcode { payload, modules }
}

/// Standard layouts derive name/company/job-title sizes from resolved
/// string length; everything else keeps the explicit size.
fn effective_font_size(
    template: &Template,
    field: GuestFieldKey,
    resolved: &str,
    explicit: f32,
) -> f32 {
    if template.layout != LayoutFlavor::Standard {
        return explicit;
    }
    let len = resolved.chars().count();
    match field {
        GuestFieldKey::Name => autosize::name_size(len),
        GuestFieldKey::Company => autosize::company_size(len),
        GuestFieldKey::JobTitle => autosize::job_title_size(len),
        _ => explicit,
    }
}
