//! # Editor Engine
//!
//! State machine over one [`Template`] plus an optional selection.
//!
//! Pointer flow: pointer-down over an element selects it; dragging the
//! body or a handle enters a transform session whose geometry lives on a
//! scratch clone; releasing commits exactly one history entry, so a
//! jittery or cancelled drag never pollutes undo history. Pointer-down
//! over empty canvas clears the selection.
//!
//! Every committing operation snapshots the template into bounded history
//! and bumps a save sequence number; the host drains
//! [`Editor::take_save_request`] to hand the snapshot to the store. Undo
//! and redo move through history only; they never fire persistence.

pub mod history;

pub use history::{HISTORY_LIMIT, History, HistoryEntry};

use serde::{Deserialize, Serialize};

use crate::guest::Registration;
use crate::render::{self, SceneGraph};
use crate::template::{
    Element, ElementKind, FontWeight, GuestFieldKey, ShapeKind, Template, TextAlign,
};

/// Which part of the selected element a drag grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformHandle {
    /// Drag the body: dx/dy translate.
    Move,
    /// Drag the corner handle: dx/dy grow width/height, clamped at zero.
    Resize,
    /// Drag the rotate handle: dx is degrees, normalized into [0, 360).
    Rotate,
}

/// Z-order direction for [`Editor::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Observable interaction state, for the host's cursor/handle chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Selected,
    Transforming,
}

/// Partial element update, merged field-by-field by
/// [`Editor::update_element`]. Fields that do not apply to the element's
/// kind are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub z_index: Option<i32>,
    pub visible: Option<bool>,
    pub content: Option<String>,
    pub src: Option<String>,
    pub payload: Option<String>,
    pub field: Option<GuestFieldKey>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub shape: Option<ShapeKind>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f32>,
}

/// A snapshot handed to the store after a commit. The sequence number is
/// the correlation key for last-writer-wins saves.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub template: Template,
    pub seq: u64,
}

struct TransformSession {
    handle: TransformHandle,
    scratch: Template,
}

/// The editor engine. Owns the template being designed; nothing else
/// holds a mutable reference to it while editing.
pub struct Editor {
    template: Template,
    selected: Option<String>,
    session: Option<TransformSession>,
    history: History,
    sample: Registration,
    save_seq: u64,
    dirty: bool,
}

impl Editor {
    pub fn new(template: Template) -> Self {
        Self::with_sample(template, Registration::sample())
    }

    /// Use a specific preview registration instead of the built-in sample.
    pub fn with_sample(template: Template, sample: Registration) -> Self {
        let history = History::new(HistoryEntry {
            template: template.clone(),
            selected: None,
        });
        Self {
            template,
            selected: None,
            session: None,
            history,
            sample,
            save_seq: 0,
            dirty: false,
        }
    }

    /// The committed template. Mid-drag geometry is not visible here.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The template as currently displayed: the scratch copy while a
    /// transform is live, the committed value otherwise.
    pub fn current(&self) -> &Template {
        match &self.session {
            Some(s) => &s.scratch,
            None => &self.template,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> EditorState {
        if self.session.is_some() {
            EditorState::Transforming
        } else if self.selected.is_some() {
            EditorState::Selected
        } else {
            EditorState::Idle
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Render the current template against the sample registration.
    pub fn preview(&self) -> SceneGraph {
        render::render(self.current(), &self.sample)
    }

    // ------------------------------------------------------------------
    // Pointer / transform state machine
    // ------------------------------------------------------------------

    /// Pointer-down: select the topmost element whose frame contains the
    /// point, or clear the selection over empty canvas. An in-flight
    /// transform session is discarded first.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session = None;
        self.selected = self.hit_test(x, y);
    }

    /// Topmost visible element under the point, in paint order.
    /// Hit-testing uses the axis-aligned frame; rotation is visual only.
    fn hit_test(&self, x: f32, y: f32) -> Option<String> {
        self.template
            .paint_order()
            .into_iter()
            .rev()
            .map(|i| &self.template.elements[i])
            .find(|el| {
                el.visible
                    && x >= el.x
                    && x <= el.x + el.width
                    && y >= el.y
                    && y <= el.y + el.height
            })
            .map(|el| el.id.clone())
    }

    /// Start a drag on the selected element. No-op when nothing is
    /// selected.
    pub fn begin_transform(&mut self, handle: TransformHandle) {
        if self.selected.is_none() {
            return;
        }
        self.session = Some(TransformSession {
            handle,
            scratch: self.template.clone(),
        });
    }

    /// Apply one drag delta to the scratch copy. Intermediate frames are
    /// free: nothing here touches history or persistence.
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        let selected = match &self.selected {
            Some(id) => id.clone(),
            None => return,
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(el) = session.scratch.element_mut(&selected) else {
            return;
        };
        match session.handle {
            TransformHandle::Move => {
                el.x += dx;
                el.y += dy;
            }
            TransformHandle::Resize => {
                el.width = (el.width + dx).max(0.0);
                el.height = (el.height + dy).max(0.0);
            }
            TransformHandle::Rotate => {
                el.rotation = (el.rotation + dx).rem_euclid(360.0);
            }
        }
    }

    /// Drag-end: swap the scratch in and commit exactly one history
    /// entry.
    pub fn end_transform(&mut self) {
        if let Some(session) = self.session.take() {
            self.template = session.scratch;
            self.commit();
        }
    }

    /// Abandon the drag; the committed template is untouched.
    pub fn cancel_transform(&mut self) {
        self.session = None;
    }

    // ------------------------------------------------------------------
    // Element lifecycle
    // ------------------------------------------------------------------

    /// Append a new element with a fresh id on top of the paint order,
    /// select it, commit.
    pub fn add_element(&mut self, kind: ElementKind) -> String {
        let mut next = self.template.clone();
        let mut el = Element::with_defaults(kind);
        el.z_index = next.elements.len() as i32;
        let id = el.id.clone();
        next.elements.push(el);
        self.template = next;
        self.selected = Some(id.clone());
        self.commit();
        id
    }

    /// Clone an element with a new id and a +20/+20 offset so the copy is
    /// visibly distinct; select the copy. Unknown id is a no-op.
    pub fn duplicate_element(&mut self, id: &str) -> Option<String> {
        let source = self.template.element(id)?.clone();
        let mut next = self.template.clone();
        let copy = source.duplicated();
        let copy_id = copy.id.clone();
        next.elements.push(copy);
        self.template = next;
        self.selected = Some(copy_id.clone());
        self.commit();
        Some(copy_id)
    }

    /// Merge partial attributes into the element matching `id`. Unknown
    /// ids are a no-op, not an error: a stale reference after a
    /// concurrent delete must not blow up the editor.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) {
        if self.template.element(id).is_none() {
            return;
        }
        let mut next = self.template.clone();
        if let Some(el) = next.element_mut(id) {
            apply_patch(el, patch);
        }
        self.template = next;
        self.commit();
    }

    /// Delete an element; clears the selection if it pointed at it.
    /// Unknown ids are a no-op.
    pub fn remove_element(&mut self, id: &str) {
        if self.template.element(id).is_none() {
            return;
        }
        let mut next = self.template.clone();
        next.elements.retain(|e| e.id != id);
        self.template = next;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.commit();
    }

    /// Swap the element with its immediate neighbor in effective paint
    /// order. No-op at either end of the stack.
    pub fn reorder(&mut self, id: &str, direction: ReorderDirection) {
        let order = self.template.paint_order();
        let Some(pos) = order
            .iter()
            .position(|&i| self.template.elements[i].id == id)
        else {
            return;
        };
        let neighbor_pos = match direction {
            ReorderDirection::Up => {
                if pos + 1 >= order.len() {
                    return;
                }
                pos + 1
            }
            ReorderDirection::Down => {
                if pos == 0 {
                    return;
                }
                pos - 1
            }
        };

        let a = order[pos];
        let b = order[neighbor_pos];
        let mut next = self.template.clone();
        if next.elements[a].z_index == next.elements[b].z_index {
            // Tied z: stable order is sequence order, so swap positions.
            next.elements.swap(a, b);
        } else {
            let za = next.elements[a].z_index;
            let zb = next.elements[b].z_index;
            next.elements[a].z_index = zb;
            next.elements[b].z_index = za;
        }
        self.template = next;
        self.commit();
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Step back one committed snapshot. No-op at the oldest entry.
    /// Never fires persistence.
    pub fn undo(&mut self) {
        self.session = None;
        if let Some(entry) = self.history.undo() {
            self.template = entry.template.clone();
            self.selected = entry.selected.clone();
        }
    }

    /// Step forward one committed snapshot. No-op at the newest entry.
    pub fn redo(&mut self) {
        self.session = None;
        if let Some(entry) = self.history.redo() {
            self.template = entry.template.clone();
            self.selected = entry.selected.clone();
        }
    }

    fn commit(&mut self) {
        self.template.updated_at = chrono::Utc::now();
        self.history.push(HistoryEntry {
            template: self.template.clone(),
            selected: self.selected.clone(),
        });
        self.save_seq += 1;
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Persistence hand-off
    // ------------------------------------------------------------------

    /// Drain the pending save, if any. Returns the committed snapshot
    /// tagged with its sequence number; the store discards anything
    /// older than the newest sequence it has seen for this template id.
    pub fn take_save_request(&mut self) -> Option<SaveRequest> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(SaveRequest {
            template: self.template.clone(),
            seq: self.save_seq,
        })
    }
}

/// Merge a patch into one element. Geometry applies to every kind;
/// payload fields apply where they make sense and are ignored elsewhere.
fn apply_patch(el: &mut Element, p: &ElementPatch) {
    if let Some(x) = p.x {
        el.x = x;
    }
    if let Some(y) = p.y {
        el.y = y;
    }
    if let Some(w) = p.width {
        el.width = w;
    }
    if let Some(h) = p.height {
        el.height = h;
    }
    if let Some(r) = p.rotation {
        el.rotation = r.rem_euclid(360.0);
    }
    if let Some(z) = p.z_index {
        el.z_index = z;
    }
    if let Some(v) = p.visible {
        el.visible = v;
    }

    match &mut el.kind {
        ElementKind::Text(text) => {
            if let Some(content) = &p.content {
                text.content = content.clone();
            }
            apply_style_patch(&mut text.style, p);
        }
        ElementKind::Image(image) => {
            if let Some(src) = &p.src {
                image.src = src.clone();
            }
        }
        ElementKind::Qr(qr) => {
            if let Some(payload) = &p.payload {
                qr.payload = payload.clone();
            }
        }
        ElementKind::Shape(shape) => {
            if let Some(kind) = p.shape {
                shape.shape = kind;
            }
            if let Some(c) = &p.background_color {
                shape.background_color = c.clone();
            }
            if let Some(c) = &p.border_color {
                shape.border_color = c.clone();
            }
            if let Some(w) = p.border_width {
                shape.border_width = w;
            }
        }
        ElementKind::GuestField(gf) => {
            if let Some(field) = p.field {
                gf.field = field;
            }
            apply_style_patch(&mut gf.style, p);
        }
    }
}

fn apply_style_patch(style: &mut crate::template::TextStyle, p: &ElementPatch) {
    if let Some(f) = &p.font_family {
        style.font_family = f.clone();
    }
    if let Some(s) = p.font_size {
        style.font_size = s;
    }
    if let Some(w) = p.font_weight {
        style.font_weight = w;
    }
    if let Some(c) = &p.color {
        style.color = c.clone();
    }
    if let Some(a) = p.text_align {
        style.text_align = a;
    }
}
