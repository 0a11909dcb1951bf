//! # Badge Pipeline Tests
//!
//! End-to-end coverage of the template → binder → renderer → store
//! pipeline, driven through the public API the way the surrounding
//! product drives it: templates arrive as JSON blobs, registrations
//! arrive as backend JSON, and the scene graph is what the paint sink
//! receives.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use gafete::GafeteError;
use gafete::editor::{Editor, ElementPatch, TransformHandle};
use gafete::guest::Registration;
use gafete::render::{self, NodeContent};
use gafete::store::{RemoteStore, SaveOutcome, TemplateRow, TemplateStore};
use gafete::template::{
    Element, ElementKind, GuestField, GuestFieldKey, Qr, Shape, Template, Text, parse_elements,
};

fn ada() -> Registration {
    serde_json::from_str(r#"{"id": 7, "guest": {"name": "Ada Lovelace"}}"#).unwrap()
}

fn name_and_qr_template() -> Template {
    let mut t = Template::new("evt-1", "Check-in badge");
    t.elements.push(Element::with_defaults(ElementKind::GuestField(
        GuestField::new(GuestFieldKey::Name),
    )));
    t.elements.push(Element::with_defaults(ElementKind::GuestField(
        GuestField::new(GuestFieldKey::QrCode),
    )));
    t
}

// ============================================================================
// RENDER DETERMINISM
// ============================================================================

#[test]
fn render_is_deterministic() {
    let template = name_and_qr_template();
    let reg = ada();
    assert_eq!(render::render(&template, &reg), render::render(&template, &reg));
}

#[test]
fn preview_and_bulk_paths_agree() {
    let template = name_and_qr_template();
    let reg = ada();

    let editor = Editor::with_sample(template.clone(), reg.clone());
    let preview = editor.preview();
    let bulk = render::render_bulk(&template, std::slice::from_ref(&reg));

    assert_eq!(preview, bulk[0]);
}

// ============================================================================
// END-TO-END SCENARIO
// ============================================================================

#[test]
fn name_and_qr_badge_resolves() {
    let scene = render::render(&name_and_qr_template(), &ada());
    assert_eq!(scene.nodes.len(), 2);

    match &scene.nodes[0].content {
        NodeContent::Text { content, .. } => assert_eq!(content, "Ada Lovelace"),
        other => panic!("expected text node, got {:?}", other),
    }
    match &scene.nodes[1].content {
        NodeContent::Barcode { payload, modules } => {
            assert_eq!(payload, "REG-00000007");
            assert!(!modules.is_empty());
        }
        other => panic!("expected barcode node, got {:?}", other),
    }
}

#[test]
fn qr_payload_stable_across_paths() {
    let template = name_and_qr_template();
    let reg = ada();

    let payload_of = |scene: &gafete::SceneGraph| match &scene.nodes[1].content {
        NodeContent::Barcode { payload, .. } => payload.clone(),
        other => panic!("expected barcode node, got {:?}", other),
    };

    let editor = Editor::with_sample(template.clone(), reg.clone());
    let from_preview = payload_of(&editor.preview());
    let from_bulk = payload_of(&render::render_bulk(&template, std::slice::from_ref(&reg))[0]);
    let again = payload_of(&render::render(&template, &reg));

    assert_eq!(from_preview, "REG-00000007");
    assert_eq!(from_preview, from_bulk);
    assert_eq!(from_preview, again);
}

#[test]
fn missing_guest_is_the_only_visible_failure() {
    let reg: Registration = serde_json::from_str(r#"{"id": 7}"#).unwrap();
    let scene = render::render(&name_and_qr_template(), &reg);
    assert!(matches!(
        &scene.nodes[0].content,
        NodeContent::Placeholder { message } if message == "Invalid attendee data"
    ));
}

// ============================================================================
// Z-ORDER
// ============================================================================

#[test]
fn tied_z_index_paints_in_sequence_order() {
    let mut template = Template::new("evt-1", "ties");
    for i in 0..4 {
        let mut el = Element::with_defaults(ElementKind::Text(Text::new(format!("t{}", i))));
        el.id = format!("el-{}", i);
        el.z_index = 5;
        template.elements.push(el);
    }

    let scene = render::render(&template, &ada());
    let order: Vec<&str> = scene.nodes.iter().map(|n| n.element_id.as_str()).collect();
    assert_eq!(order, vec!["el-0", "el-1", "el-2", "el-3"]);
}

#[test]
fn z_index_overrides_sequence_order() {
    let mut template = Template::new("evt-1", "z");
    for (i, z) in [(0, 2), (1, 0), (2, 1)] {
        let mut el = Element::with_defaults(ElementKind::Shape(Shape::default()));
        el.id = format!("el-{}", i);
        el.z_index = z;
        template.elements.push(el);
    }

    let scene = render::render(&template, &ada());
    let order: Vec<&str> = scene.nodes.iter().map(|n| n.element_id.as_str()).collect();
    assert_eq!(order, vec!["el-1", "el-2", "el-0"]);
}

// ============================================================================
// EDITOR SCENARIO
// ============================================================================

#[test]
fn edit_session_round_trip() {
    let mut editor = Editor::new(Template::new("evt-1", "Badge"));
    let initial = editor.template().clone();

    let text_id = editor.add_element(ElementKind::Text(Text::new("Welcome {firstName}")));
    editor.add_element(ElementKind::Qr(Qr::default()));
    editor.update_element(
        &text_id,
        &ElementPatch {
            x: Some(200.0),
            y: Some(200.0),
            ..Default::default()
        },
    );

    editor.pointer_down(210.0, 210.0);
    assert_eq!(editor.selected_id(), Some(text_id.as_str()));
    editor.begin_transform(TransformHandle::Move);
    editor.drag_by(10.0, 10.0);
    editor.end_transform();

    let final_state = editor.template().clone();
    assert_eq!(final_state.element(&text_id).unwrap().x, 210.0);

    // Four commits → four undos back to the start, four redos forward.
    for _ in 0..4 {
        editor.undo();
    }
    assert_eq!(editor.template().elements, initial.elements);
    for _ in 0..4 {
        editor.redo();
    }
    assert_eq!(editor.template().elements, final_state.elements);
}

// ============================================================================
// BLOB TOLERANCE
// ============================================================================

#[test]
fn loader_accepts_both_blob_shapes() {
    let raw = serde_json::json!([
        {"type": "text", "content": "Hello", "x": 10, "y": 10, "zIndex": 1},
        {"type": "guestField", "field": "qrCode"}
    ]);
    let wrapped = serde_json::json!({ "elements": raw.clone() });

    let a = parse_elements(&raw).unwrap();
    let b = parse_elements(&wrapped).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    assert_eq!(a[0].z_index, 1);
    assert!(matches!(
        &a[1].kind,
        ElementKind::GuestField(gf) if gf.field == GuestFieldKey::QrCode
    ));
}

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Remote that refuses every call, simulating a dead network.
struct FailingRemote;

#[async_trait]
impl RemoteStore for FailingRemote {
    async fn list(&self, _event_id: &str) -> Result<Vec<TemplateRow>, GafeteError> {
        Err(GafeteError::Store("connection refused".into()))
    }
    async fn create(&self, _row: &TemplateRow) -> Result<TemplateRow, GafeteError> {
        Err(GafeteError::Store("connection refused".into()))
    }
    async fn update(&self, _row: &TemplateRow) -> Result<TemplateRow, GafeteError> {
        Err(GafeteError::Store("connection refused".into()))
    }
}

#[tokio::test]
async fn editor_commits_survive_remote_outage() {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::with_remote(Arc::new(FailingRemote), dir.path());

    let mut editor = Editor::new(Template::new("evt-1", "Badge"));
    editor.add_element(ElementKind::Qr(Qr::default()));
    let request = editor.take_save_request().unwrap();
    let template_id = request.template.id.clone();

    // No error escapes; the save degrades to the cache.
    assert_eq!(store.save(&request).await, SaveOutcome::Cached);

    let rows = store.load("evt-1").await;
    let row = rows.iter().find(|r| r.id == template_id).unwrap();
    let restored = row.template().unwrap();
    assert_eq!(restored.elements, editor.template().elements);
}

#[tokio::test]
async fn superseded_save_never_clobbers_newer_edit() {
    let dir = tempfile::tempdir().unwrap();
    let store = TemplateStore::offline(dir.path());

    let mut editor = Editor::new(Template::new("evt-1", "Badge"));
    editor.add_element(ElementKind::Text(Text::new("first")));
    let slow = editor.take_save_request().unwrap();

    editor.add_element(ElementKind::Text(Text::new("second")));
    let fast = editor.take_save_request().unwrap();

    // The newer request completes first; the older one must be dropped.
    assert_eq!(store.save(&fast).await, SaveOutcome::Cached);
    assert_eq!(store.save(&slow).await, SaveOutcome::Superseded);

    let rows = store.load("evt-1").await;
    let restored = rows[0].template().unwrap();
    assert_eq!(restored.elements.len(), 2);
}
