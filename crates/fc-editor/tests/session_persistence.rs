//! Integration tests: canvas session ↔ on-disk store (fc-editor ↔ fc-core).
//!
//! A session writes through to its store after every change, and a fresh
//! session opened on the same store sees the same canvas.

use fc_core::*;
use fc_editor::drop::DropPayload;
use fc_editor::{CanvasSession, EditorConfig, FileStore, MemoryStore, Mutation};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn open_in(dir: &std::path::Path) -> CanvasSession<FileStore> {
    let config = EditorConfig::default();
    let store = FileStore::new(dir, &config.storage_key);
    CanvasSession::open(store, config)
}

// ─── Reload ──────────────────────────────────────────────────────────────

#[test]
fn reopen_restores_elements_and_links() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let mut s = open_in(dir.path());
        let a = s.add_text("Hello", 10.0, 20.0).unwrap();
        let b = s.add_image("cat.png", 50.0, 60.0, None).unwrap();
        let c = s.add_text("scratch", 0.0, 0.0).unwrap();
        s.apply(Mutation::LinkElements { a, b }).unwrap();
        s.apply(Mutation::LinkElements { a: c, b: a }).unwrap();
        s.apply(Mutation::RotateElement {
            id: b,
            delta_degrees: 12.5,
        })
        .unwrap();
        s.apply(Mutation::Lower { id: a }).unwrap();
        s.apply(Mutation::RemoveElement { id: c }).unwrap();
        SceneRecord::from_scene(s.scene())
    };

    let reopened = open_in(dir.path());
    assert_eq!(SceneRecord::from_scene(reopened.scene()), before);
    assert_eq!(before.links, vec![[0, 1]]);
    assert_eq!(before.elements[0].depth, -1);
    assert!(dir.path().join("canvasData.json").exists());
}

#[test]
fn reopen_mints_fresh_ids() {
    let dir = tempfile::tempdir().unwrap();
    let first = {
        let mut s = open_in(dir.path());
        s.add_text("a", 0.0, 0.0).unwrap()
    };
    let reopened = open_in(dir.path());
    assert_eq!(reopened.scene().len(), 1);
    assert_ne!(reopened.scene().elements()[0].id, first);
}

#[test]
fn export_matches_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let exported = {
        let mut s = open_in(dir.path());
        s.import_text(include_str!("fixtures/board.md")).unwrap();
        s.export_text()
    };
    assert_eq!(open_in(dir.path()).export_text(), exported);
}

#[test]
fn custom_storage_key_uses_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig {
        storage_key: "boardB".to_string(),
        ..EditorConfig::default()
    };
    let mut s = CanvasSession::open(FileStore::new(dir.path(), &config.storage_key), config);
    s.add_text("b", 0.0, 0.0).unwrap();

    assert!(dir.path().join("boardB.json").exists());
    assert!(open_in(dir.path()).scene().is_empty());
}

// ─── Legacy data ─────────────────────────────────────────────────────────

#[test]
fn legacy_save_with_bad_records_still_opens() {
    let json = r#"{
        "elements": [
            {"type": "text", "content": "keep me", "x": 1, "y": 2, "rotation": 0, "zIndex": 0},
            {"type": "video", "content": "nope.mp4", "x": 0, "y": 0},
            {"type": "image", "content": "b.png", "x": 3, "y": 4, "width": 50, "height": 50, "zIndex": null}
        ],
        "links": [[0, 2], [0, 1]]
    }"#;
    let s = CanvasSession::open(MemoryStore::with_value(json), EditorConfig::default());
    let record = SceneRecord::from_scene(s.scene());
    assert_eq!(record.elements.len(), 2);
    assert_eq!(record.elements[1].content, "b.png");
    assert_eq!(record.links, vec![[0, 1]]);
}

// ─── Drops ───────────────────────────────────────────────────────────────

#[test]
fn drops_are_persisted() {
    let mut s = CanvasSession::open(MemoryStore::new(), EditorConfig::default());
    s.add_drop(DropPayload::Uri("https://example.com/x.png".into()), 5.0, 5.0)
        .unwrap();
    s.add_drop(DropPayload::File { name: "notes.txt".into() }, 9.0, 9.0)
        .unwrap();

    let stored = scene_from_json(s.store().value().unwrap()).unwrap().scene;
    let kinds: Vec<_> = stored.elements().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ElementKind::Image, ElementKind::Text]);
    assert_eq!(stored.elements()[0].size, Some(Size::new(100.0, 100.0)));
}
