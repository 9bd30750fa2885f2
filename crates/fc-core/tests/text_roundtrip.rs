//! Integration tests: emit → parse round-trips of the text interchange form.
//!
//! Verifies that no element attribute or link is lost when converting
//! Scene → text → Scene, and that legacy exports still load.

use fc_core::*;
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Attributes and link index pairs, identity stripped.
fn snapshot(scene: &Scene) -> SceneRecord {
    SceneRecord::from_scene(scene)
}

fn assert_text_roundtrip(scene: &Scene) {
    let emitted = emit_scene(scene);
    let report = parse_text_report(&emitted);
    assert!(
        report.skipped.is_empty(),
        "round-trip skipped lines: {:?}\nEmitted:\n{emitted}",
        report.skipped
    );
    assert_eq!(snapshot(&report.scene), snapshot(scene), "Emitted:\n{emitted}");
}

// ─── Exact output ────────────────────────────────────────────────────────

#[test]
fn hello_cat_exports_exactly() {
    let mut scene = Scene::new();
    let hello = scene.add_element(Element::text("Hello", 10.0, 20.0)).unwrap();
    let cat = scene
        .add_element(Element::image("cat.png", 50.0, 60.0).with_size(100.0, 100.0))
        .unwrap();
    scene.link_elements(hello, cat).unwrap();

    assert_eq!(
        emit_scene(&scene),
        "Hello @@ (10, 20, r0, z0)\ncat.png @@ (50, 60, r0, z0) @@ 100x100\n\n# Links\n0 -> 1"
    );
}

// ─── Round trips ─────────────────────────────────────────────────────────

#[test]
fn roundtrip_mixed_scene() {
    let mut scene = Scene::new();
    let a = scene.add_element(Element::text("Project kickoff", 40.0, 30.0)).unwrap();
    let b = scene
        .add_element(
            Element::image("https://example.com/sunset.jpg", 220.5, -60.0)
                .with_size(160.0, 120.0)
                .with_rotation(372.75)
                .with_depth(4),
        )
        .unwrap();
    let c = scene
        .add_element(Element::text("a @@ (tricky) line", -5.0, 0.0).with_depth(-2))
        .unwrap();
    scene.link_elements(a, b).unwrap();
    scene.link_elements(c, a).unwrap();
    scene.link_elements(a, b).unwrap();
    assert_text_roundtrip(&scene);
}

#[test]
fn roundtrip_after_removal_renumbers_links() {
    let mut scene = Scene::new();
    let a = scene.add_element(Element::text("a", 0.0, 0.0)).unwrap();
    let b = scene.add_element(Element::text("b", 1.0, 1.0)).unwrap();
    let c = scene.add_element(Element::text("c", 2.0, 2.0)).unwrap();
    scene.link_elements(a, b).unwrap();
    scene.link_elements(b, c).unwrap();
    scene.link_elements(c, a).unwrap();
    scene.remove_element(b).unwrap();

    let emitted = emit_scene(&scene);
    assert!(emitted.ends_with("# Links\n1 -> 0"), "got:\n{emitted}");
    assert_text_roundtrip(&scene);
}

#[test]
fn blank_text_never_shifts_link_indices() {
    let mut scene = Scene::new();
    assert!(scene.add_element(Element::text("", 0.0, 0.0)).is_err());
    let a = scene.add_element(Element::text("a", 0.0, 0.0)).unwrap();
    let b = scene.add_element(Element::text("b", 1.0, 1.0)).unwrap();
    let c = scene.add_element(Element::text("c", 2.0, 2.0)).unwrap();
    scene.link_elements(a, b).unwrap();
    scene.link_elements(b, c).unwrap();

    // Clearing the text of the first element is refused, so it keeps a line.
    assert!(scene.set_content(a, "").is_err());
    assert_eq!(scene.get(a).unwrap().content, "a");

    let emitted = emit_scene(&scene);
    assert!(emitted.ends_with("# Links\n0 -> 1\n1 -> 2"), "got:\n{emitted}");
    assert_text_roundtrip(&scene);
}

#[test]
fn roundtrip_empty_scene() {
    assert_text_roundtrip(&Scene::new());
}

#[test]
fn text_with_image_extension_becomes_image() {
    let mut scene = Scene::new();
    scene.add_element(Element::text("see notes.png", 0.0, 0.0)).unwrap();
    let reparsed = parse_text(&emit_scene(&scene));
    assert_eq!(reparsed.elements()[0].kind, ElementKind::Image);
    assert_eq!(reparsed.elements()[0].content, "see notes.png");
}

// ─── Fixtures ────────────────────────────────────────────────────────────

#[test]
fn moodboard_fixture_parses() {
    let input = include_str!("fixtures/moodboard.md");
    let report = parse_text_report(input);
    let scene = &report.scene;

    let kinds: Vec<_> = scene.elements().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Image,
        ]
    );
    assert_eq!(scene.elements()[2].content, "Remember: budget @@ (notes)");
    assert_eq!(scene.elements()[1].size, Some(Size::new(160.0, 120.0)));
    assert_eq!(scene.elements()[4].depth, -1);
    assert_eq!(snapshot(scene).links, vec![[0, 1], [1, 3], [2, 0]]);

    let skipped: Vec<_> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![5, 12]);
}

#[test]
fn moodboard_fixture_reemits_stably() {
    let input = include_str!("fixtures/moodboard.md");
    let once = emit_scene(&parse_text(input));
    let twice = emit_scene(&parse_text(&once));
    assert_eq!(once, twice);
}

#[test]
fn legacy_store_loads_and_exports() {
    let json = include_str!("fixtures/legacy_store.json");
    let report = scene_from_json(json).unwrap();
    assert!(report.malformed.is_empty());
    assert_eq!(report.dropped_links.len(), 1);
    assert_eq!(report.scene.len(), 3);
    assert_eq!(report.scene.links().len(), 2);

    let text = emit_scene(&report.scene);
    assert_eq!(
        text,
        "Hello @@ (10.4, 20, r33.7, z2)\ncat.png @@ (50, 60, r0, z0) @@ 100x100\norphan @@ (0, 0, r0, z0)\n\n# Links\n0 -> 1\n2 -> 0"
    );
}
