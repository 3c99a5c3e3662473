use std::path::PathBuf;

use vitrine_scene_model::{parse_script, EventKind, Point2D, Scene, Selector, ViewportSize};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-page")
}

fn load_scene() -> Scene {
    Scene::load_layout(&fixture_dir().join("layout.json")).expect("fixture layout should load")
}

#[test]
fn layout_fixture_loads() {
    let scene = load_scene();
    assert_eq!(scene.len(), 50);
    assert_eq!(scene.viewport(), ViewportSize::new(1440.0, 900.0));
    assert_eq!(scene.document_height(), 7500.0);
    assert_eq!(scene.max_scroll(), 6600.0);
    assert_eq!(scene.scroll_offset(), 0.0);
}

#[test]
fn layout_fixture_selectors() {
    let scene = load_scene();
    assert_eq!(scene.select(&Selector::Class("exp-card".into())).len(), 2);

    let interactive: Vec<&str> = scene
        .select(&Selector::interactive())
        .into_iter()
        .filter_map(|id| scene.get(id))
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(interactive.len(), 10);
    assert!(interactive.contains(&"hero-cta"));
    assert!(interactive.contains(&"project-card-1"));
    assert!(interactive.contains(&"contact-name"));
    // Anchor and magnetic at once, selected once
    assert_eq!(interactive.iter().filter(|n| **n == "contact-email").count(), 1);
}

#[test]
fn layout_fixture_initial_state_and_hit_test() {
    let scene = load_scene();
    let heading = scene.find("about-heading").expect("heading");
    let visual = scene.visual(heading).expect("heading");
    assert_eq!(visual.opacity, 0.0);
    assert_eq!(visual.y, 80.0);

    // Layout rect, not the translated one
    let rect = scene.layout_rect(heading).expect("heading");
    assert_eq!(rect.y, 1140.0);

    let cta = scene.find("hero-cta").expect("cta");
    let interactive = scene.select(&Selector::interactive());
    assert_eq!(scene.hit_test(Point2D::new(300.0, 650.0), &interactive), Some(cta));
    assert_eq!(scene.hit_test(Point2D::new(1400.0, 450.0), &interactive), None);
}

#[test]
fn layout_fixture_parent_links() {
    let scene = load_scene();
    let contact = scene.find("contact");
    for name in ["contact-heading", "contact-form", "contact-info"] {
        let id = scene.find(name).expect(name);
        assert_eq!(scene.parent(id), contact, "{name}");
    }
    let email = scene.find("contact-email").expect("email");
    assert_eq!(scene.parent(email), scene.find("contact-info"));
    let footer = scene.find("footer").expect("footer");
    assert_eq!(scene.parent(footer), None);
}

#[test]
fn events_fixture_parses() {
    let content = std::fs::read_to_string(fixture_dir().join("events.jsonl"))
        .expect("fixture events should be readable");
    let (header, events) = parse_script(&content).expect("fixture events should parse");

    let header = header.expect("fixture has a header");
    assert_eq!(header.schema_version, "1.0");
    assert_eq!(header.refresh_hz, 60);
    assert!(header.hover_capable);

    assert!(events.windows(2).all(|p| p[0].timestamp_ns <= p[1].timestamp_ns));
    let resizes = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Resize { .. }))
        .count();
    assert_eq!(resizes, 2);
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, EventKind::MenuToggle)));
    assert!(matches!(
        events.last().map(|e| &e.kind),
        Some(EventKind::ScrollTo { element: None })
    ));
}
