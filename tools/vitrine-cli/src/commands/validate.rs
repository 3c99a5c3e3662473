//! Validate a page layout and an optional input script.

use std::path::PathBuf;

use vitrine_common::AppConfig;
use vitrine_motion_core::{Section, CURSOR_DOT, CURSOR_RING};
use vitrine_scene_model::{parse_script, EventKind, InputEvent, Scene, Selector};

use super::load_scene;

pub fn run(config: AppConfig, layout: PathBuf, events: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Validating layout at: {}", layout.display());
    let scene = load_scene(&layout)?;

    println!("  Elements: {}", scene.len());
    println!(
        "  Viewport: {}x{}",
        scene.viewport().width,
        scene.viewport().height
    );
    println!("  Document height: {:.0}", scene.document_height());
    println!(
        "  Interactive elements: {}",
        scene.select(&Selector::interactive()).len()
    );

    let mut issues = Vec::new();
    for name in [CURSOR_RING, CURSOR_DOT] {
        if scene.find(name).is_none() {
            issues.push(format!("no '{name}' element; the follower will not draw it"));
        }
    }
    let sections: Vec<&str> = Section::ALL
        .iter()
        .map(|s| s.name())
        .filter(|name| scene.find(name).is_some())
        .collect();
    println!("  Sections: {}", sections.join(", "));

    if let Some(path) = events {
        println!("\nValidating input script at: {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let (header, events) =
            parse_script(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;

        match &header {
            Some(h) => println!(
                "  Header: schema {}, {}x{}, hover {}, {} Hz",
                h.schema_version, h.viewport.width, h.viewport.height, h.hover_capable, h.refresh_hz
            ),
            None => println!("  Header: none (defaults apply)"),
        }
        println!("  Events: {}", events.len());
        if let Some(last) = events.last() {
            println!("  Duration: {:.3}s", last.timestamp_secs());
        }
        issues.extend(script_issues(&scene, &events));
    }

    if let Err(e) = config.validate() {
        issues.push(format!("config: {e}"));
    }

    if issues.is_empty() {
        println!("\nAll checks passed.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!("\n{} issue(s) found.", issues.len());
    }
    Ok(())
}

/// References to elements the layout lacks.
fn script_issues(scene: &Scene, events: &[InputEvent]) -> Vec<String> {
    let mut issues = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let referenced = match &event.kind {
            EventKind::HoverEnter { element } | EventKind::HoverLeave { element } => Some(element),
            EventKind::ScrollTo {
                element: Some(element),
            } => Some(element),
            _ => None,
        };
        if let Some(name) = referenced {
            if scene.find(name).is_none() {
                issues.push(format!("event {i} references unknown element '{name}'"));
            }
        }
    }
    issues
}
