//! List registered entries and their trigger windows.

use std::path::PathBuf;

use vitrine_common::AppConfig;
use vitrine_motion_core::{RevealState, Section, Stage};

use super::load_scene;

pub fn run(config: AppConfig, layout: PathBuf) -> anyhow::Result<()> {
    let scene = load_scene(&layout)?;
    let mut stage = Stage::new(scene, config, false)?;

    println!(
        "Viewport {}x{}, document height {:.0}, max scroll {:.0}",
        stage.scene().viewport().width,
        stage.scene().viewport().height,
        stage.scene().document_height(),
        stage.scroll().limit()
    );
    println!("Pin spacing: {:.0}", stage.scene().pin_spacing());
    println!();

    for section in Section::ALL {
        let present = stage.site().context(section).is_some();
        println!("{:<12} {}", section.name(), if present { "installed" } else { "-" });
    }
    println!();

    println!("{:>4}  {:<24} {:>9} {:>9}  {}", "id", "entry", "start", "end", "state");
    for entry in stage.entries() {
        let (start, end) = match entry.window {
            Some(w) => (format!("{:.1}", w.start), format!("{:.1}", w.end)),
            None => ("-".to_string(), "-".to_string()),
        };
        let state = match entry.state {
            Some(RevealState::Played) => "played",
            Some(RevealState::Idle) => "idle",
            None if entry.playing => "playing",
            None => "paused",
        };
        println!(
            "{:>4}  {:<24} {:>9} {:>9}  {}",
            entry.id.0, entry.label, start, end, state
        );
    }

    stage.teardown();
    Ok(())
}
