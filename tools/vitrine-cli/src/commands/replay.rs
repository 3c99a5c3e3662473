//! Replay an input script against a page layout.

use std::path::PathBuf;
use std::time::Duration;

use vitrine_common::{AppConfig, FrameClock, RateController};
use vitrine_motion_core::{FrameReport, Replayer, SequencerEventKind, Stage};
use vitrine_scene_model::parse_script;

use super::load_scene;

/// Live progress lines per second in real-time mode.
const STATUS_HZ: u32 = 4;

pub struct ReplayOptions {
    pub json: bool,
    pub realtime: bool,
    pub tail: f64,
    pub hz: Option<u32>,
    pub no_hover: bool,
}

pub async fn run(
    config: AppConfig,
    layout: PathBuf,
    events: PathBuf,
    options: ReplayOptions,
) -> anyhow::Result<()> {
    let mut scene = load_scene(&layout)?;
    let content = std::fs::read_to_string(&events)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", events.display()))?;
    let (header, script) =
        parse_script(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;

    let mut hover_capable = true;
    let mut refresh_hz = config.frame.refresh_hz;
    if let Some(header) = &header {
        if header.viewport != scene.viewport() {
            tracing::info!(
                width = header.viewport.width,
                height = header.viewport.height,
                "Using the script's viewport"
            );
            scene.set_viewport(header.viewport);
        }
        hover_capable = header.hover_capable;
        refresh_hz = header.refresh_hz;
    }
    if options.no_hover {
        hover_capable = false;
    }
    if let Some(hz) = options.hz {
        refresh_hz = hz;
    }
    if refresh_hz == 0 {
        anyhow::bail!("Refresh rate must be positive");
    }

    let mut stage = Stage::new(scene, config, hover_capable)?;
    if !options.json {
        println!(
            "Replaying {} event(s) against {} element(s) at {} Hz",
            script.len(),
            stage.scene().len(),
            refresh_hz
        );
        println!("  Entries: {}", stage.sequencer().len());
        println!("  Follower: {}", if stage.follower().is_some() { "on" } else { "off" });
        println!();
    }

    let mut replayer = Replayer::new(script, refresh_hz, options.tail);
    let mut interval = options
        .realtime
        .then(|| tokio::time::interval(Duration::from_nanos(replayer.frame_interval_ns())));
    let clock = FrameClock::start();
    let mut status = RateController::new(STATUS_HZ);
    if options.realtime {
        tracing::info!(epoch = %clock.epoch_wall(), "Real-time replay started");
    }

    let mut last_ns = 0;
    while !replayer.is_done() {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        let Some(report) = replayer.next_frame(&mut stage) else {
            break;
        };
        last_ns = report.now_ns;
        if options.json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }
        print_events(&stage, &report);
        if options.realtime && status.should_tick(clock.elapsed_ns()) {
            tracing::info!(
                t = FrameClock::ns_to_secs(report.now_ns),
                scroll = report.scroll_offset,
                "Replay progress"
            );
        }
    }

    if options.realtime {
        let wall = FrameClock::ns_to_secs(clock.elapsed_ns());
        let scripted = FrameClock::ns_to_secs(last_ns);
        tracing::info!(wall, scripted, drift = wall - scripted, "Real-time replay finished");
    }

    let stats = stage.stats();
    if !options.json {
        println!();
        println!("Finished:");
        println!("  Frames: {}", stats.frames);
        println!("  Input events: {}", stats.input_events);
        println!("  Scroll recomputes: {}", stats.scroll_recomputes);
        println!(
            "  Resizes: {} received, {} applied",
            stats.resizes_received, stats.resizes_applied
        );
        println!("  Sequencer events: {}", stats.sequencer_events);
        println!("  Final scroll: {:.1}", stage.scene().scroll_offset());
        if let Some(follower) = stage.follower() {
            let p = follower.position();
            println!("  Follower: ({:.1}, {:.1}) scale {:.3}", p.x, p.y, follower.scale());
        }
    }

    stage.teardown();
    Ok(())
}

fn print_events(stage: &Stage, report: &FrameReport) {
    for event in &report.events {
        let label = stage
            .sequencer()
            .status(event.entry)
            .map(|s| s.label)
            .unwrap_or_else(|| format!("#{}", event.entry.0));
        let what = match event.kind {
            SequencerEventKind::Toggled { active: true } => "enter",
            SequencerEventKind::Toggled { active: false } => "leave",
            SequencerEventKind::Completed => "complete",
            SequencerEventKind::ReverseCompleted => "reverse-complete",
        };
        println!(
            "[{:>8.3}s] scroll {:>7.1}  {:<24} {}",
            FrameClock::ns_to_secs(report.now_ns),
            report.scroll_offset,
            label,
            what
        );
    }
}
