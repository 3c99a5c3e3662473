//! Simulate the pointer follower chasing a single pointer jump.

use vitrine_common::{AppConfig, FrameCounter};
use vitrine_motion_core::{PointerFollower, CURSOR_DOT, CURSOR_RING};
use vitrine_scene_model::{Element, Rect, Scene, ViewportSize};

use super::parse_point;

const SETTLE_LIMIT: u32 = 10_000;

pub fn run(config: AppConfig, from: &str, to: &str, frames: u32, hover: bool) -> anyhow::Result<()> {
    let from = parse_point(from)?;
    let to = parse_point(to)?;

    let mut scene = Scene::new(ViewportSize::default());
    let ring = scene.insert(Element::new(CURSOR_RING, "div", Rect::new(0.0, 0.0, 40.0, 40.0)))?;
    let dot = scene.insert(Element::new(CURSOR_DOT, "div", Rect::new(0.0, 0.0, 8.0, 8.0)))?;
    if hover {
        // A link centered on the destination, so the jump lands on it
        scene.insert(Element::new(
            "link",
            "a",
            Rect::new(to.x - 20.0, to.y - 20.0, 40.0, 40.0),
        ))?;
    }

    let mut follower = PointerFollower::start(config.cursor, true, &scene, Some(ring), Some(dot))
        .ok_or_else(|| anyhow::anyhow!("Follower did not start"))?;

    // Settle on the starting point before the jump
    follower.on_pointer_move(from, 0, &scene);
    let mut settled = 0;
    while follower.position().distance_to(&from) > 1e-9 && settled < SETTLE_LIMIT {
        follower.step();
        settled += 1;
    }

    println!(
        "Jump ({:.1}, {:.1}) -> ({:.1}, {:.1}), {} frame(s) at {} Hz",
        from.x, from.y, to.x, to.y, frames, config.frame.refresh_hz
    );
    let interval_ns = 1_000_000_000 / config.frame.refresh_hz.max(1) as u64;
    follower.on_pointer_move(to, 0, &scene);
    let mut counter = FrameCounter::new();

    println!("{:>6} {:>10} {:>10} {:>7} {:>10}", "frame", "x", "y", "scale", "distance");
    for i in 0..frames as u64 {
        let tick = counter.tick(i * interval_ns);
        follower.frame(tick.now_ns, &mut scene);
        let state = follower.state();
        println!(
            "{:>6} {:>10.3} {:>10.3} {:>7.4} {:>10.4}",
            tick.index,
            state.position.x,
            state.position.y,
            state.scale,
            state.position.distance_to(&state.target)
        );
    }

    if let Some(visual) = scene.visual(ring) {
        println!("\nRing transform: {}", visual.css_transform(&Rect::new(0.0, 0.0, 40.0, 40.0)));
    }
    follower.stop();
    Ok(())
}
