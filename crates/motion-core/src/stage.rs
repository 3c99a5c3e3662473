//! The stage: one page's scene and every component that animates it.
//!
//! The host feeds input with [`Stage::handle_event`] and calls
//! [`Stage::frame`] once per display refresh. Input only records intent
//! (wheel deltas move the scroll target, resizes are coalesced); all
//! recomputation happens inside `frame`, at most once per frame.

use serde::Serialize;
use vitrine_common::{AppConfig, Coalesced, FrameClock, FrameCounter, VitrineResult};
use vitrine_scene_model::{EventKind, InputEvent, Point2D, Scene, ViewportSize};

use crate::follower::{FollowerState, PointerFollower};
use crate::scroll::ScrollController;
use crate::sequencer::{EntryStatus, Sequencer, SequencerEvent};
use crate::site::Site;

/// Element names the pointer follower draws into.
pub const CURSOR_RING: &str = "cursor-ring";
pub const CURSOR_DOT: &str = "cursor-dot";

/// What happened during one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub index: u64,
    pub now_ns: u64,
    pub scroll_offset: f64,
    pub follower: Option<FollowerState>,
    pub events: Vec<SequencerEvent>,
    pub navbar_scrolled: bool,
    pub menu_open: bool,
}

/// Counters over the stage's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    pub frames: u64,
    pub input_events: u64,
    /// Frames in which the scroll offset changed and triggers were
    /// re-evaluated against it.
    pub scroll_recomputes: u64,
    pub resizes_applied: u64,
    pub resizes_received: u64,
    pub sequencer_events: u64,
}

pub struct Stage {
    config: AppConfig,
    scene: Scene,
    sequencer: Sequencer,
    scroll: ScrollController,
    follower: Option<PointerFollower>,
    site: Site,
    counter: FrameCounter,
    resize: Coalesced<ViewportSize>,
    last_scroll: Option<f64>,
    stats: StageStats,
    torn_down: bool,
}

impl Stage {
    /// Install the site's motion on `scene` and start the follower if the
    /// host has a hover-capable pointer.
    pub fn new(mut scene: Scene, config: AppConfig, hover_capable: bool) -> VitrineResult<Self> {
        config.validate()?;

        let mut sequencer = Sequencer::new();
        let site = Site::install(&mut sequencer, &mut scene, &config.scroll)?;

        let mut scroll = ScrollController::new(config.scroll.clone());
        scroll.sync(&scene);

        let follower = PointerFollower::start(
            config.cursor.clone(),
            hover_capable,
            &scene,
            scene.find(CURSOR_RING),
            scene.find(CURSOR_DOT),
        );

        tracing::info!(
            elements = scene.len(),
            entries = sequencer.len(),
            follower = follower.is_some(),
            max_scroll = scroll.limit(),
            "Stage ready"
        );

        Ok(Self {
            config,
            scene,
            sequencer,
            scroll,
            follower,
            site,
            counter: FrameCounter::new(),
            resize: Coalesced::new(),
            last_scroll: None,
            stats: StageStats::default(),
            torn_down: false,
        })
    }

    /// Record one input event. Ignored after teardown.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if self.torn_down {
            return;
        }
        self.stats.input_events += 1;

        match &event.kind {
            EventKind::PointerMove { x, y } => {
                if let Some(follower) = &mut self.follower {
                    follower.on_pointer_move(Point2D::new(*x, *y), event.timestamp_ns, &self.scene);
                }
            }
            EventKind::HoverEnter { element } => {
                if let (Some(follower), Some(id)) = (&mut self.follower, self.scene.find(element)) {
                    follower.on_hover_enter(id);
                }
            }
            EventKind::HoverLeave { element } => {
                if let (Some(follower), Some(id)) = (&mut self.follower, self.scene.find(element)) {
                    follower.on_hover_leave(id);
                }
            }
            EventKind::Wheel { dy } => {
                self.scroll.scroll_by(*dy);
            }
            EventKind::Resize { width, height } => {
                self.stats.resizes_received += 1;
                self.resize.push(ViewportSize::new(*width, *height));
            }
            EventKind::ScrollTo { element } => {
                self.site.navbar_mut().navigate(
                    element.as_deref(),
                    &mut self.sequencer,
                    &mut self.scroll,
                    &self.scene,
                );
            }
            EventKind::MenuToggle => {
                self.site
                    .navbar_mut()
                    .toggle_menu(&mut self.sequencer, &mut self.scroll);
            }
        }
    }

    /// Run one frame at host time `now_ns`.
    pub fn frame(&mut self, now_ns: u64) -> FrameReport {
        let tick = self.counter.tick(now_ns);
        if self.torn_down {
            return self.report(tick.index, now_ns, Vec::new());
        }

        if let Some(viewport) = self.resize.take() {
            self.scene.set_viewport(viewport);
            self.sequencer.refresh(&mut self.scene);
            self.scroll.sync(&self.scene);
            self.last_scroll = None;
            self.stats.resizes_applied += 1;
            tracing::debug!(width = viewport.width, height = viewport.height, "Viewport resized");
        }

        let offset = self.scroll.update(tick.dt_secs);
        self.scene.set_scroll_offset(offset);
        let offset = self.scene.scroll_offset();
        let scrolled = self.last_scroll != Some(offset);
        if scrolled {
            self.stats.scroll_recomputes += 1;
            self.last_scroll = Some(offset);
        }

        let events = self.sequencer.update(&tick, offset, &mut self.scene);
        self.site.navbar_mut().on_scroll(offset);

        if let Some(follower) = &mut self.follower {
            if scrolled {
                follower.refresh_hover(&self.scene);
            }
            follower.frame(now_ns, &mut self.scene);
        }

        self.stats.frames += 1;
        self.stats.sequencer_events += events.len() as u64;
        self.report(tick.index, now_ns, events)
    }

    fn report(&self, index: u64, now_ns: u64, events: Vec<SequencerEvent>) -> FrameReport {
        FrameReport {
            index,
            now_ns,
            scroll_offset: self.scene.scroll_offset(),
            follower: self.follower.as_ref().map(PointerFollower::state),
            events,
            navbar_scrolled: self.site.navbar().is_scrolled(),
            menu_open: self.site.navbar().is_menu_open(),
        }
    }

    /// Stop the follower and revert all motion. Returns `false` if the
    /// stage was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        if let Some(follower) = &mut self.follower {
            follower.stop();
        }
        self.site.teardown(&mut self.sequencer, &mut self.scene);
        self.sequencer.revert_all(&mut self.scene);
        tracing::info!(frames = self.stats.frames, "Stage torn down");
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn follower(&self) -> Option<&PointerFollower> {
        self.follower.as_ref()
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    pub fn entries(&self) -> Vec<EntryStatus> {
        self.sequencer.statuses()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Drives a stage through a recorded input script at a fixed frame rate.
///
/// Events are delivered before the first frame whose timestamp is at or
/// after theirs.
#[derive(Debug)]
pub struct Replayer {
    events: Vec<InputEvent>,
    next_event: usize,
    frame_interval_ns: u64,
    now_ns: u64,
    end_ns: u64,
}

impl Replayer {
    /// Replay `events` at `refresh_hz`, running `tail_secs` past the last
    /// event so animations can settle.
    pub fn new(mut events: Vec<InputEvent>, refresh_hz: u32, tail_secs: f64) -> Self {
        events.sort_by_key(|e| e.timestamp_ns);
        let last = events.last().map(|e| e.timestamp_ns).unwrap_or(0);
        Self {
            events,
            next_event: 0,
            frame_interval_ns: 1_000_000_000 / refresh_hz.max(1) as u64,
            now_ns: 0,
            end_ns: last + FrameClock::secs_to_ns(tail_secs.max(0.0)),
        }
    }

    pub fn frame_interval_ns(&self) -> u64 {
        self.frame_interval_ns
    }

    pub fn is_done(&self) -> bool {
        self.now_ns > self.end_ns
    }

    /// Deliver due events and run one frame. `None` once the script and
    /// its tail have played out.
    pub fn next_frame(&mut self, stage: &mut Stage) -> Option<FrameReport> {
        if self.is_done() {
            return None;
        }
        while let Some(event) = self.events.get(self.next_event) {
            if event.timestamp_ns > self.now_ns {
                break;
            }
            stage.handle_event(event);
            self.next_event += 1;
        }
        let report = stage.frame(self.now_ns);
        self.now_ns += self.frame_interval_ns;
        Some(report)
    }

    /// Play the whole script and return every frame report.
    pub fn run(mut self, stage: &mut Stage) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.next_frame(stage) {
            reports.push(report);
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_scene_model::{Element, Property, Rect};

    const FRAME_NS: u64 = 16_666_667;

    fn page() -> Scene {
        let mut scene = Scene::new(ViewportSize::new(1440.0, 900.0));
        let rect = |y: f64, h: f64| Rect::new(0.0, y, 1440.0, h);
        for element in [
            Element::new(CURSOR_RING, "div", Rect::new(0.0, 0.0, 40.0, 40.0)),
            Element::new(CURSOR_DOT, "div", Rect::new(0.0, 0.0, 8.0, 8.0)),
            Element::new("hero", "section", rect(0.0, 900.0)),
            Element::new("hero-cta", "a", Rect::new(100.0, 600.0, 200.0, 50.0)),
            Element::new("about", "section", rect(1000.0, 1200.0)),
            Element::new("about-heading", "h2", rect(1100.0, 120.0)),
            Element::new("footer", "footer", rect(2200.0, 400.0)),
        ] {
            scene.insert(element).unwrap();
        }
        scene
    }

    #[test]
    fn test_wheel_is_applied_once_per_frame() {
        let mut stage = Stage::new(page(), AppConfig::default(), true).unwrap();
        stage.frame(0);
        for i in 0..20 {
            stage.handle_event(&InputEvent::wheel(i, 10.0));
        }
        stage.frame(FRAME_NS);
        stage.frame(2 * FRAME_NS);
        let stats = stage.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.input_events, 20);
        assert!(stats.scroll_recomputes <= stats.frames);
        assert!(stage.scroll().target() == 200.0);
    }

    #[test]
    fn test_resizes_are_coalesced() {
        let mut stage = Stage::new(page(), AppConfig::default(), true).unwrap();
        for w in [800.0, 900.0, 1000.0] {
            stage.handle_event(&InputEvent {
                timestamp_ns: 0,
                kind: EventKind::Resize {
                    width: w,
                    height: 700.0,
                },
            });
        }
        stage.frame(0);
        let stats = stage.stats();
        assert_eq!(stats.resizes_received, 3);
        assert_eq!(stats.resizes_applied, 1);
        assert_eq!(stage.scene().viewport(), ViewportSize::new(1000.0, 700.0));
    }

    #[test]
    fn test_reveal_plays_on_scroll() {
        let mut stage = Stage::new(page(), AppConfig::default(), true).unwrap();
        let heading = stage.scene().find("about-heading").unwrap();
        assert_eq!(stage.scene().property(heading, Property::Opacity), Some(0.0));

        let mut events = vec![InputEvent::wheel(0, 600.0)];
        events.push(InputEvent::pointer(0, 150.0, 640.0));
        let reports = Replayer::new(events, 60, 3.0).run(&mut stage);

        assert!(reports.last().unwrap().navbar_scrolled);
        assert_eq!(stage.scene().scroll_offset(), 600.0);
        assert_eq!(stage.scene().property(heading, Property::Opacity), Some(1.0));
        // The cta it pointed at has scrolled away
        assert!(!stage.follower().unwrap().is_hovering());
    }

    #[test]
    fn test_hover_follows_scroll_without_pointer_moves() {
        let mut stage = Stage::new(page(), AppConfig::default(), true).unwrap();
        let events = vec![
            InputEvent::pointer(0, 150.0, 640.0),
            InputEvent::wheel(2 * FRAME_NS, 200.0),
        ];
        let mut replayer = Replayer::new(events, 60, 3.0);
        replayer.next_frame(&mut stage);
        assert!(stage.follower().unwrap().is_hovering());

        // hero-cta scrolls out from under the still pointer
        while replayer.next_frame(&mut stage).is_some() {}
        assert_eq!(stage.scene().scroll_offset(), 200.0);
        assert!(!stage.follower().unwrap().is_hovering());
        assert_eq!(stage.follower().unwrap().target(), Point2D::new(150.0, 640.0));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let scene = page();
        let before: Vec<_> = scene.iter().map(|(_, e)| e.visual).collect();
        let mut stage = Stage::new(scene, AppConfig::default(), true).unwrap();
        stage.handle_event(&InputEvent::pointer(0, 300.0, 300.0));
        for i in 0..10 {
            stage.frame(i * FRAME_NS);
        }
        assert!(stage.teardown());
        assert!(!stage.teardown());

        stage.handle_event(&InputEvent::wheel(0, 500.0));
        let report = stage.frame(20 * FRAME_NS);
        assert!(report.events.is_empty());
        assert_eq!(stage.stats().frames, 10);

        // Follower writes are not motion-context state; compare the page
        let after: Vec<_> = stage.scene().iter().skip(2).map(|(_, e)| e.visual).collect();
        assert_eq!(&before[2..], after.as_slice());
    }

    #[test]
    fn test_no_hover_means_no_follower() {
        let mut stage = Stage::new(page(), AppConfig::default(), false).unwrap();
        stage.handle_event(&InputEvent::pointer(0, 300.0, 300.0));
        let report = stage.frame(0);
        assert!(report.follower.is_none());
        let ring = stage.scene().find(CURSOR_RING).unwrap();
        assert_eq!(stage.scene().property(ring, Property::X), Some(0.0));
    }
}
