//! Scroll reveal sequencer.
//!
//! Entries pair a [`Timeline`] with a [`Driver`] that decides where its
//! playhead is each frame:
//!
//! - **Immediate:** plays once after a delay (intro sequences)
//! - **Manual:** paused until told to play or reverse (menus)
//! - **Persistent:** plays forward while the scroll offset is inside the
//!   trigger window and reverses outside it, in both scroll directions
//! - **Scrub:** playhead is a function of scroll offset within the window,
//!   optionally pinning the trigger element for the window's length
//!
//! Entries are grouped in contexts. A context snapshots every element it
//! touches and [`Sequencer::revert`] restores them and drops the entries,
//! so nothing from a reverted context renders or reports again.

use serde::Serialize;
use vitrine_common::{FrameTick, VitrineResult};
use vitrine_scene_model::{ElementId, PinSpacer, Scene, Selector, VisualState};

use crate::easing::Ease;
use crate::timeline::Timeline;
use crate::trigger::{TriggerSpec, TriggerWindow};

/// Handle to a sequencer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(pub u64);

/// Handle to a group of entries set up together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContextId(pub u64);

/// Scroll-bound playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubSpec {
    pub trigger: TriggerSpec,
    /// Seconds the rendered progress takes to catch up with scrolling.
    /// `None` binds progress to the scroll offset directly.
    pub lag: Option<f64>,
    /// Hold the trigger element in place while inside the window, and
    /// push everything below it down by the window's length.
    pub pin: bool,
}

/// What moves an entry's playhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Driver {
    Immediate { delay: f64 },
    Manual,
    Persistent(TriggerSpec),
    Scrub(ScrubSpec),
}

impl Driver {
    fn trigger(&self) -> Option<&TriggerSpec> {
        match self {
            Driver::Persistent(spec) => Some(spec),
            Driver::Scrub(scrub) => Some(&scrub.trigger),
            _ => None,
        }
    }

    fn pinned(&self) -> Option<&TriggerSpec> {
        match self {
            Driver::Scrub(scrub) if scrub.pin => Some(&scrub.trigger),
            _ => None,
        }
    }
}

/// Discrete state of a toggled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    Idle,
    Played,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// Something observable that happened to an entry during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequencerEvent {
    pub entry: EntryId,
    pub kind: SequencerEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SequencerEventKind {
    /// The scroll offset entered (`true`) or left (`false`) the window.
    Toggled { active: bool },
    /// Playhead reached the end moving forward.
    Completed,
    /// Playhead reached the start moving backward.
    ReverseCompleted,
}

/// Read-only view of an entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    pub id: EntryId,
    pub label: String,
    /// Toggle state for persistent entries.
    pub state: Option<RevealState>,
    /// Scroll-derived progress for scrub entries, playhead fraction otherwise.
    pub progress: f64,
    /// Rendered playhead as a fraction of the timeline.
    pub rendered_progress: f64,
    pub playing: bool,
    pub direction: Direction,
    pub window: Option<TriggerWindow>,
}

#[derive(Debug, Clone, Copy)]
struct CatchUp {
    from: f64,
    to: f64,
    elapsed: f64,
}

#[derive(Debug)]
struct Entry {
    id: EntryId,
    context: ContextId,
    label: String,
    timeline: Timeline,
    driver: Driver,
    window: Option<TriggerWindow>,
    playhead: f64,
    direction: Direction,
    playing: bool,
    delay_left: f64,
    active: Option<bool>,
    scroll_progress: f64,
    rendered_progress: f64,
    catch_up: Option<CatchUp>,
    last_rendered: Option<f64>,
}

impl Entry {
    fn advance(&mut self, dt: f64, events: &mut Vec<SequencerEvent>) {
        if !self.playing {
            return;
        }
        let duration = self.timeline.duration();
        match self.direction {
            Direction::Forward => {
                self.playhead = (self.playhead + dt).min(duration);
                if self.playhead >= duration {
                    self.playing = false;
                    events.push(SequencerEvent {
                        entry: self.id,
                        kind: SequencerEventKind::Completed,
                    });
                }
            }
            Direction::Backward => {
                self.playhead = (self.playhead - dt).max(0.0);
                if self.playhead <= 0.0 {
                    self.playing = false;
                    events.push(SequencerEvent {
                        entry: self.id,
                        kind: SequencerEventKind::ReverseCompleted,
                    });
                }
            }
        }
    }

    /// Record a toggle. The first evaluation only reports entering.
    fn toggle(&mut self, active: bool, events: &mut Vec<SequencerEvent>) -> bool {
        let first = self.active.is_none();
        if self.active == Some(active) {
            return false;
        }
        self.active = Some(active);
        if first && !active {
            return false;
        }
        events.push(SequencerEvent {
            entry: self.id,
            kind: SequencerEventKind::Toggled { active },
        });
        true
    }

    fn fraction(&self) -> f64 {
        let duration = self.timeline.duration();
        if duration > 0.0 {
            (self.playhead / duration).clamp(0.0, 1.0)
        } else if self.playhead > 0.0 || self.rendered_progress > 0.0 {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    element: ElementId,
    visual: VisualState,
    pin_offset: f64,
}

#[derive(Debug)]
struct ContextRecord {
    id: ContextId,
    name: String,
    snapshots: Vec<Snapshot>,
}

impl ContextRecord {
    fn snapshot(&mut self, scene: &Scene, element: ElementId) {
        if self.snapshots.iter().any(|s| s.element == element) {
            return;
        }
        if let Some(e) = scene.get(element) {
            self.snapshots.push(Snapshot {
                element,
                visual: e.visual,
                pin_offset: e.pin_offset,
            });
        }
    }
}

/// Owner of every scroll and time driven animation on a page.
#[derive(Debug, Default)]
pub struct Sequencer {
    entries: Vec<Entry>,
    contexts: Vec<ContextRecord>,
    next_id: u64,
}

/// Registration handle passed to [`Sequencer::context`] setup closures.
pub struct MotionContext<'a> {
    sequencer: &'a mut Sequencer,
    scene: &'a mut Scene,
    id: ContextId,
}

impl MotionContext<'_> {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.scene.find(name)
    }

    pub fn select(&self, selector: &Selector) -> Vec<ElementId> {
        self.scene.select(selector)
    }

    /// Register a timeline.
    ///
    /// Entries with no targets, or whose trigger element does not exist,
    /// are skipped and `None` is returned.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        timeline: Timeline,
        driver: Driver,
    ) -> Option<EntryId> {
        let label = label.into();
        if timeline.is_empty() {
            tracing::debug!(label = %label, "Skipping animation without targets");
            return None;
        }
        if let Some(spec) = driver.trigger() {
            if self.scene.get(spec.trigger).is_none() {
                tracing::debug!(label = %label, "Skipping animation with missing trigger");
                return None;
            }
        }
        self.sequencer
            .register(self.id, label, timeline, driver, self.scene)
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `setup` inside a new context.
    ///
    /// If `setup` fails, everything it registered is reverted before the
    /// error is returned.
    pub fn context<F>(&mut self, scene: &mut Scene, name: &str, setup: F) -> VitrineResult<ContextId>
    where
        F: FnOnce(&mut MotionContext<'_>) -> VitrineResult<()>,
    {
        let id = ContextId(self.alloc_id());
        self.contexts.push(ContextRecord {
            id,
            name: name.to_string(),
            snapshots: Vec::new(),
        });

        let result = {
            let mut ctx = MotionContext {
                sequencer: self,
                scene,
                id,
            };
            setup(&mut ctx)
        };

        match result {
            Ok(()) => {
                self.refresh(scene);
                tracing::debug!(
                    context = name,
                    entries = self.entries_in(id).len(),
                    "Motion context ready"
                );
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(context = name, error = %e, "Motion context setup failed; reverting");
                self.revert(id, scene);
                Err(e)
            }
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn register(
        &mut self,
        context: ContextId,
        label: String,
        mut timeline: Timeline,
        driver: Driver,
        scene: &mut Scene,
    ) -> Option<EntryId> {
        let record = self.contexts.iter_mut().find(|c| c.id == context)?;
        for target in timeline.targets() {
            record.snapshot(scene, target);
        }
        if let Some(spec) = driver.pinned() {
            record.snapshot(scene, spec.trigger);
        }

        timeline.render_initial(scene);

        let id = EntryId(self.alloc_id());
        let window = driver.trigger().and_then(|spec| spec.compute(scene));
        let (delay_left, playing) = match driver {
            Driver::Immediate { delay } => (delay.max(0.0), true),
            _ => (0.0, false),
        };
        self.entries.push(Entry {
            id,
            context,
            label,
            timeline,
            driver,
            window,
            playhead: 0.0,
            direction: Direction::Forward,
            playing,
            delay_left,
            active: None,
            scroll_progress: 0.0,
            rendered_progress: 0.0,
            catch_up: None,
            last_rendered: None,
        });
        Some(id)
    }

    /// Revert a context: restore every element it touched and drop its
    /// entries. Returns `false` if the context was already reverted.
    pub fn revert(&mut self, context: ContextId, scene: &mut Scene) -> bool {
        let Some(pos) = self.contexts.iter().position(|c| c.id == context) else {
            return false;
        };
        let record = self.contexts.remove(pos);
        let before = self.entries.len();
        self.entries.retain(|e| e.context != context);

        for snapshot in record.snapshots.iter().rev() {
            scene.set_visual(snapshot.element, snapshot.visual);
            scene.set_pin_offset(snapshot.element, snapshot.pin_offset);
        }
        self.refresh(scene);

        tracing::debug!(
            context = %record.name,
            entries = before - self.entries.len(),
            "Motion context reverted"
        );
        true
    }

    /// Revert every context, newest first.
    pub fn revert_all(&mut self, scene: &mut Scene) {
        let ids: Vec<ContextId> = self.contexts.iter().rev().map(|c| c.id).collect();
        for id in ids {
            self.revert(id, scene);
        }
    }

    /// Recompute trigger windows and pin spacing against the current
    /// layout. Call after the viewport or layout changes.
    pub fn refresh(&mut self, scene: &mut Scene) {
        let mut pinned: Vec<(f64, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                let spec = e.driver.pinned()?;
                scene.get(spec.trigger).map(|el| (el.rect.y, i))
            })
            .collect();
        pinned.sort_by(|a, b| a.0.total_cmp(&b.0));

        scene.set_pin_spacers(Vec::new());
        let mut spacers = Vec::new();
        for (_, i) in pinned {
            let Some(spec) = self.entries[i].driver.pinned().copied() else {
                continue;
            };
            if let (Some(window), Some(el)) = (spec.compute(scene), scene.get(spec.trigger)) {
                spacers.push(PinSpacer {
                    below: el.rect.bottom(),
                    amount: window.length(),
                });
                scene.set_pin_spacers(spacers.clone());
            }
        }

        for entry in &mut self.entries {
            entry.window = entry.driver.trigger().and_then(|spec| spec.compute(scene));
        }
    }

    /// Advance every entry by one frame at scroll offset `scroll`.
    pub fn update(
        &mut self,
        tick: &FrameTick,
        scroll: f64,
        scene: &mut Scene,
    ) -> Vec<SequencerEvent> {
        let dt = tick.dt_secs.max(0.0);
        let mut events = Vec::new();

        for entry in &mut self.entries {
            match entry.driver {
                Driver::Immediate { .. } => {
                    if entry.delay_left > 0.0 {
                        entry.delay_left -= dt;
                        if entry.delay_left > 0.0 {
                            continue;
                        }
                        let carry = -entry.delay_left;
                        entry.delay_left = 0.0;
                        entry.advance(carry, &mut events);
                    } else {
                        entry.advance(dt, &mut events);
                    }
                }
                Driver::Manual => entry.advance(dt, &mut events),
                Driver::Persistent(_) => {
                    let Some(window) = entry.window else {
                        continue;
                    };
                    let active = window.contains(scroll);
                    if entry.toggle(active, &mut events) {
                        entry.direction = if active {
                            Direction::Forward
                        } else {
                            Direction::Backward
                        };
                        entry.playing = true;
                        tracing::trace!(label = %entry.label, active, "Reveal toggled");
                    }
                    entry.advance(dt, &mut events);
                }
                Driver::Scrub(scrub) => {
                    let Some(window) = entry.window else {
                        continue;
                    };
                    let first = entry.active.is_none();
                    entry.toggle(window.contains(scroll), &mut events);

                    let target = window.progress(scroll);
                    entry.scroll_progress = target;
                    match scrub.lag {
                        Some(lag) if lag > 0.0 && !first => {
                            let retarget = match entry.catch_up {
                                Some(c) => (c.to - target).abs() > f64::EPSILON,
                                None => (entry.rendered_progress - target).abs() > f64::EPSILON,
                            };
                            if retarget {
                                entry.catch_up = Some(CatchUp {
                                    from: entry.rendered_progress,
                                    to: target,
                                    elapsed: 0.0,
                                });
                            }
                            if let Some(mut c) = entry.catch_up {
                                c.elapsed += dt;
                                let p = (c.elapsed / lag).min(1.0);
                                entry.rendered_progress =
                                    c.from + (c.to - c.from) * Ease::PowerOut(3).apply(p);
                                entry.catch_up = if p >= 1.0 { None } else { Some(c) };
                            }
                        }
                        _ => {
                            entry.catch_up = None;
                            entry.rendered_progress = target;
                        }
                    }
                    entry.playhead = entry.rendered_progress * entry.timeline.duration();

                    if scrub.pin {
                        let held = scroll.clamp(window.start, window.end.max(window.start));
                        scene.set_pin_offset(scrub.trigger.trigger, held - window.start);
                    }
                }
            }

            if entry.last_rendered != Some(entry.playhead) {
                entry.timeline.render(entry.playhead, scene);
                entry.last_rendered = Some(entry.playhead);
            }
        }

        events
    }

    /// Play a manual (or any) entry forward from its current playhead.
    pub fn play(&mut self, entry: EntryId) -> bool {
        self.set_direction(entry, Direction::Forward)
    }

    /// Play an entry backward from its current playhead.
    pub fn reverse(&mut self, entry: EntryId) -> bool {
        self.set_direction(entry, Direction::Backward)
    }

    fn set_direction(&mut self, entry: EntryId, direction: Direction) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry) {
            Some(e) => {
                e.direction = direction;
                e.playing = true;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, entry: EntryId) -> Option<EntryStatus> {
        let e = self.entries.iter().find(|e| e.id == entry)?;
        let state = match e.driver {
            Driver::Persistent(_) => Some(if e.active == Some(true) {
                RevealState::Played
            } else {
                RevealState::Idle
            }),
            _ => None,
        };
        let progress = match e.driver {
            Driver::Scrub(_) => e.scroll_progress,
            _ => e.fraction(),
        };
        Some(EntryStatus {
            id: e.id,
            label: e.label.clone(),
            state,
            progress,
            rendered_progress: e.fraction(),
            playing: e.playing,
            direction: e.direction,
            window: e.window,
        })
    }

    pub fn statuses(&self) -> Vec<EntryStatus> {
        self.entries
            .iter()
            .filter_map(|e| self.status(e.id))
            .collect()
    }

    pub fn window(&self, entry: EntryId) -> Option<TriggerWindow> {
        self.entries.iter().find(|e| e.id == entry)?.window
    }

    /// Entries registered by a live context.
    pub fn entries_in(&self, context: ContextId) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|e| e.context == context)
            .map(|e| e.id)
            .collect()
    }

    pub fn contains(&self, entry: EntryId) -> bool {
        self.entries.iter().any(|e| e.id == entry)
    }

    pub fn is_live(&self, context: ContextId) -> bool {
        self.contexts.iter().any(|c| c.id == context)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}
