//! Timelines: tweens placed on a shared time axis.
//!
//! Children run in declared order. A child is placed at the current end
//! of the timeline unless a [`Position`] moves it; negative offsets make
//! it overlap the previous child. Staggered tweens expand into one child
//! per target.
//!
//! Rendering is explicit: callers render a timeline at a time value
//! only when that value changes, so several timelines can share an
//! element and the most recently moved one wins.

use std::collections::HashSet;
use std::str::FromStr;

use vitrine_common::VitrineError;
use vitrine_scene_model::{ElementId, Property, Scene};

use crate::easing::Ease;
use crate::tween::{Track, Tween};

/// Where a tween is inserted in a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// At the current end of the timeline.
    #[default]
    Sequential,
    /// Relative to the current end (`"-=0.5"`, `"+=1"`).
    Offset(f64),
    /// Absolute time in seconds.
    At(f64),
}

impl FromStr for Position {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| VitrineError::timeline(format!("bad position: {s}")))
        };
        if s.is_empty() || s == ">" {
            Ok(Position::Sequential)
        } else if let Some(rest) = s.strip_prefix("-=") {
            Ok(Position::Offset(-parse(rest)?))
        } else if let Some(rest) = s.strip_prefix("+=") {
            Ok(Position::Offset(parse(rest)?))
        } else {
            Ok(Position::At(parse(s)?.max(0.0)))
        }
    }
}

/// Per-track runtime state.
#[derive(Debug, Clone, Copy)]
struct TrackState {
    track: Track,
    resolved: Option<(f64, f64)>,
}

/// A single-element tween placed on the timeline.
#[derive(Debug, Clone)]
struct Child {
    target: Option<ElementId>,
    start: f64,
    duration: f64,
    ease: Ease,
    tracks: Vec<TrackState>,
    immediate: bool,
}

impl Child {
    fn initialized(&self) -> bool {
        self.tracks.iter().all(|t| t.resolved.is_some())
    }

    fn initialize(&mut self, scene: &Scene) {
        let Some(target) = self.target else {
            return;
        };
        for state in &mut self.tracks {
            if state.resolved.is_none() {
                let from = match state.track.from {
                    Some(v) => v.resolve(scene, target),
                    None => scene.property(target, state.track.property).unwrap_or(0.0),
                };
                let to = state.track.to.resolve(scene, target);
                state.resolved = Some((from, to));
            }
        }
    }

    fn progress_at(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            if time >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((time - self.start) / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// An ordered sequence of tweens.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    children: Vec<Child>,
    duration: f64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline holding a single tween at time 0.
    pub fn single(tween: Tween) -> Self {
        Self::new().then(tween)
    }

    /// Append a tween at the end of the timeline.
    pub fn then(self, tween: Tween) -> Self {
        self.at(tween, Position::Sequential)
    }

    /// Insert a tween at `position`.
    pub fn at(mut self, tween: Tween, position: Position) -> Self {
        self.push(tween, position);
        self
    }

    /// Insert a tween at `position`, returning its start time.
    pub fn push(&mut self, tween: Tween, position: Position) -> f64 {
        let start = match position {
            Position::Sequential => self.duration,
            Position::Offset(offset) => (self.duration + offset).max(0.0),
            Position::At(at) => at.max(0.0),
        };

        let tracks: Vec<TrackState> = tween
            .tracks
            .iter()
            .map(|track| TrackState {
                track: *track,
                resolved: None,
            })
            .collect();
        let immediate = tween.renders_immediately();

        if tween.targets.is_empty() {
            self.children.push(Child {
                target: None,
                start,
                duration: tween.duration,
                ease: tween.ease,
                tracks: Vec::new(),
                immediate: false,
            });
        } else {
            for (i, target) in tween.targets.iter().enumerate() {
                self.children.push(Child {
                    target: Some(*target),
                    start: start + i as f64 * tween.stagger,
                    duration: tween.duration,
                    ease: tween.ease,
                    tracks: tracks.clone(),
                    immediate,
                });
            }
        }

        self.duration = self.duration.max(start + tween.total_duration());
        start
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|c| c.target.is_none())
    }

    /// Every element this timeline writes, in first-use order.
    pub fn targets(&self) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        self.children
            .iter()
            .filter_map(|c| c.target)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Start times of the children targeting `element`.
    pub fn start_times(&self, element: ElementId) -> Vec<f64> {
        self.children
            .iter()
            .filter(|c| c.target == Some(element))
            .map(|c| c.start)
            .collect()
    }

    /// Write the start state of every tween that declares explicit start
    /// values, without starting anything.
    pub fn render_initial(&mut self, scene: &mut Scene) {
        let mut written = HashSet::new();
        for child in &mut self.children {
            let Some(target) = child.target else {
                continue;
            };
            if !child.immediate {
                continue;
            }
            for state in &child.tracks {
                let key = (target, state.track.property);
                if written.insert(key) {
                    if let Some(from) = state.track.from {
                        let value = from.resolve(scene, target);
                        scene.set_property(target, state.track.property, value);
                    }
                }
            }
        }
    }

    /// Render the timeline at `time` seconds.
    ///
    /// Tweens that have not started yet render their start state only if
    /// no earlier tween in this timeline already wrote the same property.
    pub fn render(&mut self, time: f64, scene: &mut Scene) {
        let time = time.clamp(0.0, self.duration);
        let mut written: HashSet<(ElementId, Property)> = HashSet::new();

        for child in &mut self.children {
            let Some(target) = child.target else {
                continue;
            };

            let started = time > child.start || (time >= child.start && time > 0.0);
            if started && !child.initialized() {
                child.initialize(scene);
                tracing::trace!(
                    element = target.0,
                    start = child.start,
                    "Tween initialized"
                );
            }

            let before_start = time < child.start;
            if before_start && !child.initialized() && !child.immediate {
                continue;
            }

            let eased = child.ease.apply(child.progress_at(time));
            for state in &child.tracks {
                let key = (target, state.track.property);
                if before_start && written.contains(&key) {
                    continue;
                }
                let value = match state.resolved {
                    Some((from, _)) if before_start => from,
                    Some((from, to)) => from + (to - from) * eased,
                    None => match state.track.from {
                        Some(from) => from.resolve(scene, target),
                        None => continue,
                    },
                };
                scene.set_property(target, state.track.property, value);
                written.insert(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_scene_model::{Element, Rect, ViewportSize};

    fn scene_with(n: usize) -> (Scene, Vec<ElementId>) {
        let mut scene = Scene::new(ViewportSize::new(1000.0, 800.0));
        let ids = (0..n)
            .map(|i| {
                scene
                    .insert(Element::new(
                        format!("el{i}"),
                        "div",
                        Rect::new(0.0, i as f64 * 100.0, 100.0, 50.0),
                    ))
                    .unwrap()
            })
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("".parse::<Position>().unwrap(), Position::Sequential);
        assert_eq!("-=0.5".parse::<Position>().unwrap(), Position::Offset(-0.5));
        assert_eq!("+=1".parse::<Position>().unwrap(), Position::Offset(1.0));
        assert_eq!("2.5".parse::<Position>().unwrap(), Position::At(2.5));
        assert!("-=abc".parse::<Position>().is_err());
    }

    #[test]
    fn test_sequential_and_overlap_placement() {
        let (_, ids) = scene_with(3);
        let mut tl = Timeline::new();
        let a = tl.push(
            Tween::on(ids[0]).from_to(Property::Opacity, 0.0, 1.0).duration(0.8),
            Position::Sequential,
        );
        let b = tl.push(
            Tween::on(ids[1]).from_to(Property::Opacity, 0.0, 1.0).duration(0.8),
            Position::Offset(-0.3),
        );
        let c = tl.push(Tween::hold(2.0), Position::Sequential);
        assert_eq!(a, 0.0);
        assert!((b - 0.5).abs() < 1e-12);
        assert!((c - 1.3).abs() < 1e-12);
        assert!((tl.duration() - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_never_before_zero() {
        let (_, ids) = scene_with(1);
        let mut tl = Timeline::new();
        let start = tl.push(
            Tween::on(ids[0]).to(Property::X, 10.0),
            Position::Offset(-5.0),
        );
        assert_eq!(start, 0.0);
    }

    #[test]
    fn test_stagger_offsets_each_target() {
        let (mut scene, ids) = scene_with(3);
        let mut tl = Timeline::single(
            Tween::new(ids.clone())
                .from_to(Property::Opacity, 0.0, 1.0)
                .duration(1.0)
                .stagger(0.15)
                .ease(Ease::Linear),
        );
        assert_eq!(tl.start_times(ids[2]), vec![0.3]);
        assert!((tl.duration() - 1.3).abs() < 1e-12);

        tl.render(0.5, &mut scene);
        assert!((scene.property(ids[0], Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
        assert!((scene.property(ids[1], Property::Opacity).unwrap() - 0.35).abs() < 1e-9);
        assert!((scene.property(ids[2], Property::Opacity).unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_render_initial_applies_from_state() {
        let (mut scene, ids) = scene_with(2);
        let mut tl = Timeline::new()
            .then(Tween::on(ids[0]).from_to(Property::Y, 60.0, 0.0))
            .then(Tween::on(ids[1]).to(Property::Y, 30.0));
        tl.render_initial(&mut scene);
        assert_eq!(scene.property(ids[0], Property::Y), Some(60.0));
        // Plain `to` tweens do not render before they start
        assert_eq!(scene.property(ids[1], Property::Y), Some(0.0));
    }

    #[test]
    fn test_to_tween_captures_value_at_start() {
        let (mut scene, ids) = scene_with(1);
        scene.set_property(ids[0], Property::Opacity, 0.4);
        let mut tl = Timeline::single(
            Tween::on(ids[0])
                .to(Property::Opacity, 0.0)
                .duration(2.0)
                .ease(Ease::Linear),
        );
        tl.render(0.0, &mut scene);
        assert_eq!(scene.property(ids[0], Property::Opacity), Some(0.4));

        tl.render(1.0, &mut scene);
        assert!((scene.property(ids[0], Property::Opacity).unwrap() - 0.2).abs() < 1e-9);

        // Back to the start restores the captured value
        tl.render(0.0, &mut scene);
        assert!((scene.property(ids[0], Property::Opacity).unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_later_tween_does_not_clobber_before_start() {
        let (mut scene, ids) = scene_with(1);
        let mut tl = Timeline::new()
            .then(
                Tween::on(ids[0])
                    .from_to(Property::X, 0.0, 100.0)
                    .duration(1.0)
                    .ease(Ease::Linear),
            )
            .then(
                Tween::on(ids[0])
                    .from_to(Property::X, 100.0, 200.0)
                    .duration(1.0)
                    .ease(Ease::Linear),
            );
        tl.render(0.5, &mut scene);
        assert!((scene.property(ids[0], Property::X).unwrap() - 50.0).abs() < 1e-9);
        tl.render(1.5, &mut scene);
        assert!((scene.property(ids[0], Property::X).unwrap() - 150.0).abs() < 1e-9);
        tl.render(0.25, &mut scene);
        assert!((scene.property(ids[0], Property::X).unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_dynamic_value_resolved_once() {
        let (mut scene, ids) = scene_with(1);
        let mut tl = Timeline::single(
            Tween::on(ids[0])
                .to(Property::X, crate::tween::TargetValue::CenterInViewportX)
                .duration(1.0)
                .ease(Ease::Linear),
        );
        tl.render(1.0, &mut scene);
        // Element center x = 50, viewport center x = 500
        assert!((scene.property(ids[0], Property::X).unwrap() - 450.0).abs() < 1e-9);

        // Moving the element afterwards does not change the resolved target
        scene.get_mut(ids[0]).unwrap().rect.x = 300.0;
        tl.render(1.0, &mut scene);
        assert!((scene.property(ids[0], Property::X).unwrap() - 450.0).abs() < 1e-9);
    }
}
