//! Tween declarations: which properties of which elements move where.

use serde::{Deserialize, Serialize};
use vitrine_scene_model::{ElementId, Property, Scene};

use crate::easing::Ease;

/// Default tween duration in seconds.
pub const DEFAULT_DURATION: f64 = 0.5;

/// A property value, possibly resolved against the live scene.
///
/// Dynamic values are resolved once, when the owning tween first starts,
/// using the element's bounding box at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetValue {
    Fixed(f64),
    /// Horizontal translation that puts the element's center on the
    /// viewport's vertical center line.
    CenterInViewportX,
    /// Vertical translation that puts the element's center on the
    /// viewport's horizontal center line.
    CenterInViewportY,
}

impl TargetValue {
    /// Resolve against the current scene. Missing elements resolve to 0.
    pub fn resolve(self, scene: &Scene, element: ElementId) -> f64 {
        match self {
            TargetValue::Fixed(v) => v,
            TargetValue::CenterInViewportX => scene
                .viewport_rect(element)
                .map(|r| scene.viewport().center().x - r.center().x)
                .unwrap_or(0.0),
            TargetValue::CenterInViewportY => scene
                .viewport_rect(element)
                .map(|r| scene.viewport().center().y - r.center().y)
                .unwrap_or(0.0),
        }
    }
}

impl From<f64> for TargetValue {
    fn from(v: f64) -> Self {
        TargetValue::Fixed(v)
    }
}

/// One property's motion within a tween.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub property: Property,
    /// Explicit start value. `None` means "whatever the element shows
    /// when the tween starts".
    pub from: Option<TargetValue>,
    pub to: TargetValue,
}

/// A tween over one or more elements.
///
/// With several targets, each element's start is delayed by
/// `index * stagger` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub(crate) targets: Vec<ElementId>,
    pub(crate) tracks: Vec<Track>,
    pub(crate) duration: f64,
    pub(crate) ease: Ease,
    pub(crate) stagger: f64,
}

impl Tween {
    /// A tween over `targets` with no tracks yet.
    pub fn new(targets: impl Into<Vec<ElementId>>) -> Self {
        Self {
            targets: targets.into(),
            tracks: Vec::new(),
            duration: DEFAULT_DURATION,
            ease: Ease::default(),
            stagger: 0.0,
        }
    }

    /// A tween on a single element.
    pub fn on(target: ElementId) -> Self {
        Self::new(vec![target])
    }

    /// An empty tween that only occupies time in a timeline.
    pub fn hold(duration: f64) -> Self {
        Self::new(Vec::new()).duration(duration)
    }

    /// Animate `property` from an explicit value to another.
    pub fn from_to(
        mut self,
        property: Property,
        from: impl Into<TargetValue>,
        to: impl Into<TargetValue>,
    ) -> Self {
        self.tracks.push(Track {
            property,
            from: Some(from.into()),
            to: to.into(),
        });
        self
    }

    /// Animate `property` from its value at tween start.
    pub fn to(mut self, property: Property, to: impl Into<TargetValue>) -> Self {
        self.tracks.push(Track {
            property,
            from: None,
            to: to.into(),
        });
        self
    }

    /// Clip-path reveal from fully clipped at the top edge to unclipped.
    pub fn clip_reveal(self) -> Self {
        self.from_to(Property::ClipTop, 100.0, 0.0)
            .from_to(Property::ClipRight, 0.0, 0.0)
            .from_to(Property::ClipBottom, 0.0, 0.0)
            .from_to(Property::ClipLeft, 0.0, 0.0)
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Time from the first target's start to the last target's end.
    pub fn total_duration(&self) -> f64 {
        let staggered = self.targets.len().saturating_sub(1) as f64 * self.stagger;
        self.duration + staggered
    }

    /// Whether every track has an explicit start value, so the tween can
    /// render its start state before it begins.
    pub fn renders_immediately(&self) -> bool {
        !self.tracks.is_empty() && self.tracks.iter().all(|t| t.from.is_some())
    }
}
