//! Scroll trigger points and windows.
//!
//! A trigger point pairs an edge of the trigger element with an edge of
//! the viewport: `"top 85%"` fires when the element's top edge reaches
//! 85% of the way down the viewport. The scroll offset at which that
//! happens is the element edge's document position minus the viewport
//! edge's offset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitrine_common::{VitrineError, VitrineResult};
use vitrine_scene_model::{ElementId, Scene};

/// A position along an element or the viewport, measured from its top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Fraction of the length, as a percentage.
    Percent(f64),
    /// Absolute distance from the top, in pixels.
    Pixels(f64),
}

impl Edge {
    /// Distance from the top of a span of `length` pixels.
    pub fn offset_in(self, length: f64) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => length / 2.0,
            Edge::Bottom => length,
            Edge::Percent(p) => length * p / 100.0,
            Edge::Pixels(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| VitrineError::trigger(format!("bad edge: {s}")))
        };
        match s.trim() {
            "top" => Ok(Edge::Top),
            "center" => Ok(Edge::Center),
            "bottom" => Ok(Edge::Bottom),
            other => {
                if let Some(p) = other.strip_suffix('%') {
                    Ok(Edge::Percent(number(p)?))
                } else if let Some(px) = other.strip_suffix("px") {
                    Ok(Edge::Pixels(number(px)?))
                } else {
                    Ok(Edge::Pixels(number(other)?))
                }
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => write!(f, "top"),
            Edge::Center => write!(f, "center"),
            Edge::Bottom => write!(f, "bottom"),
            Edge::Percent(p) => write!(f, "{p}%"),
            Edge::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// `"<element edge> <viewport edge>"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerPoint {
    pub element: Edge,
    pub viewport: Edge,
}

impl TriggerPoint {
    pub fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this point is reached for `trigger`.
    pub fn scroll_offset(&self, scene: &Scene, trigger: ElementId) -> Option<f64> {
        let rect = scene.layout_rect(trigger)?;
        let element_y = rect.y + self.element.offset_in(rect.h);
        let viewport_y = self.viewport.offset_in(scene.viewport().height);
        Some(element_y - viewport_y)
    }
}

impl FromStr for TriggerPoint {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let element = parts
            .next()
            .ok_or_else(|| VitrineError::trigger("empty trigger point"))?
            .parse::<Edge>()?;
        // A lone edge applies to both, like "top" meaning "top top"
        let viewport = match parts.next() {
            Some(v) => v.parse::<Edge>()?,
            None => element,
        };
        if parts.next().is_some() {
            return Err(VitrineError::trigger(format!(
                "trigger point has too many parts: {s}"
            )));
        }
        Ok(TriggerPoint { element, viewport })
    }
}

impl fmt::Display for TriggerPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// End of a trigger window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerEnd {
    Point(TriggerPoint),
    /// Pixels after the start (`"+=2500"`).
    Distance(f64),
}

impl FromStr for TriggerEnd {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("+=") {
            Some(distance) => distance
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(TriggerEnd::Distance)
                .ok_or_else(|| VitrineError::trigger(format!("bad end distance: {s}"))),
            None => s.parse::<TriggerPoint>().map(TriggerEnd::Point),
        }
    }
}

/// The scroll range during which an entry is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerWindow {
    pub start: f64,
    pub end: f64,
}

impl TriggerWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether `scroll` lies inside the window (inclusive).
    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll <= self.end
    }

    /// Linear progress through the window, clamped to `[0, 1]`.
    ///
    /// A degenerate window acts as a step at its start.
    pub fn progress(&self, scroll: f64) -> f64 {
        let length = self.end - self.start;
        if length <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / length).clamp(0.0, 1.0)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Where a trigger is attached and when it starts and ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    pub trigger: ElementId,
    pub start: TriggerPoint,
    pub end: TriggerEnd,
}

impl TriggerSpec {
    /// Parse start and end strings, e.g. `("top 85%", "top 15%")`.
    pub fn new(trigger: ElementId, start: &str, end: &str) -> VitrineResult<Self> {
        Ok(Self {
            trigger,
            start: start.parse::<TriggerPoint>()?,
            end: end.parse::<TriggerEnd>()?,
        })
    }

    /// Compute the window against the current layout.
    ///
    /// Returns `None` when the trigger element is missing.
    pub fn compute(&self, scene: &Scene) -> Option<TriggerWindow> {
        let start = self.start.scroll_offset(scene, self.trigger)?;
        let end = match self.end {
            TriggerEnd::Point(point) => point.scroll_offset(scene, self.trigger)?,
            TriggerEnd::Distance(distance) => start + distance,
        };
        Some(TriggerWindow::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_scene_model::{Element, Rect, ViewportSize};

    fn scene() -> (Scene, ElementId) {
        let mut scene = Scene::new(ViewportSize::new(1200.0, 1000.0));
        let id = scene
            .insert(Element::new("heading", "h2", Rect::new(0.0, 2000.0, 800.0, 200.0)))
            .unwrap();
        scene
            .insert(Element::new("footer", "footer", Rect::new(0.0, 4000.0, 1200.0, 300.0)))
            .unwrap();
        (scene, id)
    }

    #[test]
    fn test_parse_points() {
        let p: TriggerPoint = "top 85%".parse().unwrap();
        assert_eq!(p, TriggerPoint::new(Edge::Top, Edge::Percent(85.0)));
        let p: TriggerPoint = "bottom 60%".parse().unwrap();
        assert_eq!(p, TriggerPoint::new(Edge::Bottom, Edge::Percent(60.0)));
        let p: TriggerPoint = "top".parse().unwrap();
        assert_eq!(p, TriggerPoint::new(Edge::Top, Edge::Top));
        let p: TriggerPoint = "center 100px".parse().unwrap();
        assert_eq!(p, TriggerPoint::new(Edge::Center, Edge::Pixels(100.0)));
        assert!("top 85% extra".parse::<TriggerPoint>().is_err());
        assert!("middle 50%".parse::<TriggerPoint>().is_err());
        assert!("".parse::<TriggerPoint>().is_err());
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(
            "+=2500".parse::<TriggerEnd>().unwrap(),
            TriggerEnd::Distance(2500.0)
        );
        assert!(matches!(
            "top 15%".parse::<TriggerEnd>().unwrap(),
            TriggerEnd::Point(_)
        ));
        assert!("+=-5".parse::<TriggerEnd>().is_err());
    }

    #[test]
    fn test_window_from_percentages() {
        let (scene, id) = scene();
        let window = TriggerSpec::new(id, "top 80%", "top 15%")
            .unwrap()
            .compute(&scene)
            .unwrap();
        assert!((window.start - 1200.0).abs() < 1e-9);
        assert!((window.end - 1850.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_with_distance_end() {
        let (scene, id) = scene();
        let window = TriggerSpec::new(id, "top top", "+=2500")
            .unwrap()
            .compute(&scene)
            .unwrap();
        assert_eq!(window, TriggerWindow::new(2000.0, 4500.0));
    }

    #[test]
    fn test_missing_trigger_yields_none() {
        let (scene, _) = scene();
        let spec = TriggerSpec::new(ElementId(42), "top 80%", "top 15%").unwrap();
        assert!(spec.compute(&scene).is_none());
    }

    #[test]
    fn test_progress_clamped_and_linear() {
        let w = TriggerWindow::new(100.0, 300.0);
        assert_eq!(w.progress(0.0), 0.0);
        assert_eq!(w.progress(100.0), 0.0);
        assert_eq!(w.progress(200.0), 0.5);
        assert_eq!(w.progress(300.0), 1.0);
        assert_eq!(w.progress(1000.0), 1.0);
        assert!(w.contains(100.0) && w.contains(300.0) && !w.contains(300.5));

        let step = TriggerWindow::new(50.0, 50.0);
        assert_eq!(step.progress(49.0), 0.0);
        assert_eq!(step.progress(50.0), 1.0);
    }
}
