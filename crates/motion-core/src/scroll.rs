//! Smooth scroll controller.
//!
//! Wheel input moves a target offset and the rendered offset chases it
//! with a frame-rate independent damp. Programmatic scrolls run an
//! exponential ease-out over a fixed duration instead.

use vitrine_common::ScrollSettings;
use vitrine_scene_model::{ElementId, Scene};

/// Destination of a programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTarget {
    Top,
    Offset(f64),
    /// The element's layout top edge.
    Element(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollToOptions {
    /// Added to the resolved destination.
    pub offset: f64,
    /// Seconds; `None` uses the configured default.
    pub duration: Option<f64>,
    /// Jump without animating.
    pub immediate: bool,
    /// Scroll even while the controller is stopped.
    pub force: bool,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            duration: None,
            immediate: false,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    elapsed: f64,
    duration: f64,
}

/// Exponential ease-out used by programmatic scrolls.
pub fn scroll_ease(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

/// Owner of the page's scroll offset.
#[derive(Debug, Clone)]
pub struct ScrollController {
    settings: ScrollSettings,
    current: f64,
    target: f64,
    limit: f64,
    stopped: bool,
    animation: Option<ScrollAnimation>,
}

impl ScrollController {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            current: 0.0,
            target: 0.0,
            limit: 0.0,
            stopped: false,
            animation: None,
        }
    }

    /// Adopt the scene's scroll range and offset.
    pub fn sync(&mut self, scene: &Scene) {
        self.set_limit(scene.max_scroll());
        if self.animation.is_none() && (self.current - self.target).abs() < f64::EPSILON {
            self.current = scene.scroll_offset().clamp(0.0, self.limit);
            self.target = self.current;
        }
    }

    /// Set the maximum scroll offset. Offsets beyond it are clamped.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
        self.current = self.current.clamp(0.0, self.limit);
        self.target = self.target.clamp(0.0, self.limit);
        if let Some(anim) = &mut self.animation {
            anim.to = anim.to.clamp(0.0, self.limit);
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Rendered scroll offset.
    pub fn offset(&self) -> f64 {
        self.current
    }

    /// Where the offset is heading.
    pub fn target(&self) -> f64 {
        self.animation.map(|a| a.to).unwrap_or(self.target)
    }

    /// Apply a wheel delta. Ignored while stopped.
    pub fn scroll_by(&mut self, dy: f64) -> bool {
        if self.stopped || !dy.is_finite() {
            return false;
        }
        self.animation = None;
        self.target = (self.target + dy).clamp(0.0, self.limit);
        true
    }

    /// Start a programmatic scroll. Returns `false` when the controller is
    /// stopped and the scroll was not forced, or the target is missing.
    pub fn scroll_to(&mut self, target: ScrollTarget, options: ScrollToOptions, scene: &Scene) -> bool {
        if self.stopped && !options.force {
            tracing::debug!(?target, "Scroll request ignored while stopped");
            return false;
        }
        let base = match target {
            ScrollTarget::Top => 0.0,
            ScrollTarget::Offset(v) => v,
            ScrollTarget::Element(id) => match scene.layout_rect(id) {
                Some(rect) => rect.y,
                None => {
                    tracing::debug!(element = id.0, "Scroll target not found");
                    return false;
                }
            },
        };
        let to = (base + options.offset).clamp(0.0, self.limit);
        let duration = options
            .duration
            .unwrap_or(self.settings.scroll_to_duration_secs);

        if options.immediate || duration <= 0.0 {
            self.animation = None;
            self.current = to;
            self.target = to;
        } else {
            self.animation = Some(ScrollAnimation {
                from: self.current,
                to,
                elapsed: 0.0,
                duration,
            });
        }
        tracing::debug!(to, duration, immediate = options.immediate, "Scroll started");
        true
    }

    /// Scroll to an element, keeping it clear of the navbar.
    pub fn scroll_to_section(&mut self, element: ElementId, scene: &Scene) -> bool {
        let options = ScrollToOptions {
            offset: self.settings.section_offset,
            ..Default::default()
        };
        self.scroll_to(ScrollTarget::Element(element), options, scene)
    }

    /// Freeze scrolling in place.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.animation = None;
        self.target = self.current;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_moving(&self) -> bool {
        self.animation.is_some() || (self.target - self.current).abs() > f64::EPSILON
    }

    /// Advance by `dt` seconds and return the new offset.
    pub fn update(&mut self, dt: f64) -> f64 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(mut anim) = self.animation {
            anim.elapsed += dt;
            let t = (anim.elapsed / anim.duration).min(1.0);
            if t >= 1.0 {
                self.current = anim.to;
                self.target = anim.to;
                self.animation = None;
            } else {
                self.current = anim.from + (anim.to - anim.from) * scroll_ease(t);
                self.target = self.current;
                self.animation = Some(anim);
            }
            return self.current;
        }

        let factor = 1.0 - (-self.settings.wheel_lerp * 60.0 * dt).exp();
        self.current += (self.target - self.current) * factor;
        if (self.target - self.current).abs() < 0.5 {
            self.current = self.target;
        }
        self.current
    }
}
