//! Pointer follower: a ring that trails the pointer and a dot that sits on it.
//!
//! Every frame the ring closes a fixed fraction of the distance to the
//! latest pointer sample, and its scale closes a fraction of the distance
//! to the hover or rest scale. The dot is written at the raw pointer
//! position without smoothing.

use serde::Serialize;
use vitrine_common::CursorSettings;
use vitrine_scene_model::{ElementId, Point2D, Property, Scene, Selector};

/// Which part of the page the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSection {
    Navbar,
    Main,
}

/// Snapshot of the follower's state for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FollowerState {
    pub position: Point2D,
    pub target: Point2D,
    pub scale: f64,
    pub hovering: bool,
    pub flashing: bool,
}

#[derive(Debug, Clone)]
pub struct PointerFollower {
    settings: CursorSettings,
    ring: Option<ElementId>,
    dot: Option<ElementId>,
    /// Interactive elements present when the follower started.
    interactive: Vec<ElementId>,
    position: Point2D,
    target: Point2D,
    scale: f64,
    hovering: bool,
    hit: Option<ElementId>,
    section: Option<PointerSection>,
    flash_until_ns: Option<u64>,
    flashing: bool,
    running: bool,
    frames: u64,
}

impl PointerFollower {
    /// Set up the follower, or `None` if the host has no hover-capable
    /// pointer.
    ///
    /// Interactive elements are collected once, here. Elements inserted
    /// into the scene later never change the hover state.
    pub fn start(
        settings: CursorSettings,
        hover_capable: bool,
        scene: &Scene,
        ring: Option<ElementId>,
        dot: Option<ElementId>,
    ) -> Option<Self> {
        if !hover_capable {
            tracing::info!("No hover-capable pointer; follower disabled");
            return None;
        }
        let interactive = scene.select(&Selector::interactive());
        tracing::debug!(
            interactive = interactive.len(),
            ring = ring.is_some(),
            dot = dot.is_some(),
            "Pointer follower started"
        );
        Some(Self {
            scale: settings.rest_scale,
            settings,
            ring,
            dot,
            interactive,
            position: Point2D::ORIGIN,
            target: Point2D::ORIGIN,
            hovering: false,
            hit: None,
            section: None,
            flash_until_ns: None,
            flashing: false,
            running: true,
            frames: 0,
        })
    }

    /// Record a pointer sample in viewport coordinates.
    pub fn on_pointer_move(&mut self, point: Point2D, now_ns: u64, scene: &Scene) {
        if !self.running || !point.is_finite() {
            return;
        }
        self.target = point;

        let section = if point.y < self.settings.navbar_height {
            PointerSection::Navbar
        } else {
            PointerSection::Main
        };
        if self.section.is_some_and(|last| last != section) {
            self.flash_until_ns = Some(now_ns + self.settings.flash_ms * 1_000_000);
            tracing::trace!(?section, "Pointer changed section");
        }
        self.section = Some(section);
        self.update_hit(scene);
    }

    /// Hit-test the last pointer sample again. Called when the page
    /// scrolls under a pointer that has not moved.
    pub fn refresh_hover(&mut self, scene: &Scene) {
        if self.running && self.section.is_some() {
            self.update_hit(scene);
        }
    }

    fn update_hit(&mut self, scene: &Scene) {
        let hit = scene.hit_test(self.target, &self.interactive);
        if hit != self.hit {
            if let Some(left) = self.hit {
                self.on_hover_leave(left);
            }
            if let Some(entered) = hit {
                self.on_hover_enter(entered);
            }
            self.hit = hit;
        }
    }

    /// The pointer entered `element`. Ignored for elements outside the
    /// setup snapshot.
    pub fn on_hover_enter(&mut self, element: ElementId) {
        if self.running && self.interactive.contains(&element) {
            self.hovering = true;
        }
    }

    pub fn on_hover_leave(&mut self, element: ElementId) {
        if self.running && self.interactive.contains(&element) {
            self.hovering = false;
        }
    }

    pub fn target_scale(&self) -> f64 {
        if self.hovering {
            self.settings.hover_scale
        } else {
            self.settings.rest_scale
        }
    }

    /// Advance the smoothing by one frame without touching the scene.
    pub fn step(&mut self) {
        let f = self.settings.position_factor;
        self.position = Point2D::new(
            self.position.x + (self.target.x - self.position.x) * f,
            self.position.y + (self.target.y - self.position.y) * f,
        );
        self.scale += (self.target_scale() - self.scale) * self.settings.scale_factor;
        self.frames += 1;
    }

    /// Run one frame and write the ring and dot transforms.
    ///
    /// Returns `false` once stopped. Missing ring or dot elements make
    /// their write a no-op.
    pub fn frame(&mut self, now_ns: u64, scene: &mut Scene) -> bool {
        if !self.running {
            return false;
        }
        self.step();

        self.flashing = self.flash_until_ns.is_some_and(|until| now_ns < until);
        if !self.flashing {
            self.flash_until_ns = None;
        }

        if let Some(ring) = self.ring {
            let r = self.settings.ring_radius;
            scene.set_property(ring, Property::X, self.position.x - r);
            scene.set_property(ring, Property::Y, self.position.y - r);
            scene.set_property(ring, Property::Scale, self.scale);
            if let Some(element) = scene.get_mut(ring) {
                element.visual.highlight = self.flashing;
            }
        }
        if let Some(dot) = self.dot {
            let r = self.settings.dot_radius;
            scene.set_property(dot, Property::X, self.target.x - r);
            scene.set_property(dot, Property::Y, self.target.y - r);
        }
        true
    }

    /// Stop the frame loop. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.flash_until_ns = None;
        self.flashing = false;
        tracing::debug!(frames = self.frames, "Pointer follower stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn target(&self) -> Point2D {
        self.target
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn section(&self) -> Option<PointerSection> {
        self.section
    }

    pub fn interactive(&self) -> &[ElementId] {
        &self.interactive
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self) -> FollowerState {
        FollowerState {
            position: self.position,
            target: self.target,
            scale: self.scale,
            hovering: self.hovering,
            flashing: self.flashing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vitrine_scene_model::{Element, Rect, ViewportSize};

    fn scene() -> (Scene, ElementId, ElementId, ElementId) {
        let mut scene = Scene::new(ViewportSize::new(1000.0, 800.0));
        let ring = scene
            .insert(Element::new("cursor-ring", "div", Rect::new(0.0, 0.0, 40.0, 40.0)))
            .unwrap();
        let dot = scene
            .insert(Element::new("cursor-dot", "div", Rect::new(0.0, 0.0, 8.0, 8.0)))
            .unwrap();
        let button = scene
            .insert(Element::new("cta", "button", Rect::new(400.0, 400.0, 200.0, 60.0)))
            .unwrap();
        (scene, ring, dot, button)
    }

    fn follower(scene: &Scene, ring: ElementId, dot: ElementId) -> PointerFollower {
        PointerFollower::start(CursorSettings::default(), true, scene, Some(ring), Some(dot))
            .unwrap()
    }

    #[test]
    fn test_jump_matches_closed_form() {
        let (mut scene, ring, dot, _) = scene();
        let mut f = follower(&scene, ring, dot);
        f.on_pointer_move(Point2D::new(500.0, 500.0), 0, &scene);
        for n in 1..=40 {
            f.frame(n * 16_666_667, &mut scene);
            let expected = 500.0 * (1.0 - (1.0f64 - 0.12).powi(n as i32));
            assert!((f.position().x - expected).abs() < 1e-9, "frame {n}");
            assert!((f.position().y - expected).abs() < 1e-9, "frame {n}");
        }
        let x = scene.property(ring, Property::X).unwrap();
        assert!((x - (f.position().x - 20.0)).abs() < 1e-9);
        assert_eq!(scene.property(dot, Property::X), Some(496.0));
    }

    #[test]
    fn test_converges_and_rests() {
        let (mut scene, ring, dot, _) = scene();
        let mut f = follower(&scene, ring, dot);
        f.on_pointer_move(Point2D::new(320.0, 120.0), 0, &scene);
        for i in 0..400 {
            f.frame(i, &mut scene);
        }
        assert!(f.position().distance_to(&Point2D::new(320.0, 120.0)) < 1e-9);

        let mut at_rest = follower(&scene, ring, dot);
        at_rest.on_pointer_move(Point2D::ORIGIN, 0, &scene);
        for i in 0..10 {
            at_rest.frame(i, &mut scene);
            assert_eq!(at_rest.position(), Point2D::ORIGIN);
            assert_eq!(at_rest.scale(), 1.0);
        }
    }

    #[test]
    fn test_hover_toggle_between_frames_is_not_stuck() {
        let (mut scene, ring, dot, button) = scene();
        let mut f = follower(&scene, ring, dot);

        f.on_hover_enter(button);
        f.on_hover_leave(button);
        f.frame(0, &mut scene);
        assert_eq!(f.scale(), 1.0);

        f.on_hover_enter(button);
        for i in 0..10 {
            f.frame(i, &mut scene);
        }
        let peak = f.scale();
        assert!(peak > 1.0 && peak < 1.5);

        f.on_hover_leave(button);
        let mut last = peak;
        for i in 0..200 {
            f.frame(i, &mut scene);
            assert!(f.scale() <= last);
            last = f.scale();
        }
        assert!((f.scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_hit_test_drives_hover() {
        let (mut scene, ring, dot, _) = scene();
        let mut f = follower(&scene, ring, dot);
        f.on_pointer_move(Point2D::new(450.0, 420.0), 0, &scene);
        assert!(f.is_hovering());
        f.on_pointer_move(Point2D::new(50.0, 700.0), 1, &scene);
        assert!(!f.is_hovering());

        // Added after setup: not part of the snapshot
        let late = scene
            .insert(Element::new("late", "a", Rect::new(0.0, 600.0, 100.0, 200.0)))
            .unwrap();
        f.on_hover_enter(late);
        assert!(!f.is_hovering());
        f.frame(2, &mut scene);
    }

    #[test]
    fn test_scrolling_under_still_pointer_updates_hover() {
        let (mut scene, ring, dot, _) = scene();
        scene
            .insert(Element::new("footer", "footer", Rect::new(0.0, 1400.0, 1000.0, 200.0)))
            .unwrap();
        let mut f = follower(&scene, ring, dot);
        f.refresh_hover(&scene);
        assert!(!f.is_hovering());

        f.on_pointer_move(Point2D::new(450.0, 420.0), 0, &scene);
        assert!(f.is_hovering());

        // The button scrolls out from under the pointer
        scene.set_scroll_offset(300.0);
        f.refresh_hover(&scene);
        assert!(!f.is_hovering());

        // and back
        scene.set_scroll_offset(0.0);
        f.refresh_hover(&scene);
        assert!(f.is_hovering());
        assert_eq!(f.target(), Point2D::new(450.0, 420.0));
    }

    #[test]
    fn test_no_hover_capability_disables() {
        let (scene, ring, dot, _) = scene();
        assert!(
            PointerFollower::start(CursorSettings::default(), false, &scene, Some(ring), Some(dot))
                .is_none()
        );
    }

    #[test]
    fn test_missing_elements_are_noops() {
        let (mut scene, _, _, _) = scene();
        let before: Vec<_> = scene.iter().map(|(_, e)| e.visual).collect();
        let mut f =
            PointerFollower::start(CursorSettings::default(), true, &scene, None, Some(ElementId(99)))
                .unwrap();
        f.on_pointer_move(Point2D::new(10.0, 10.0), 0, &scene);
        assert!(f.frame(0, &mut scene));
        let after: Vec<_> = scene.iter().map(|(_, e)| e.visual).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_section_change_flashes_ring() {
        let (mut scene, ring, dot, _) = scene();
        let mut f = follower(&scene, ring, dot);
        f.on_pointer_move(Point2D::new(300.0, 50.0), 0, &scene);
        f.frame(1_000_000, &mut scene);
        assert!(!f.is_flashing());

        f.on_pointer_move(Point2D::new(300.0, 300.0), 10_000_000, &scene);
        f.frame(20_000_000, &mut scene);
        assert!(f.is_flashing());
        assert!(scene.get(ring).unwrap().visual.highlight);
        assert_eq!(f.section(), Some(PointerSection::Main));

        f.frame(160_000_000, &mut scene);
        assert!(!f.is_flashing());
        assert!(!scene.get(ring).unwrap().visual.highlight);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut scene, ring, dot, _) = scene();
        let mut f = follower(&scene, ring, dot);
        assert!(f.stop());
        assert!(!f.stop());
        f.on_pointer_move(Point2D::new(100.0, 100.0), 0, &scene);
        assert!(!f.frame(0, &mut scene));
        assert_eq!(f.target(), Point2D::ORIGIN);
        assert_eq!(scene.property(ring, Property::X), Some(0.0));
    }

    proptest! {
        #[test]
        fn prop_distance_never_grows(
            x in -2000.0f64..2000.0,
            y in -2000.0f64..2000.0,
            frames in 1usize..200,
        ) {
            let (scene, ring, dot, _) = scene();
            let mut f = follower(&scene, ring, dot);
            f.on_pointer_move(Point2D::new(x, y), 0, &scene);
            let target = Point2D::new(x, y);
            let mut last = f.position().distance_to(&target);
            for _ in 0..frames {
                f.step();
                let d = f.position().distance_to(&target);
                prop_assert!(d <= last + 1e-9);
                last = d;
            }
        }
    }
}
