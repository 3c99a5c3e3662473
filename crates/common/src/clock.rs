//! Frame clock and pacing utilities.
//!
//! The stage is driven by the host's display refresh. This module provides:
//! - A monotonic clock anchored at stage setup
//! - Per-frame delta bookkeeping
//! - Rate limiting and last-value coalescing for work that must run
//!   at most once per rendered frame

use std::time::Instant;

/// Monotonic clock relative to the moment the stage was set up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant the stage was created.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since the epoch.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * 1_000_000_000.0) as u64
    }
}

/// One host frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Sequential frame number, starting at 0.
    pub index: u64,
    /// Host timestamp of this frame (ns).
    pub now_ns: u64,
    /// Seconds since the previous frame (0 for the first frame).
    pub dt_secs: f64,
}

/// Turns raw host timestamps into [`FrameTick`]s.
#[derive(Debug, Default)]
pub struct FrameCounter {
    next_index: u64,
    last_ns: Option<u64>,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ns`.
    ///
    /// Timestamps that go backwards produce a zero delta rather than a
    /// negative one.
    pub fn tick(&mut self, now_ns: u64) -> FrameTick {
        let dt_secs = match self.last_ns {
            Some(last) => FrameClock::ns_to_secs(now_ns.saturating_sub(last)),
            None => 0.0,
        };
        self.last_ns = Some(now_ns.max(self.last_ns.unwrap_or(0)));
        let tick = FrameTick {
            index: self.next_index,
            now_ns,
            dt_secs,
        };
        self.next_index += 1;
        tick
    }

    /// Number of frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.next_index
    }
}

/// Frame rate controller for host pacing.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

/// Keeps only the most recent value pushed between two frames.
///
/// Scroll events can arrive many times per frame; consumers call
/// [`Coalesced::take`] once per frame and see only the latest value.
#[derive(Debug)]
pub struct Coalesced<T> {
    latest: Option<T>,
    pushed: u64,
}

impl<T> Default for Coalesced<T> {
    fn default() -> Self {
        Self {
            latest: None,
            pushed: 0,
        }
    }
}

impl<T> Coalesced<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending value.
    pub fn push(&mut self, value: T) {
        self.latest = Some(value);
        self.pushed += 1;
    }

    /// Take the pending value, if any.
    pub fn take(&mut self) -> Option<T> {
        self.latest.take()
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    /// Total number of values pushed (including overwritten ones).
    pub fn pushed(&self) -> u64 {
        self.pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = FrameClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((FrameClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(FrameClock::secs_to_ns(2.0), 2_000_000_000);
    }

    #[test]
    fn test_frame_counter_deltas() {
        let mut counter = FrameCounter::new();
        let first = counter.tick(1_000_000_000);
        assert_eq!(first.index, 0);
        assert_eq!(first.dt_secs, 0.0);

        let second = counter.tick(1_016_000_000);
        assert_eq!(second.index, 1);
        assert!((second.dt_secs - 0.016).abs() < 1e-9);

        // Going backwards never yields a negative delta
        let third = counter.tick(1_010_000_000);
        assert_eq!(third.dt_secs, 0.0);
        assert_eq!(counter.frames(), 3);
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(60);
        assert!(ctrl.should_tick(0));
        assert!(!ctrl.should_tick(1_000_000));
        assert!(ctrl.should_tick(17_000_000));
    }

    #[test]
    fn test_coalesced_keeps_latest() {
        let mut pending = Coalesced::new();
        pending.push(10.0);
        pending.push(20.0);
        pending.push(30.0);
        assert!(pending.is_pending());
        assert_eq!(pending.take(), Some(30.0));
        assert_eq!(pending.take(), None);
        assert_eq!(pending.pushed(), 3);
    }
}
