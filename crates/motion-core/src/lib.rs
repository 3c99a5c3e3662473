//! Vitrine Motion Core
//!
//! Frame-driven motion for a single page:
//! - **Follower:** A pointer-trailing ring with hover scaling
//! - **Sequencer:** Scroll-triggered reveals, scrubbed and pinned sequences,
//!   grouped in revertible contexts
//! - **Scroll:** A smooth scroll controller passed explicitly to whoever
//!   needs to scroll programmatically
//! - **Site:** The page's motion declarations
//! - **Stage:** Owns all of the above and runs one frame per host refresh
//!
//! Nothing here spawns threads or timers. The host calls
//! [`Stage::frame`] from its display callback and everything advances by
//! the elapsed time since the previous frame.

pub mod easing;
pub mod follower;
pub mod scroll;
pub mod sequencer;
pub mod site;
pub mod stage;
pub mod timeline;
pub mod trigger;
pub mod tween;

pub use easing::Ease;
pub use follower::{FollowerState, PointerFollower, PointerSection};
pub use scroll::{ScrollController, ScrollTarget, ScrollToOptions};
pub use sequencer::{
    ContextId, Driver, EntryId, EntryStatus, MotionContext, RevealState, ScrubSpec, Sequencer,
    SequencerEvent, SequencerEventKind,
};
pub use site::{Navbar, Section, Site};
pub use stage::{FrameReport, Replayer, Stage, StageStats, CURSOR_DOT, CURSOR_RING};
pub use timeline::{Position, Timeline};
pub use trigger::{Edge, TriggerEnd, TriggerPoint, TriggerSpec, TriggerWindow};
pub use tween::{TargetValue, Track, Tween};
