//! Vitrine Scene Model
//!
//! Defines the retained-mode data the motion engine mutates every frame:
//! - **Geometry:** Points, rectangles, and viewport sizes in CSS pixels
//! - **Scene:** Elements with document-space boxes and a visual state
//!   (opacity, translation, scale, blur, clip insets)
//! - **Events:** Timestamped host input (pointer, hover, wheel, resize)
//!
//! Element boxes are stored in document coordinates (scroll offset 0,
//! no animated transform applied). Viewport-space boxes are derived on
//! demand from the current scroll offset and visual state.

pub mod event;
pub mod geometry;
pub mod scene;

pub use event::*;
pub use geometry::*;
pub use scene::*;
