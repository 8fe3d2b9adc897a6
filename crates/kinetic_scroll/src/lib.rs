//! Kinetic Scroll
//!
//! Scroll-driven behavior for the Kinetic engine:
//!
//! - **Progress tracking**: anchor-based normalized progress of an element
//!   through the viewport, the driving input for parallax tracks
//! - **Reveal triggers**: edge-triggered entry detection against a
//!   margin-adjusted viewport
//! - **Slide navigation**: threshold-accumulated wheel stepping with a
//!   transition lock
//!
//! # Example
//!
//! ```rust
//! use kinetic_scroll::{ScrollSpan, ScrollTracker};
//!
//! let mut tracker = ScrollTracker::new(ScrollSpan::enter_exit());
//! tracker.set_element_bounds(1000.0, 400.0);
//! tracker.set_viewport_height(800.0);
//!
//! tracker.set_scroll_offset(800.0);
//! assert_eq!(tracker.progress(), 0.5);
//! ```

pub mod progress;
pub mod reveal;
pub mod slider;

pub use progress::{Anchor, Edge, ScrollSpan, ScrollTracker};
pub use reveal::{RevealConfig, RevealEvent, RevealState, RevealTrigger};
pub use slider::{
    ProjectSlider, SlideChange, SliderPhase, SLIDE_COOLDOWN, SWIPE_THRESHOLD, WHEEL_THRESHOLD,
};
