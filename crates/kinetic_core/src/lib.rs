//! Kinetic Core
//!
//! Foundational primitives for the Kinetic animation engine:
//!
//! - **Motion Signals**: named, observable scalar/vector values with
//!   immediate and per-frame subscription modes
//! - **Geometry**: the small set of point/rect/vector types the trackers
//!   and fields need
//! - **Errors**: construction-time `ConfigError` and runtime `SignalError`
//! - **Content Model**: read-only project records consumed by the gallery
//!   components
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::{MotionGraph, NotifyMode};
//!
//! let mut graph = MotionGraph::new();
//! let scroll = graph.create_scalar("scroll_y", 0.0).unwrap();
//!
//! graph.subscribe(scroll, NotifyMode::Immediate, |_, v| {
//!     println!("scroll is now {:?}", v.scalar());
//! });
//!
//! graph.set(scroll, 240.0).unwrap();
//! assert_eq!(graph.scalar(scroll), Some(240.0));
//! ```

pub mod content;
pub mod error;
pub mod geometry;
pub mod signal;

pub use content::{distinct_tags, filter_by_tag, ProjectRecord};
pub use error::{ConfigError, SignalError};
pub use geometry::{Point, Rect, Size, Vec2};
pub use signal::{
    GraphStats, MotionGraph, MotionValue, NotifyMode, SignalCallback, SignalId, SubscriptionId,
    MAX_NOTIFY_DEPTH,
};
