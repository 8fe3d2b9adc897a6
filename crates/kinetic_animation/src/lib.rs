//! Kinetic Animation
//!
//! The motion layer of the Kinetic engine:
//!
//! - **Springs**: damped-harmonic smoothing with retarget-preserves-velocity
//!   semantics and dt clamping
//! - **Transform curves**: pure piecewise-linear mappings from a driving
//!   signal to visual properties
//! - **Easing**: CSS-compatible cubic-bezier timing curves
//! - **Stagger**: per-index delay schedules for cascading reveals
//! - **Runtime**: the frame loop that ingests input, integrates springs,
//!   and pushes framed notifications, in that order
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::{AnimationRuntime, SpringConfig};
//!
//! let runtime = AnimationRuntime::new();
//! let handle = runtime.handle();
//!
//! let x = handle.add_spring("hero.x", 0.0, SpringConfig::stiff()).unwrap();
//! handle.retarget(x, 100.0);
//!
//! while runtime.tick_with_dt(1.0 / 60.0) {}
//! assert_eq!(handle.spring_value(x).unwrap().scalar(), Some(100.0));
//! ```

pub mod curve;
pub mod easing;
pub mod runtime;
pub mod spring;
pub mod stagger;

pub use curve::{TransformCurve, TransformProperty, TransformSample, TransformTrack};
pub use easing::Easing;
pub use runtime::{
    AnimatedValue, AnimatedVec2, AnimationRuntime, RuntimeHandle, SpringId, WakeCallback,
};
pub use spring::{Spring, SpringConfig, MAX_FRAME_DT};
pub use stagger::Stagger;
