//! Kinetic Pointer
//!
//! Pointer-driven behavior for the Kinetic engine:
//!
//! - **Magnetic fields**: registered targets lean toward a nearby pointer
//!   on light-mass springs
//! - **Cursor follower**: the dot-and-ring custom cursor with trailing
//!   motion and hover response
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::AnimationRuntime;
//! use kinetic_core::Point;
//! use kinetic_pointer::{MagnetField, MagnetTarget};
//!
//! let runtime = AnimationRuntime::new();
//! let mut field = MagnetField::new(runtime.handle());
//! let cta = field
//!     .add("cta", MagnetTarget::new(Point::new(400.0, 300.0), 100.0))
//!     .unwrap();
//!
//! field.pointer_moved(Point::new(450.0, 300.0));
//! while runtime.tick_with_dt(1.0 / 60.0) {}
//! assert!((field.offset(cta).unwrap().x - 15.0).abs() < 0.01);
//! ```

pub mod cursor;
pub mod magnet;

pub use cursor::CursorFollower;
pub use magnet::{Falloff, MagnetField, MagnetId, MagnetTarget};
