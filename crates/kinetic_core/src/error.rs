//! Error taxonomy for the animation engine
//!
//! The taxonomy is deliberately narrow: everything that can be malformed is
//! rejected synchronously at construction time (`ConfigError`), and the only
//! runtime failure is a subscriber chain recursing on itself
//! (`SignalError::Reentrancy`). Per-frame numeric code never fails; the next
//! tick simply recomputes.

use thiserror::Error;

/// Construction-time validation failures.
///
/// Raised when a spring, curve, signal, or magnet target is created with
/// malformed parameters. Never raised from a frame tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("spring stiffness must be positive, got {0}")]
    NonPositiveStiffness(f32),

    #[error("spring mass must be positive, got {0}")]
    NonPositiveMass(f32),

    #[error("spring damping must be non-negative, got {0}")]
    NegativeDamping(f32),

    #[error("spring rest thresholds must be positive, got delta={delta} speed={speed}")]
    NonPositiveRest { delta: f32, speed: f32 },

    #[error("parameter must be finite")]
    NonFinite,

    #[error("curve needs at least two breakpoints, got {0}")]
    TooFewBreakpoints(usize),

    #[error("curve breakpoint inputs must be strictly increasing (violated at index {0})")]
    NonMonotonicCurve(usize),

    #[error("initial signal value must not be NaN")]
    NanValue,

    #[error("signal name {0:?} is already registered")]
    DuplicateSignalName(String),

    #[error("magnet radius must be positive, got {0}")]
    NonPositiveRadius(f32),
}

/// Runtime signal failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// A subscriber chain recursed past the fixed depth limit. The write
    /// itself lands (last-write wins) but its notification cascade is
    /// dropped, so a visual glitch is the worst outcome.
    #[error("signal update chain recursed past depth {depth}; notification dropped")]
    Reentrancy { depth: u32 },

    #[error("signal value must not be NaN")]
    NanValue,

    #[error("signal handle no longer refers to a live signal")]
    Dangling,
}
