//! Spring physics
//!
//! Damped-harmonic-oscillator smoothing for motion values, integrated with
//! semi-implicit Euler. Underdamped configs are allowed and expected; the
//! overshoot is the point. Retargeting a spring mid-flight preserves its
//! velocity, which is what produces the natural "catch and carry" feel when
//! a pointer changes direction.

use kinetic_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest dt a single step will integrate over. Frame drops and
/// backgrounded tabs can report huge elapsed times; anything above this is
/// clamped so the simulation cannot blow up.
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

/// Internal integration substep. Heavy-damping configs (e.g. `magnetic`
/// with mass 0.1) are not stable under Euler at 1/30 s, so a step is split
/// into substeps no longer than this.
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// How many consecutive at-rest frames are required before a spring is
/// considered settled and dropped from integration.
const REST_FRAMES: u8 = 2;

/// Configuration for a spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Position distance below which the spring counts as at rest
    pub rest_delta: f32,
    /// Velocity magnitude below which the spring counts as at rest
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Create a validated spring configuration with default rest
    /// thresholds. Rejects non-positive stiffness/mass, negative damping,
    /// and non-finite parameters.
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Result<Self, ConfigError> {
        if !stiffness.is_finite() || !damping.is_finite() || !mass.is_finite() {
            return Err(ConfigError::NonFinite);
        }
        if stiffness <= 0.0 {
            return Err(ConfigError::NonPositiveStiffness(stiffness));
        }
        if mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        if damping < 0.0 {
            return Err(ConfigError::NegativeDamping(damping));
        }
        Ok(Self {
            stiffness,
            damping,
            mass,
            rest_delta: 0.001,
            rest_speed: 0.01,
        })
    }

    /// Override the rest thresholds (both must be positive)
    pub fn with_rest(mut self, rest_delta: f32, rest_speed: f32) -> Result<Self, ConfigError> {
        if rest_delta <= 0.0 || rest_speed <= 0.0 {
            return Err(ConfigError::NonPositiveRest {
                delta: rest_delta,
                speed: rest_speed,
            });
        }
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        Ok(self)
    }

    /// A gentle, overdamped spring (scroll progress smoothing)
    pub fn gentle() -> Self {
        Self {
            stiffness: 100.0,
            damping: 30.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// A wobbly spring with visible overshoot (playful reveals)
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// A stiff, snappy spring (buttons, hover states)
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// Light-mass spring used for magnetic attraction offsets
    pub fn magnetic() -> Self {
        Self {
            stiffness: 150.0,
            damping: 15.0,
            mass: 0.1,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// Cursor-follower spring (dot and ring trailing the pointer)
    pub fn cursor() -> Self {
        Self {
            stiffness: 200.0,
            damping: 25.0,
            mass: 0.5,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// Critical damping for this stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Whether the spring will oscillate
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Whether the spring settles without oscillation, slower than critical
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-smoothed scalar
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_frames: u8,
    settled: bool,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_frames: 0,
            settled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget the spring. Velocity is preserved so a mid-flight retarget
    /// keeps its momentum.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        self.settled = false;
        self.rest_frames = 0;
    }

    /// Jump to a value immediately, killing any in-flight motion
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.rest_frames = 0;
        self.settled = true;
    }

    /// Whether the spring is at rest at its target. Settled springs are
    /// skipped by the integration pass until retargeted.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn at_rest(&self) -> bool {
        (self.target - self.value).abs() < self.config.rest_delta
            && self.velocity.abs() < self.config.rest_speed
    }

    /// Advance the simulation by `dt` seconds (clamped to [`MAX_FRAME_DT`]).
    pub fn step(&mut self, dt: f32) {
        if self.settled {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        if dt <= 0.0 {
            return;
        }

        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0);
        let h = dt / substeps;
        for _ in 0..substeps as u32 {
            let accel = (self.config.stiffness * (self.target - self.value)
                - self.config.damping * self.velocity)
                / self.config.mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
        }

        // Two consecutive at-rest frames before settling, so a single
        // zero-crossing near the target doesn't freeze an underdamped
        // spring mid-bounce.
        if self.at_rest() {
            self.rest_frames += 1;
            if self.rest_frames >= REST_FRAMES {
                self.value = self.target;
                self.velocity = 0.0;
                self.settled = true;
            }
        } else {
            self.rest_frames = 0;
        }
    }
}
