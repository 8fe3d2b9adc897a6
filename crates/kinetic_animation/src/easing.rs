//! Easing functions
//!
//! Used by reveal sequences and slider transitions, where a timed curve
//! reads better than a spring. `CubicBezier` matches the CSS
//! `cubic-bezier(x1, y1, x2, y2)` semantics: the curve maps time to
//! progress through a parametric spline, solved numerically on the x axis.

use serde::{Deserialize, Serialize};

/// An easing curve applied to normalized time `t` in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// The soft ease-out used by scroll reveals
    /// (`cubic-bezier(0.25, 0.46, 0.45, 0.94)`)
    pub const fn reveal() -> Self {
        Easing::CubicBezier {
            x1: 0.25,
            y1: 0.46,
            x2: 0.45,
            y2: 0.94,
        }
    }

    /// The decisive ease-out used by slide transitions
    /// (`cubic-bezier(0.33, 1.0, 0.68, 1.0)`)
    pub const fn slide() -> Self {
        Easing::CubicBezier {
            x1: 0.33,
            y1: 1.0,
            x2: 0.68,
            y2: 1.0,
        }
    }

    /// Apply the curve to `t`, clamped to `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                let u = solve_bezier_x(t, x1, x2);
                sample_bezier(u, y1, y2)
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

/// Evaluate the one-dimensional cubic Bezier with control values `c1`, `c2`
/// (endpoints fixed at 0 and 1) at parameter `u`.
fn sample_bezier(u: f32, c1: f32, c2: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * c1 + 3.0 * inv * u * u * c2 + u * u * u
}

fn sample_bezier_derivative(u: f32, c1: f32, c2: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * c1 + 6.0 * inv * u * (c2 - c1) + 3.0 * u * u * (1.0 - c2)
}

/// Find `u` such that `x(u) = x`, Newton first and bisection as fallback.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut u = x;
    for _ in 0..8 {
        let err = sample_bezier(u, x1, x2) - x;
        if err.abs() < 1e-6 {
            return u;
        }
        let slope = sample_bezier_derivative(u, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        u -= err / slope;
        u = u.clamp(0.0, 1.0);
    }

    // Newton failed to converge (flat derivative); bisect
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..32 {
        u = (lo + hi) / 2.0;
        if sample_bezier(u, x1, x2) < x {
            lo = u;
        } else {
            hi = u;
        }
    }
    u
}
