//! Transform curves
//!
//! Piecewise-linear mappings from a driving signal (usually scroll
//! progress) to a visual property. A curve is immutable once constructed
//! and cheap to share; several independent curves commonly hang off one
//! progress value, e.g. one each for translation, opacity, and scale.

use kinetic_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An immutable piecewise-linear mapping with strictly increasing inputs.
/// Evaluation clamps to the first/last output outside the domain; there is
/// no extrapolation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformCurve {
    points: Box<[(f32, f32)]>,
}

impl TransformCurve {
    /// Build a curve from `(input, output)` breakpoints. Requires at least
    /// two breakpoints, all finite, with strictly increasing inputs.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::TooFewBreakpoints(points.len()));
        }
        for (i, (x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(ConfigError::NonFinite);
            }
            if i > 0 && *x <= points[i - 1].0 {
                return Err(ConfigError::NonMonotonicCurve(i));
            }
        }
        Ok(Self {
            points: points.into_boxed_slice(),
        })
    }

    /// The common `[0, 1] -> [from, to]` ramp
    pub fn ramp(from: f32, to: f32) -> Result<Self, ConfigError> {
        Self::new(vec![(0.0, from), (1.0, to)])
    }

    /// Parallax translation over a full visibility span: progress 0 maps to
    /// `speed * 100` px and progress 1 to `-speed * 100` px, so content
    /// drifts against the scroll direction.
    pub fn parallax(speed: f32) -> Result<Self, ConfigError> {
        Self::ramp(speed * 100.0, speed * -100.0)
    }

    /// Evaluate the curve. Pure: identical inputs yield identical outputs.
    pub fn eval(&self, input: f32) -> f32 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if input <= first.0 {
            return first.1;
        }
        if input >= last.0 {
            return last.1;
        }
        // Handful of breakpoints; a linear scan beats a binary search here
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if input <= x1 {
                let t = (input - x0) / (x1 - x0);
                return y0 + (y1 - y0) * t;
            }
        }
        last.1
    }

    /// Domain of the curve as `(first_input, last_input)`
    pub fn domain(&self) -> (f32, f32) {
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }
}

/// A visual property an output curve can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformProperty {
    TranslateX,
    TranslateY,
    Opacity,
    Scale,
    /// Degrees
    Rotate,
    /// Blur radius in px
    Blur,
}

/// Evaluated output of a [`TransformTrack`] for one input value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSample {
    pub translate_x: f32,
    pub translate_y: f32,
    pub opacity: f32,
    pub scale: f32,
    pub rotate: f32,
    pub blur: f32,
}

impl Default for TransformSample {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            opacity: 1.0,
            scale: 1.0,
            rotate: 0.0,
            blur: 0.0,
        }
    }
}

/// A bundle of independent curves driven by one input signal. Each curve is
/// evaluated on its own; properties without a curve keep their identity
/// defaults.
#[derive(Clone, Debug, Default)]
pub struct TransformTrack {
    curves: Vec<(TransformProperty, Arc<TransformCurve>)>,
}

impl TransformTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a curve to a property. Curves are `Arc`-shared, so one
    /// definition can drive any number of tracks.
    pub fn with(mut self, property: TransformProperty, curve: Arc<TransformCurve>) -> Self {
        self.curves.push((property, curve));
        self
    }

    /// Evaluate every curve at `input`
    pub fn sample(&self, input: f32) -> TransformSample {
        let mut out = TransformSample::default();
        for (property, curve) in &self.curves {
            let v = curve.eval(input);
            match property {
                TransformProperty::TranslateX => out.translate_x = v,
                TransformProperty::TranslateY => out.translate_y = v,
                TransformProperty::Opacity => out.opacity = v,
                TransformProperty::Scale => out.scale = v,
                TransformProperty::Rotate => out.rotate = v,
                TransformProperty::Blur => out.blur = v,
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(matches!(
            TransformCurve::new(vec![(0.0, 0.0)]),
            Err(ConfigError::TooFewBreakpoints(1))
        ));
        assert!(matches!(
            TransformCurve::new(vec![(0.0, 0.0), (0.0, 1.0)]),
            Err(ConfigError::NonMonotonicCurve(1))
        ));
        assert!(matches!(
            TransformCurve::new(vec![(0.0, 0.0), (1.0, 1.0), (0.5, 2.0)]),
            Err(ConfigError::NonMonotonicCurve(2))
        ));
        assert!(matches!(
            TransformCurve::new(vec![(0.0, f32::NAN), (1.0, 1.0)]),
            Err(ConfigError::NonFinite)
        ));
    }

    #[test]
    fn test_eval_interpolates_and_clamps() {
        let curve = TransformCurve::new(vec![(0.0, 0.0), (1.0, 100.0)]).unwrap();

        assert_eq!(curve.eval(0.0), 0.0);
        assert_eq!(curve.eval(0.5), 50.0);
        assert_eq!(curve.eval(1.0), 100.0);

        // Out-of-domain inputs clamp to the boundary outputs
        assert_eq!(curve.eval(-5.0), 0.0);
        assert_eq!(curve.eval(5.0), 100.0);
    }

    #[test]
    fn test_eval_is_pure() {
        let curve = TransformCurve::new(vec![(0.0, 0.0), (0.5, 10.0), (1.0, 0.0)]).unwrap();
        assert_eq!(curve.eval(0.3), curve.eval(0.3));
        assert_eq!(curve.eval(0.25), 5.0);
        assert_eq!(curve.eval(0.75), 5.0);
    }

    #[test]
    fn test_parallax_ramp() {
        let curve = TransformCurve::parallax(0.5).unwrap();
        assert_eq!(curve.eval(0.0), 50.0);
        assert_eq!(curve.eval(1.0), -50.0);
        assert_eq!(curve.eval(0.5), 0.0);
    }

    #[test]
    fn test_track_independent_curves() {
        // One progress input driving y, opacity, and scale, the way a
        // parallax section does
        let track = TransformTrack::new()
            .with(
                TransformProperty::TranslateY,
                Arc::new(TransformCurve::parallax(0.5).unwrap()),
            )
            .with(
                TransformProperty::Opacity,
                Arc::new(TransformCurve::new(vec![(0.0, 0.5), (0.5, 1.0), (1.0, 0.5)]).unwrap()),
            )
            .with(
                TransformProperty::Scale,
                Arc::new(
                    TransformCurve::new(vec![(0.0, 0.95), (0.5, 1.05), (1.0, 0.95)]).unwrap(),
                ),
            );

        let mid = track.sample(0.5);
        assert_eq!(mid.translate_y, 0.0);
        assert_eq!(mid.opacity, 1.0);
        assert_eq!(mid.scale, 1.05);
        // Untouched properties keep identity defaults
        assert_eq!(mid.translate_x, 0.0);
        assert_eq!(mid.blur, 0.0);

        let start = track.sample(0.0);
        assert_eq!(start.translate_y, 50.0);
        assert_eq!(start.opacity, 0.5);
        assert_eq!(start.scale, 0.95);
    }

    #[test]
    fn test_shared_curve() {
        let shared = Arc::new(TransformCurve::ramp(0.0, 1.0).unwrap());
        let a = TransformTrack::new().with(TransformProperty::Opacity, shared.clone());
        let b = TransformTrack::new().with(TransformProperty::Scale, shared);
        assert_eq!(a.sample(0.25).opacity, 0.25);
        assert_eq!(b.sample(0.25).scale, 0.25);
    }
}
