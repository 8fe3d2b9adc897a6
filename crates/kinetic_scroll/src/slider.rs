//! Slide navigation
//!
//! Wheel-driven slide stepping with a transition lock. Trackpads emit
//! dozens of small wheel deltas per gesture; raw per-event stepping would
//! fly through the whole deck. Instead deltas accumulate until they cross
//! a threshold, the slider steps once, and further wheel and swipe input
//! is ignored until the transition cooldown expires. Keyboard navigation
//! deliberately bypasses the lock; key repeat is already rate-limited and
//! a keyboard user expects every press to land.

use kinetic_animation::Easing;
use serde::{Deserialize, Serialize};

/// How long a slide transition locks out wheel and swipe input, in seconds
pub const SLIDE_COOLDOWN: f32 = 0.8;

/// Accumulated wheel delta (px) required to step one slide
pub const WHEEL_THRESHOLD: f32 = 50.0;

/// Touch swipe distance (px) required to step one slide
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Transition state of the slider
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SliderPhase {
    Idle,
    /// Mid-transition; `remaining` seconds until input unlocks
    Locked { remaining: f32 },
}

/// A completed slide step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
}

/// Wheel/swipe/keyboard navigator over a fixed deck of slides
#[derive(Clone, Debug)]
pub struct ProjectSlider {
    index: usize,
    count: usize,
    phase: SliderPhase,
    wheel_accum: f32,
    easing: Easing,
}

impl ProjectSlider {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count,
            phase: SliderPhase::Idle,
            wheel_accum: 0.0,
            easing: Easing::slide(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn phase(&self) -> SliderPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, SliderPhase::Locked { .. })
    }

    /// Eased progress of the in-flight transition, `None` while idle
    pub fn transition_progress(&self) -> Option<f32> {
        match self.phase {
            SliderPhase::Idle => None,
            SliderPhase::Locked { remaining } => {
                let t = 1.0 - (remaining / SLIDE_COOLDOWN).clamp(0.0, 1.0);
                Some(self.easing.apply(t))
            }
        }
    }

    /// Feed a wheel delta (positive scrolls forward). Returns the step if
    /// the accumulated delta crossed the threshold.
    pub fn on_wheel(&mut self, delta: f32) -> Option<SlideChange> {
        if self.is_locked() {
            return None;
        }
        self.wheel_accum += delta;
        if self.wheel_accum >= WHEEL_THRESHOLD {
            self.wheel_accum = 0.0;
            self.step(1)
        } else if self.wheel_accum <= -WHEEL_THRESHOLD {
            self.wheel_accum = 0.0;
            self.step(-1)
        } else {
            None
        }
    }

    /// Feed a completed touch swipe (positive distance swipes forward)
    pub fn on_swipe(&mut self, distance: f32) -> Option<SlideChange> {
        if self.is_locked() || distance.abs() < SWIPE_THRESHOLD {
            return None;
        }
        self.step(if distance > 0.0 { 1 } else { -1 })
    }

    /// Keyboard forward. Not gated by the cooldown.
    pub fn next(&mut self) -> Option<SlideChange> {
        self.step(1)
    }

    /// Keyboard back. Not gated by the cooldown.
    pub fn prev(&mut self) -> Option<SlideChange> {
        self.step(-1)
    }

    /// Jump straight to a slide (pagination dots). Clamped to the deck.
    pub fn go_to(&mut self, index: usize) -> Option<SlideChange> {
        if self.count == 0 {
            return None;
        }
        let to = index.min(self.count - 1);
        if to == self.index {
            return None;
        }
        let change = SlideChange {
            from: self.index,
            to,
        };
        self.index = to;
        self.lock();
        Some(change)
    }

    /// Advance the cooldown. Call once per frame.
    pub fn step_frame(&mut self, dt: f32) {
        if let SliderPhase::Locked { remaining } = self.phase {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.phase = SliderPhase::Idle;
                // A gesture straddling the unlock shouldn't carry stale
                // momentum into the next step
                self.wheel_accum = 0.0;
            } else {
                self.phase = SliderPhase::Locked { remaining };
            }
        }
    }

    fn step(&mut self, direction: i32) -> Option<SlideChange> {
        let to = if direction > 0 {
            if self.index + 1 >= self.count {
                return None;
            }
            self.index + 1
        } else {
            self.index.checked_sub(1)?
        };
        let change = SlideChange {
            from: self.index,
            to,
        };
        tracing::debug!(from = change.from, to = change.to, "slide step");
        self.index = to;
        self.lock();
        Some(change)
    }

    fn lock(&mut self) {
        self.phase = SliderPhase::Locked {
            remaining: SLIDE_COOLDOWN,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(slider: &mut ProjectSlider, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            slider.step_frame(DT);
        }
    }

    #[test]
    fn test_wheel_accumulates_to_threshold() {
        let mut slider = ProjectSlider::new(5);

        // Trackpad drizzle below the threshold does nothing
        assert_eq!(slider.on_wheel(20.0), None);
        assert_eq!(slider.on_wheel(20.0), None);
        assert_eq!(slider.index(), 0);

        // The delta that crosses the line steps exactly once
        let change = slider.on_wheel(15.0).unwrap();
        assert_eq!(change, SlideChange { from: 0, to: 1 });
        assert!(slider.is_locked());
    }

    #[test]
    fn test_wheel_ignored_while_locked() {
        let mut slider = ProjectSlider::new(5);
        slider.on_wheel(60.0).unwrap();

        // A storm of wheel events during the transition moves nothing
        for _ in 0..50 {
            assert_eq!(slider.on_wheel(60.0), None);
        }
        assert_eq!(slider.index(), 1);

        // After the cooldown one step works again
        run(&mut slider, SLIDE_COOLDOWN + 0.05);
        assert!(!slider.is_locked());
        assert_eq!(
            slider.on_wheel(60.0),
            Some(SlideChange { from: 1, to: 2 })
        );
    }

    #[test]
    fn test_unlock_clears_partial_accumulation() {
        let mut slider = ProjectSlider::new(5);
        slider.on_wheel(60.0).unwrap();

        run(&mut slider, SLIDE_COOLDOWN + 0.05);

        // Pre-unlock accumulation was dropped; a fresh 40px is not enough
        assert_eq!(slider.on_wheel(40.0), None);
        assert_eq!(slider.index(), 1);
    }

    #[test]
    fn test_clamped_at_deck_ends() {
        let mut slider = ProjectSlider::new(2);

        assert_eq!(slider.on_wheel(-60.0), None);
        assert_eq!(slider.index(), 0);

        slider.on_wheel(60.0).unwrap();
        run(&mut slider, SLIDE_COOLDOWN + 0.05);
        assert_eq!(slider.on_wheel(60.0), None);
        assert_eq!(slider.index(), 1);
    }

    #[test]
    fn test_swipe_threshold() {
        let mut slider = ProjectSlider::new(3);

        assert_eq!(slider.on_swipe(30.0), None);
        assert_eq!(
            slider.on_swipe(80.0),
            Some(SlideChange { from: 0, to: 1 })
        );
        // Locked out like wheel input
        assert_eq!(slider.on_swipe(-80.0), None);
    }

    #[test]
    fn test_keyboard_bypasses_lock() {
        let mut slider = ProjectSlider::new(5);
        slider.on_wheel(60.0).unwrap();
        assert!(slider.is_locked());

        assert_eq!(slider.next(), Some(SlideChange { from: 1, to: 2 }));
        assert_eq!(slider.prev(), Some(SlideChange { from: 2, to: 1 }));
        assert_eq!(slider.prev(), Some(SlideChange { from: 1, to: 0 }));
        assert_eq!(slider.prev(), None);
    }

    #[test]
    fn test_go_to_clamps_and_locks() {
        let mut slider = ProjectSlider::new(4);

        assert_eq!(slider.go_to(99), Some(SlideChange { from: 0, to: 3 }));
        assert!(slider.is_locked());
        assert_eq!(slider.go_to(3), None);
    }

    #[test]
    fn test_transition_progress_eases_to_one() {
        let mut slider = ProjectSlider::new(3);
        assert_eq!(slider.transition_progress(), None);

        slider.next().unwrap();
        let early = slider.transition_progress().unwrap();
        assert!(early < 0.1);

        let mut prev = early;
        while slider.is_locked() {
            slider.step_frame(DT);
            if let Some(p) = slider.transition_progress() {
                assert!(p >= prev - 1e-4);
                prev = p;
            }
        }
        assert!(prev > 0.95);
        assert_eq!(slider.transition_progress(), None);
    }

    #[test]
    fn test_empty_deck() {
        let mut slider = ProjectSlider::new(0);
        assert_eq!(slider.on_wheel(500.0), None);
        assert_eq!(slider.next(), None);
        assert_eq!(slider.go_to(0), None);
    }
}
