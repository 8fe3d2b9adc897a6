//! Stagger schedules
//!
//! Per-index delays for cascading reveals: letters of a headline, cards in
//! a grid, lines of a paragraph. A reveal trigger fires once for the
//! container; the stagger spreads the children's start times.

use serde::{Deserialize, Serialize};

/// A linear delay schedule: `delay(i) = base + i * step`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    /// Delay before the first item, in seconds
    pub base: f32,
    /// Additional delay per item, in seconds
    pub step: f32,
}

impl Stagger {
    pub fn new(base: f32, step: f32) -> Self {
        Self { base, step }
    }

    /// Letter-by-letter text reveal cadence
    pub fn letters() -> Self {
        Self::new(0.0, 0.03)
    }

    /// Card/list item cadence
    pub fn items() -> Self {
        Self::new(0.0, 0.08)
    }

    /// Delay for the item at `index`, in seconds
    pub fn delay_for(&self, index: usize) -> f32 {
        self.base + self.step * index as f32
    }

    /// The full schedule for `count` items
    pub fn schedule(&self, count: usize) -> Vec<f32> {
        (0..count).map(|i| self.delay_for(i)).collect()
    }

    /// Total time until the last item starts
    pub fn span(&self, count: usize) -> f32 {
        match count {
            0 => 0.0,
            n => self.delay_for(n - 1),
        }
    }
}
