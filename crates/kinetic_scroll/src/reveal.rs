//! Reveal triggers
//!
//! Edge-triggered visibility detection for scroll-in animations. A trigger
//! watches one element against a margin-adjusted viewport and fires an
//! `Enter` event on the frame the element first intersects it. With
//! `once` set (the default) the trigger then stays triggered for its
//! lifetime; otherwise it re-arms after the element fully leaves and fires
//! an `Exit` on the way out.
//!
//! The negative margins in the presets shrink the detection zone so
//! content starts animating only after it is properly on screen, not the
//! instant one pixel crosses the fold.

use kinetic_core::Rect;
use serde::{Deserialize, Serialize};

/// Where a trigger is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    Pending,
    Triggered,
}

/// Edge transition reported by [`RevealTrigger::update`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Enter,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Fire once and stay triggered. On by default; scroll-back should not
    /// replay entrance animations.
    pub once: bool,
    /// Margin applied to the viewport before the intersection test, in px.
    /// Negative values shrink the detection zone.
    pub margin: f32,
}

impl RevealConfig {
    /// Section-level reveals: trigger 100px inside the viewport
    pub const fn section() -> Self {
        Self {
            once: true,
            margin: -100.0,
        }
    }

    /// Smaller items (cards, list rows): trigger 80px inside the viewport
    pub const fn item() -> Self {
        Self {
            once: true,
            margin: -80.0,
        }
    }

    pub const fn repeating(mut self) -> Self {
        self.once = false;
        self
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::section()
    }
}

/// Watches one element for entry into the (margin-adjusted) viewport
#[derive(Clone, Debug)]
pub struct RevealTrigger {
    config: RevealConfig,
    state: RevealState,
}

impl RevealTrigger {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            state: RevealState::Pending,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_triggered(&self) -> bool {
        self.state == RevealState::Triggered
    }

    /// Re-arm the trigger regardless of `once` (e.g. on route change)
    pub fn reset(&mut self) {
        self.state = RevealState::Pending;
    }

    /// Test the element against the viewport and report an edge transition
    /// if one happened this frame. Both rects are in the same coordinate
    /// space (viewport coordinates, with the element rect already offset by
    /// scroll).
    pub fn update(&mut self, element: Rect, viewport: Rect) -> Option<RevealEvent> {
        let zone = viewport.expand(self.config.margin);
        let intersecting = zone.intersects(&element);

        match self.state {
            RevealState::Pending if intersecting => {
                self.state = RevealState::Triggered;
                tracing::trace!(?element, "reveal entered");
                Some(RevealEvent::Enter)
            }
            RevealState::Triggered if !self.config.once && !intersecting => {
                self.state = RevealState::Pending;
                Some(RevealEvent::Exit)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn element_at(y: f32) -> Rect {
        Rect::new(100.0, y, 400.0, 100.0)
    }

    #[test]
    fn test_margin_delays_entry() {
        // Section margin -100: the detection zone bottom sits at y = 500
        let mut trigger = RevealTrigger::new(RevealConfig::section());

        // One pixel past the fold but not past the margin: still pending
        assert_eq!(trigger.update(element_at(550.0), VIEWPORT), None);
        assert_eq!(trigger.state(), RevealState::Pending);

        // Crosses into the shrunk zone
        assert_eq!(
            trigger.update(element_at(450.0), VIEWPORT),
            Some(RevealEvent::Enter)
        );
        assert!(trigger.is_triggered());
    }

    #[test]
    fn test_enter_fires_exactly_once_per_entry() {
        let mut trigger = RevealTrigger::new(RevealConfig::item());
        assert_eq!(
            trigger.update(element_at(300.0), VIEWPORT),
            Some(RevealEvent::Enter)
        );
        // Still intersecting on subsequent frames: no event
        assert_eq!(trigger.update(element_at(250.0), VIEWPORT), None);
        assert_eq!(trigger.update(element_at(200.0), VIEWPORT), None);
    }

    #[test]
    fn test_once_survives_scroll_back() {
        let mut trigger = RevealTrigger::new(RevealConfig::section());
        trigger.update(element_at(300.0), VIEWPORT);
        assert!(trigger.is_triggered());

        // Element scrolls fully out; once-mode stays triggered silently
        assert_eq!(trigger.update(element_at(2000.0), VIEWPORT), None);
        assert!(trigger.is_triggered());
        assert_eq!(trigger.update(element_at(300.0), VIEWPORT), None);
    }

    #[test]
    fn test_repeating_rearms_after_full_exit() {
        let mut trigger = RevealTrigger::new(RevealConfig::section().repeating());

        assert_eq!(
            trigger.update(element_at(300.0), VIEWPORT),
            Some(RevealEvent::Enter)
        );
        assert_eq!(
            trigger.update(element_at(2000.0), VIEWPORT),
            Some(RevealEvent::Exit)
        );
        assert_eq!(
            trigger.update(element_at(300.0), VIEWPORT),
            Some(RevealEvent::Enter)
        );
    }

    #[test]
    fn test_reset_rearms_once_trigger() {
        let mut trigger = RevealTrigger::new(RevealConfig::section());
        trigger.update(element_at(300.0), VIEWPORT);
        trigger.update(element_at(2000.0), VIEWPORT);

        trigger.reset();
        assert_eq!(trigger.state(), RevealState::Pending);
        assert_eq!(
            trigger.update(element_at(300.0), VIEWPORT),
            Some(RevealEvent::Enter)
        );
    }
}
