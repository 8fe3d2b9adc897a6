//! Cursor follower
//!
//! The two-part custom cursor: a dot glued tightly to the pointer and a
//! larger ring trailing behind it on a softer spring. Hovering an
//! interactive element shrinks the ring onto the dot. The follower starts
//! hidden and appears at the first pointer position, so it never animates
//! in from the surface origin.

use kinetic_animation::{AnimatedValue, AnimatedVec2, RuntimeHandle, SpringConfig};
use kinetic_core::{Point, Vec2};

/// Ring scale while hovering an interactive element
const HOVER_SCALE: f32 = 0.5;
const REST_SCALE: f32 = 1.0;

pub struct CursorFollower {
    dot: AnimatedVec2,
    ring: AnimatedVec2,
    ring_scale: AnimatedValue,
    visible: bool,
    hovering: bool,
}

impl CursorFollower {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self {
            dot: AnimatedVec2::new(
                handle.clone(),
                "cursor.dot",
                Vec2::ZERO,
                SpringConfig::stiff(),
            ),
            ring: AnimatedVec2::new(
                handle.clone(),
                "cursor.ring",
                Vec2::ZERO,
                SpringConfig::cursor(),
            ),
            ring_scale: AnimatedValue::new(
                handle,
                "cursor.ring.scale",
                REST_SCALE,
                SpringConfig::stiff(),
            ),
            visible: false,
            hovering: false,
        }
    }

    pub fn pointer_moved(&mut self, pointer: Point) {
        let position = Vec2::new(pointer.x, pointer.y);
        if !self.visible {
            // First contact: appear in place instead of flying in
            self.dot.set_immediate(position);
            self.ring.set_immediate(position);
            self.visible = true;
            return;
        }
        self.dot.set_target(position);
        self.ring.set_target(position);
    }

    pub fn pointer_left(&mut self) {
        self.visible = false;
        self.set_hovering(false);
    }

    /// Interactive-element hover state; shrinks the ring onto the dot
    pub fn set_hovering(&mut self, hovering: bool) {
        if self.hovering == hovering {
            return;
        }
        self.hovering = hovering;
        self.ring_scale
            .set_target(if hovering { HOVER_SCALE } else { REST_SCALE });
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn dot_position(&self) -> Point {
        let v = self.dot.get();
        Point::new(v.x, v.y)
    }

    pub fn ring_position(&self) -> Point {
        let v = self.ring.get();
        Point::new(v.x, v.y)
    }

    pub fn ring_scale(&self) -> f32 {
        self.ring_scale.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_animation::AnimationRuntime;

    const DT: f32 = 1.0 / 60.0;

    fn settle(runtime: &AnimationRuntime) {
        for _ in 0..600 {
            if !runtime.tick_with_dt(DT) {
                break;
            }
        }
    }

    #[test]
    fn test_appears_in_place() {
        let runtime = AnimationRuntime::new();
        let mut cursor = CursorFollower::new(runtime.handle());
        assert!(!cursor.is_visible());

        // First pointer contact snaps both parts; nothing flies in from
        // the origin
        cursor.pointer_moved(Point::new(640.0, 360.0));
        assert!(cursor.is_visible());
        assert_eq!(cursor.dot_position(), Point::new(640.0, 360.0));
        assert_eq!(cursor.ring_position(), Point::new(640.0, 360.0));
    }

    #[test]
    fn test_ring_trails_the_dot() {
        let runtime = AnimationRuntime::new();
        let mut cursor = CursorFollower::new(runtime.handle());

        cursor.pointer_moved(Point::new(0.0, 0.0));
        cursor.pointer_moved(Point::new(300.0, 0.0));

        // A few frames in, the stiff dot has covered more ground than the
        // soft ring
        for _ in 0..5 {
            runtime.tick_with_dt(DT);
        }
        let dot_x = cursor.dot_position().x;
        let ring_x = cursor.ring_position().x;
        assert!(dot_x > 0.0);
        assert!(ring_x > 0.0);
        assert!(dot_x > ring_x, "dot {dot_x} should lead ring {ring_x}");

        settle(&runtime);
        assert_eq!(cursor.dot_position(), Point::new(300.0, 0.0));
        assert_eq!(cursor.ring_position(), Point::new(300.0, 0.0));
    }

    #[test]
    fn test_hover_shrinks_ring() {
        let runtime = AnimationRuntime::new();
        let mut cursor = CursorFollower::new(runtime.handle());
        assert_eq!(cursor.ring_scale(), 1.0);

        cursor.set_hovering(true);
        settle(&runtime);
        assert!((cursor.ring_scale() - 0.5).abs() < 0.01);

        cursor.set_hovering(false);
        settle(&runtime);
        assert!((cursor.ring_scale() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_leave_hides_and_clears_hover() {
        let runtime = AnimationRuntime::new();
        let mut cursor = CursorFollower::new(runtime.handle());

        cursor.pointer_moved(Point::new(100.0, 100.0));
        cursor.set_hovering(true);

        cursor.pointer_left();
        assert!(!cursor.is_visible());
        assert!(!cursor.is_hovering());

        // Reappearing snaps to the new position
        cursor.pointer_moved(Point::new(900.0, 500.0));
        assert_eq!(cursor.dot_position(), Point::new(900.0, 500.0));
    }
}
