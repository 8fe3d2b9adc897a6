//! Scroll progress tracking
//!
//! Maps an element's position in the document to a normalized progress
//! value as the page scrolls past it. A span is described by two anchors,
//! each pairing an element edge with a viewport edge; progress is 0 when
//! the first pair aligns and 1 when the second does. The raw value is also
//! exposed unclamped for effects that want overshoot.
//!
//! Trackers are pure with respect to their inputs: the same element
//! bounds, viewport height, and scroll offset always produce the same
//! progress. Layout inputs are pushed in by the embedder; anchor offsets
//! are recomputed lazily when something changed.

use serde::{Deserialize, Serialize};

/// An edge of an element or the viewport, along the scroll axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// Top, for vertical scrolling
    Start,
    Center,
    /// Bottom, for vertical scrolling
    End,
}

impl Edge {
    /// Offset of this edge from the start of an extent of the given length
    fn offset_in(&self, length: f32) -> f32 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => length / 2.0,
            Edge::End => length,
        }
    }
}

/// One endpoint of a scroll span: progress hits this endpoint when the
/// element edge lines up with the viewport edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }
}

/// The scroll range a tracker reports progress over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollSpan {
    pub start: Anchor,
    pub end: Anchor,
}

impl ScrollSpan {
    /// Full visibility span: 0 as the element's top enters at the bottom of
    /// the viewport, 1 as its bottom leaves at the top. The usual parallax
    /// driver.
    pub const fn enter_exit() -> Self {
        Self {
            start: Anchor::new(Edge::Start, Edge::End),
            end: Anchor::new(Edge::End, Edge::Start),
        }
    }

    /// Containment span: 0 when the element's top reaches the viewport top,
    /// 1 when its bottom reaches the viewport bottom. Useful for elements
    /// taller than the viewport (pinned sections).
    pub const fn contain() -> Self {
        Self {
            start: Anchor::new(Edge::Start, Edge::Start),
            end: Anchor::new(Edge::End, Edge::End),
        }
    }
}

impl Default for ScrollSpan {
    fn default() -> Self {
        Self::enter_exit()
    }
}

/// Tracks one element's scroll progress through its span.
///
/// Feed it layout updates (`set_element_bounds`, `set_viewport_height`) and
/// scroll offsets as they happen, and read `progress()` each frame. The
/// output is typically written into a motion signal and smoothed by a
/// spring downstream.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    span: ScrollSpan,
    /// Element top in document coordinates
    element_top: f32,
    element_height: f32,
    viewport_height: f32,
    scroll_offset: f32,
    /// Scroll offsets at which progress is exactly 0 and 1
    start_offset: f32,
    end_offset: f32,
    dirty: bool,
}

impl ScrollTracker {
    pub fn new(span: ScrollSpan) -> Self {
        Self {
            span,
            element_top: 0.0,
            element_height: 0.0,
            viewport_height: 0.0,
            scroll_offset: 0.0,
            start_offset: 0.0,
            end_offset: 0.0,
            dirty: true,
        }
    }

    pub fn span(&self) -> ScrollSpan {
        self.span
    }

    /// Update the element's document-space top and height (from layout or a
    /// resize observer)
    pub fn set_element_bounds(&mut self, top: f32, height: f32) {
        self.element_top = top;
        self.element_height = height.max(0.0);
        self.dirty = true;
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.dirty = true;
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    /// The scroll offset at which the given anchor's edges align
    fn anchor_offset(&self, anchor: Anchor) -> f32 {
        let element_edge = self.element_top + anchor.element.offset_in(self.element_height);
        let viewport_edge = anchor.viewport.offset_in(self.viewport_height);
        element_edge - viewport_edge
    }

    fn recompute(&mut self) {
        if !self.dirty {
            return;
        }
        self.start_offset = self.anchor_offset(self.span.start);
        self.end_offset = self.anchor_offset(self.span.end);
        if self.end_offset < self.start_offset {
            tracing::warn!(
                start = self.start_offset,
                end = self.end_offset,
                "scroll span is inverted; progress will run backwards"
            );
        }
        self.dirty = false;
    }

    /// Unclamped progress. Negative before the span, above 1 after it.
    /// A degenerate span (both anchors at the same offset) reports 0 before
    /// the offset and 1 at or past it.
    pub fn raw_progress(&mut self) -> f32 {
        self.recompute();
        let range = self.end_offset - self.start_offset;
        if range.abs() < f32::EPSILON {
            return if self.scroll_offset >= self.start_offset {
                1.0
            } else {
                0.0
            };
        }
        (self.scroll_offset - self.start_offset) / range
    }

    /// Progress clamped to `[0, 1]`
    pub fn progress(&mut self) -> f32 {
        self.raw_progress().clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollTracker {
        // A 400px-tall element starting 1000px into the document, viewed
        // through an 800px viewport
        let mut t = ScrollTracker::new(ScrollSpan::enter_exit());
        t.set_element_bounds(1000.0, 400.0);
        t.set_viewport_height(800.0);
        t
    }

    #[test]
    fn test_enter_exit_endpoints() {
        let mut t = tracker();

        // Element top at viewport bottom
        t.set_scroll_offset(200.0);
        assert_eq!(t.progress(), 0.0);

        // Element bottom at viewport top
        t.set_scroll_offset(1400.0);
        assert_eq!(t.progress(), 1.0);

        // Element center at viewport center
        t.set_scroll_offset(800.0);
        assert_eq!(t.progress(), 0.5);
    }

    #[test]
    fn test_clamped_vs_raw() {
        let mut t = tracker();

        t.set_scroll_offset(0.0);
        assert!(t.raw_progress() < 0.0);
        assert_eq!(t.progress(), 0.0);

        t.set_scroll_offset(2000.0);
        assert!(t.raw_progress() > 1.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let mut t = tracker();
        t.set_scroll_offset(650.0);
        let first = t.progress();
        assert_eq!(t.progress(), first);

        let mut again = tracker();
        again.set_scroll_offset(650.0);
        assert_eq!(again.progress(), first);
    }

    #[test]
    fn test_layout_change_recomputes() {
        let mut t = tracker();
        t.set_scroll_offset(200.0);
        assert_eq!(t.progress(), 0.0);

        // Element moved 100px further down the page; the same scroll
        // offset is now before the span
        t.set_element_bounds(1100.0, 400.0);
        assert!(t.raw_progress() < 0.0);
        t.set_scroll_offset(300.0);
        assert_eq!(t.progress(), 0.0);

        // Taller viewport starts the span earlier
        t.set_viewport_height(1000.0);
        t.set_scroll_offset(100.0);
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn test_contain_span() {
        let mut t = ScrollTracker::new(ScrollSpan::contain());
        // Element taller than the viewport
        t.set_element_bounds(1000.0, 2000.0);
        t.set_viewport_height(800.0);

        t.set_scroll_offset(1000.0); // top at viewport top
        assert_eq!(t.progress(), 0.0);
        t.set_scroll_offset(2200.0); // bottom at viewport bottom
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_degenerate_span() {
        // Zero-height element with matching anchors collapses the span
        let mut t = ScrollTracker::new(ScrollSpan {
            start: Anchor::new(Edge::Start, Edge::Start),
            end: Anchor::new(Edge::End, Edge::Start),
        });
        t.set_element_bounds(500.0, 0.0);
        t.set_viewport_height(800.0);

        t.set_scroll_offset(499.0);
        assert_eq!(t.progress(), 0.0);
        t.set_scroll_offset(500.0);
        assert_eq!(t.progress(), 1.0);
        t.set_scroll_offset(501.0);
        assert_eq!(t.progress(), 1.0);
    }
}
