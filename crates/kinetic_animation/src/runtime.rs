//! Animation runtime
//!
//! Owns the motion graph and all registered springs, and advances them with
//! a strict three-phase frame:
//!
//! 1. **Ingest**: queued input updates (scroll offsets, pointer positions,
//!    retargets) are applied to the graph and to spring targets
//! 2. **Integrate**: every unsettled spring steps once and writes its
//!    value into its output signal
//! 3. **Push**: framed subscribers receive the values current at the end
//!    of the frame
//!
//! Raw input applied in a frame is therefore always visible to that frame's
//! integration pass, and integration output is always visible to that
//! frame's consumers. There is no one-frame lag from update-order races.
//!
//! The runtime can be driven manually with [`AnimationRuntime::tick`] (the
//! embedding event loop calls it once per frame) or from a background
//! thread via [`AnimationRuntime::start`], which keeps springs advancing
//! while the window is unfocused and signals the main thread through a wake
//! callback.

use crate::spring::{Spring, SpringConfig};
use kinetic_core::{MotionGraph, MotionValue, SignalId, Vec2};
use slotmap::{new_key_type, SlotMap};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered spring binding
    pub struct SpringId;
}

enum SpringKind {
    Scalar(Spring),
    Vector { x: Spring, y: Spring },
}

struct SpringNode {
    kind: SpringKind,
    /// Signal the spring writes its smoothed value into each frame
    output: SignalId,
    /// On the active list; cleared when the spring settles
    active: bool,
}

/// An input update queued for the next frame's ingest phase. Queuing keeps
/// event-handler code off the hot path and guarantees the three-phase
/// ordering even for updates raised from inside subscriber callbacks.
enum QueuedInput {
    SetSignal(SignalId, MotionValue),
    Retarget(SpringId, MotionValue),
}

struct RuntimeInner {
    graph: MotionGraph,
    springs: SlotMap<SpringId, SpringNode>,
    /// Springs that still need integration; appended on retarget, pruned
    /// on settling and disposal
    active: Vec<SpringId>,
    inputs: VecDeque<QueuedInput>,
    last_frame: Instant,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            graph: MotionGraph::new(),
            springs: SlotMap::with_key(),
            active: Vec::new(),
            inputs: VecDeque::new(),
            last_frame: Instant::now(),
        }
    }

    fn add_spring(
        &mut self,
        name: &str,
        initial: MotionValue,
        config: SpringConfig,
    ) -> Option<SpringId> {
        let output = match self.graph.create(name, initial) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(name, error = %e, "failed to create spring output signal");
                return None;
            }
        };
        let kind = match initial {
            MotionValue::Scalar(v) => SpringKind::Scalar(Spring::new(config, v)),
            MotionValue::Vector(v) => SpringKind::Vector {
                x: Spring::new(config, v.x),
                y: Spring::new(config, v.y),
            },
        };
        Some(self.springs.insert(SpringNode {
            kind,
            output,
            active: false,
        }))
    }

    fn remove_spring(&mut self, id: SpringId) {
        if let Some(node) = self.springs.remove(id) {
            self.graph.remove(node.output);
        }
    }

    fn retarget(&mut self, id: SpringId, target: MotionValue) {
        let Some(node) = self.springs.get_mut(id) else {
            return;
        };
        match (&mut node.kind, target) {
            (SpringKind::Scalar(s), MotionValue::Scalar(t)) => s.set_target(t),
            (SpringKind::Vector { x, y }, MotionValue::Vector(t)) => {
                x.set_target(t.x);
                y.set_target(t.y);
            }
            _ => {
                tracing::warn!(?id, "spring retarget with mismatched value kind; ignored");
                return;
            }
        }
        if !node.active {
            node.active = true;
            self.active.push(id);
        }
    }

    fn snap(&mut self, id: SpringId, value: MotionValue) {
        let Some(node) = self.springs.get_mut(id) else {
            return;
        };
        match (&mut node.kind, value) {
            (SpringKind::Scalar(s), MotionValue::Scalar(v)) => s.snap_to(v),
            (SpringKind::Vector { x, y }, MotionValue::Vector(v)) => {
                x.snap_to(v.x);
                y.snap_to(v.y);
            }
            _ => return,
        }
        node.active = false;
        let output = node.output;
        if let Err(e) = self.graph.set(output, value) {
            tracing::warn!(?id, error = %e, "spring snap failed to write output");
        }
    }

    fn spring_value(&self, id: SpringId) -> Option<MotionValue> {
        self.springs.get(id).map(|node| match &node.kind {
            SpringKind::Scalar(s) => MotionValue::Scalar(s.value()),
            SpringKind::Vector { x, y } => MotionValue::Vector(Vec2::new(x.value(), y.value())),
        })
    }

    fn is_settled(&self, id: SpringId) -> bool {
        self.springs
            .get(id)
            .map(|node| match &node.kind {
                SpringKind::Scalar(s) => s.is_settled(),
                SpringKind::Vector { x, y } => x.is_settled() && y.is_settled(),
            })
            .unwrap_or(true)
    }

    /// Advance one frame. Returns true while anything is still in motion.
    fn tick(&mut self, dt: f32) -> bool {
        // Phase 1: ingest
        while let Some(input) = self.inputs.pop_front() {
            match input {
                QueuedInput::SetSignal(id, value) => {
                    if let Err(e) = self.graph.set(id, value) {
                        tracing::trace!(error = %e, "queued signal write dropped");
                    }
                }
                QueuedInput::Retarget(id, target) => self.retarget(id, target),
            }
        }

        // Phase 2: integrate. Snapshot the active list so disposal during
        // the pass (or from a write callback) cannot invalidate iteration.
        let snapshot: Vec<SpringId> = self.active.clone();
        for id in snapshot {
            let Some(node) = self.springs.get_mut(id) else {
                continue;
            };
            if !node.active {
                continue;
            }
            let (value, settled) = match &mut node.kind {
                SpringKind::Scalar(s) => {
                    s.step(dt);
                    (MotionValue::Scalar(s.value()), s.is_settled())
                }
                SpringKind::Vector { x, y } => {
                    x.step(dt);
                    y.step(dt);
                    (
                        MotionValue::Vector(Vec2::new(x.value(), y.value())),
                        x.is_settled() && y.is_settled(),
                    )
                }
            };
            if settled {
                node.active = false;
            }
            let output = node.output;
            if let Err(e) = self.graph.set(output, value) {
                tracing::trace!(?id, error = %e, "spring output write dropped");
            }
        }
        self.active
            .retain(|id| self.springs.get(*id).map(|n| n.active).unwrap_or(false));

        // Phase 3: push
        self.graph.flush_framed();

        // A framed callback may write another framed-subscribed signal
        // during the flush; that delivery lands next frame, so the frame
        // loop must keep running for it.
        !self.active.is_empty() || !self.inputs.is_empty() || self.graph.has_pending_framed()
    }
}

/// Callback used to wake the embedding event loop when the background
/// thread has produced motion that needs painting.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The animation runtime context object.
///
/// Explicit lifecycle rather than a module-level singleton: create one per
/// window (or per test), optionally `start()` its background thread, and
/// `shutdown()` tears it down deterministically. Components talk to it
/// through cheap [`RuntimeHandle`]s that do not keep it alive.
pub struct AnimationRuntime {
    inner: Arc<Mutex<RuntimeInner>>,
    stop_flag: Arc<AtomicBool>,
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
    target_fps: u32,
}

impl AnimationRuntime {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RuntimeInner::new())),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
            target_fps: 120,
        }
    }

    /// Set a callback invoked from the tick thread whenever motion is
    /// active, typically an event-loop wake proxy.
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    /// Start the background tick thread
    pub fn start(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }
        tracing::debug!(fps = self.target_fps, "animation runtime starting");

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();
        let frame_duration = Duration::from_micros(1_000_000 / self.target_fps as u64);

        self.thread_handle = Some(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let has_active = {
                    let mut inner = inner.lock().unwrap();
                    let now = Instant::now();
                    let dt = (now - inner.last_frame).as_secs_f32();
                    inner.last_frame = now;
                    inner.tick(dt)
                };

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread and wait for it to exit
    pub fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            tracing::debug!("animation runtime stopped");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the redraw flag set by the background thread
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Advance one frame using wall-clock elapsed time. Returns true while
    /// anything is still in motion.
    pub fn tick(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let now = Instant::now();
        let dt = (now - inner.last_frame).as_secs_f32();
        inner.last_frame = now;
        inner.tick(dt)
    }

    /// Advance one frame with an explicit dt (deterministic drive for
    /// tests and offline rendering)
    pub fn tick_with_dt(&self, dt: f32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.last_frame = Instant::now();
        inner.tick(dt)
    }

    /// Get a handle for components to register springs and signals
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for AnimationRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A weak handle to the runtime. Won't keep the runtime alive; every
/// operation is a no-op (or `None`) after the runtime is dropped.
///
/// Handle operations take the runtime lock. Subscriber callbacks run with
/// that lock held, so they must not call handle methods; use the
/// `&mut MotionGraph` passed to the callback instead.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<Mutex<RuntimeInner>>,
}

impl RuntimeHandle {
    /// Run a closure against the motion graph
    pub fn with_graph<R>(&self, f: impl FnOnce(&mut MotionGraph) -> R) -> Option<R> {
        self.inner
            .upgrade()
            .map(|inner| f(&mut inner.lock().unwrap().graph))
    }

    /// Register a spring with a named output signal. Returns `None` if the
    /// runtime is gone or the name is already taken.
    pub fn add_spring(
        &self,
        name: &str,
        initial: impl Into<MotionValue>,
        config: SpringConfig,
    ) -> Option<SpringId> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().add_spring(name, initial.into(), config))
    }

    /// Remove a spring and its output signal
    pub fn remove_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().remove_spring(id);
        }
    }

    /// Retarget a spring immediately (it begins moving on the next tick)
    pub fn retarget(&self, id: SpringId, target: impl Into<MotionValue>) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().retarget(id, target.into());
        }
    }

    /// Queue a retarget for the next frame's ingest phase
    pub fn queue_retarget(&self, id: SpringId, target: impl Into<MotionValue>) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .lock()
                .unwrap()
                .inputs
                .push_back(QueuedInput::Retarget(id, target.into()));
        }
    }

    /// Queue a raw signal write for the next frame's ingest phase
    pub fn queue_set(&self, id: SignalId, value: impl Into<MotionValue>) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .lock()
                .unwrap()
                .inputs
                .push_back(QueuedInput::SetSignal(id, value.into()));
        }
    }

    /// Snap a spring to a value, killing in-flight motion
    pub fn snap_spring(&self, id: SpringId, value: impl Into<MotionValue>) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().snap(id, value.into());
        }
    }

    /// Current smoothed value of a spring
    pub fn spring_value(&self, id: SpringId) -> Option<MotionValue> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().spring_value(id))
    }

    /// Whether a spring is at rest (a dead handle counts as settled)
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().is_settled(id))
            .unwrap_or(true)
    }

    /// The output signal a spring writes into (for subscriptions)
    pub fn spring_output(&self, id: SpringId) -> Option<SignalId> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().springs.get(id).map(|n| n.output))
    }

    /// Whether the runtime still exists
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// ============================================================================
// Animated value wrappers
// ============================================================================

/// A spring-smoothed scalar that registers itself with the runtime and
/// cleans up on drop.
///
/// # Example
///
/// ```ignore
/// let mut opacity = AnimatedValue::new(handle.clone(), "hero.opacity", 0.0, SpringConfig::stiff());
/// opacity.set_target(1.0);
/// // ...runtime ticks...
/// let current = opacity.get();
/// ```
pub struct AnimatedValue {
    handle: RuntimeHandle,
    id: Option<SpringId>,
    target: f32,
}

impl AnimatedValue {
    pub fn new(handle: RuntimeHandle, name: &str, initial: f32, config: SpringConfig) -> Self {
        let id = handle.add_spring(name, initial, config);
        Self {
            handle,
            id,
            target: initial,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        if let Some(id) = self.id {
            self.handle.retarget(id, target);
        }
    }

    /// Jump to a value immediately
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        if let Some(id) = self.id {
            self.handle.snap_spring(id, value);
        }
    }

    pub fn get(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.spring_value(id))
            .and_then(|v| v.scalar())
            .unwrap_or(self.target)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.id
            .map(|id| !self.handle.is_spring_settled(id))
            .unwrap_or(false)
    }

    /// Signal carrying the smoothed value, for subscriptions
    pub fn output(&self) -> Option<SignalId> {
        self.id.and_then(|id| self.handle.spring_output(id))
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove_spring(id);
        }
    }
}

/// A spring-smoothed 2D vector (pointer followers, magnetic offsets)
pub struct AnimatedVec2 {
    handle: RuntimeHandle,
    id: Option<SpringId>,
    target: Vec2,
}

impl AnimatedVec2 {
    pub fn new(handle: RuntimeHandle, name: &str, initial: Vec2, config: SpringConfig) -> Self {
        let id = handle.add_spring(name, initial, config);
        Self {
            handle,
            id,
            target: initial,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
        if let Some(id) = self.id {
            self.handle.retarget(id, target);
        }
    }

    pub fn set_immediate(&mut self, value: Vec2) {
        self.target = value;
        if let Some(id) = self.id {
            self.handle.snap_spring(id, value);
        }
    }

    pub fn get(&self) -> Vec2 {
        self.id
            .and_then(|id| self.handle.spring_value(id))
            .and_then(|v| v.vector())
            .unwrap_or(self.target)
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.id
            .map(|id| !self.handle.is_spring_settled(id))
            .unwrap_or(false)
    }

    pub fn output(&self) -> Option<SignalId> {
        self.id.and_then(|id| self.handle.spring_output(id))
    }
}

impl Drop for AnimatedVec2 {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove_spring(id);
        }
    }
}
