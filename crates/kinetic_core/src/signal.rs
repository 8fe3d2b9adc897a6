//! Motion value store
//!
//! Named, observable numeric/vector values that drive animated visual
//! properties. This is a push-style observer graph:
//! - raw input (scroll offset, pointer position) lands in a signal via
//!   [`MotionGraph::set`]
//! - immediate subscribers are notified synchronously from `set`
//! - framed subscribers are queued and delivered once per frame by
//!   [`MotionGraph::flush_framed`], which the runtime calls in the push
//!   phase of its tick
//!
//! # Re-entrancy
//!
//! Subscriber callbacks receive `&mut MotionGraph` and may freely read,
//! write, and unsubscribe. Two guards keep this from looping forever:
//! a callback that is already mid-flight is skipped rather than re-entered,
//! and notification chains across distinct subscriptions are cut at a fixed
//! depth with [`SignalError::Reentrancy`]. The offending write still lands
//! (last-write wins) but its cascade is dropped with a warning, since a
//! one-frame visual glitch beats freezing the frame loop.
//!
//! # Disposal
//!
//! Liveness is checked at dispatch time, not at registration time: an
//! unsubscribed callback never fires again even if the unsubscribe happened
//! while its notification was already pending, or from inside the callback
//! itself.

use crate::error::{ConfigError, SignalError};
use crate::geometry::Vec2;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a motion signal
    pub struct SignalId;
    /// Handle to a subscription, used to dispose it
    pub struct SubscriptionId;
}

/// Maximum depth of synchronous notification chains before the engine
/// breaks the cycle and drops the cascade.
pub const MAX_NOTIFY_DEPTH: u32 = 10;

/// Value carried by a motion signal
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionValue {
    Scalar(f32),
    Vector(Vec2),
}

impl MotionValue {
    pub fn is_nan(&self) -> bool {
        match self {
            MotionValue::Scalar(v) => v.is_nan(),
            MotionValue::Vector(v) => v.is_nan(),
        }
    }

    /// Scalar payload, if this is a scalar signal
    pub fn scalar(&self) -> Option<f32> {
        match self {
            MotionValue::Scalar(v) => Some(*v),
            MotionValue::Vector(_) => None,
        }
    }

    /// Vector payload, if this is a vector signal
    pub fn vector(&self) -> Option<Vec2> {
        match self {
            MotionValue::Scalar(_) => None,
            MotionValue::Vector(v) => Some(*v),
        }
    }
}

impl From<f32> for MotionValue {
    fn from(v: f32) -> Self {
        MotionValue::Scalar(v)
    }
}

impl From<Vec2> for MotionValue {
    fn from(v: Vec2) -> Self {
        MotionValue::Vector(v)
    }
}

/// When a subscriber is notified relative to the write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyMode {
    /// Synchronously, from inside `set`
    Immediate,
    /// Once per frame, during the runtime's push phase
    Framed,
}

/// Subscriber callback. Receives the graph so it can read other signals,
/// write (subject to the re-entrancy guard), or unsubscribe.
pub type SignalCallback = Box<dyn FnMut(&mut MotionGraph, MotionValue) + Send>;

struct SignalNode {
    name: String,
    value: MotionValue,
    version: u64,
    /// Already queued for the next framed flush
    queued: bool,
    subscribers: SmallVec<[SubscriptionId; 4]>,
}

struct SubscriptionNode {
    signal: SignalId,
    mode: NotifyMode,
    /// Taken out while the callback is running; `None` also means a
    /// mid-flight callback cannot be re-entered.
    callback: Option<SignalCallback>,
}

/// The store of all motion signals and their subscribers
pub struct MotionGraph {
    signals: SlotMap<SignalId, SignalNode>,
    subscriptions: SlotMap<SubscriptionId, SubscriptionNode>,
    names: FxHashMap<String, SignalId>,
    /// Signals with a pending framed delivery
    dirty: Vec<SignalId>,
    notify_depth: u32,
}

impl MotionGraph {
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            subscriptions: SlotMap::with_key(),
            names: FxHashMap::default(),
            dirty: Vec::new(),
            notify_depth: 0,
        }
    }

    // =========================================================================
    // Creation and removal
    // =========================================================================

    /// Create a named scalar signal
    pub fn create_scalar(
        &mut self,
        name: impl Into<String>,
        initial: f32,
    ) -> Result<SignalId, ConfigError> {
        self.create(name, MotionValue::Scalar(initial))
    }

    /// Create a named vector signal
    pub fn create_vector(
        &mut self,
        name: impl Into<String>,
        initial: Vec2,
    ) -> Result<SignalId, ConfigError> {
        self.create(name, MotionValue::Vector(initial))
    }

    /// Create a named signal with an initial value. Rejects NaN initial
    /// values and duplicate names.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        initial: MotionValue,
    ) -> Result<SignalId, ConfigError> {
        if initial.is_nan() {
            return Err(ConfigError::NanValue);
        }
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ConfigError::DuplicateSignalName(name));
        }
        let id = self.signals.insert(SignalNode {
            name: name.clone(),
            value: initial,
            version: 0,
            queued: false,
            subscribers: SmallVec::new(),
        });
        self.names.insert(name, id);
        Ok(id)
    }

    /// Remove a signal and all of its subscriptions
    pub fn remove(&mut self, id: SignalId) {
        if let Some(node) = self.signals.remove(id) {
            self.names.remove(&node.name);
            for sub in node.subscribers {
                self.subscriptions.remove(sub);
            }
        }
    }

    /// Resolve a signal by name
    pub fn lookup(&self, name: &str) -> Option<SignalId> {
        self.names.get(name).copied()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current value of a signal
    pub fn get(&self, id: SignalId) -> Option<MotionValue> {
        self.signals.get(id).map(|n| n.value)
    }

    /// Current scalar value (None for vector signals or dead handles)
    pub fn scalar(&self, id: SignalId) -> Option<f32> {
        self.get(id).and_then(|v| v.scalar())
    }

    /// Current vector value (None for scalar signals or dead handles)
    pub fn vector(&self, id: SignalId) -> Option<Vec2> {
        self.get(id).and_then(|v| v.vector())
    }

    /// Version counter, bumped on every write (for change detection)
    pub fn version(&self, id: SignalId) -> Option<u64> {
        self.signals.get(id).map(|n| n.version)
    }

    /// Signal name
    pub fn name(&self, id: SignalId) -> Option<&str> {
        self.signals.get(id).map(|n| n.name.as_str())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Overwrite a signal's value.
    ///
    /// The write always lands (last-write wins). Immediate subscribers are
    /// notified synchronously unless the notification chain has already
    /// recursed past [`MAX_NOTIFY_DEPTH`], in which case the cascade is
    /// dropped and [`SignalError::Reentrancy`] is returned. Framed
    /// subscribers are queued for the next [`flush_framed`].
    ///
    /// [`flush_framed`]: MotionGraph::flush_framed
    pub fn set(&mut self, id: SignalId, value: impl Into<MotionValue>) -> Result<(), SignalError> {
        let value = value.into();
        if value.is_nan() {
            return Err(SignalError::NanValue);
        }
        let node = self.signals.get_mut(id).ok_or(SignalError::Dangling)?;
        node.value = value;
        node.version += 1;
        if !node.queued && !node.subscribers.is_empty() {
            node.queued = true;
            self.dirty.push(id);
        }

        if self.notify_depth >= MAX_NOTIFY_DEPTH {
            tracing::warn!(
                signal = %node.name,
                depth = self.notify_depth,
                "signal update chain recursed past depth limit; dropping notification"
            );
            return Err(SignalError::Reentrancy {
                depth: self.notify_depth,
            });
        }

        self.dispatch(id, NotifyMode::Immediate, value);
        Ok(())
    }

    /// Deliver all pending framed notifications.
    ///
    /// Called by the runtime in the push phase of its tick, after input
    /// ingestion and spring integration. Subscribers see the value current
    /// at delivery time, so multiple writes within a frame coalesce into
    /// one notification. Writes made from inside a framed callback queue
    /// for the *next* flush, not this one.
    pub fn flush_framed(&mut self) {
        let pending = std::mem::take(&mut self.dirty);
        for id in &pending {
            if let Some(node) = self.signals.get_mut(*id) {
                node.queued = false;
            }
        }
        for id in pending {
            if let Some(value) = self.get(id) {
                self.dispatch(id, NotifyMode::Framed, value);
            }
        }
    }

    /// Whether any framed deliveries are pending
    pub fn has_pending_framed(&self) -> bool {
        !self.dirty.is_empty()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback on a signal. Returns a disposer handle; the
    /// callback never fires after [`unsubscribe`] is called with it.
    ///
    /// [`unsubscribe`]: MotionGraph::unsubscribe
    pub fn subscribe<F>(&mut self, id: SignalId, mode: NotifyMode, callback: F) -> SubscriptionId
    where
        F: FnMut(&mut MotionGraph, MotionValue) + Send + 'static,
    {
        let sub = self.subscriptions.insert(SubscriptionNode {
            signal: id,
            mode,
            callback: Some(Box::new(callback)),
        });
        if let Some(node) = self.signals.get_mut(id) {
            node.subscribers.push(sub);
        }
        sub
    }

    /// Dispose a subscription. Safe to call from inside the subscription's
    /// own callback; the callback will not fire again.
    pub fn unsubscribe(&mut self, sub: SubscriptionId) {
        if let Some(node) = self.subscriptions.remove(sub) {
            if let Some(sig) = self.signals.get_mut(node.signal) {
                sig.subscribers.retain(|s| *s != sub);
            }
        }
    }

    /// Number of live subscriptions on a signal
    pub fn subscriber_count(&self, id: SignalId) -> usize {
        self.signals
            .get(id)
            .map(|n| n.subscribers.len())
            .unwrap_or(0)
    }

    fn dispatch(&mut self, id: SignalId, mode: NotifyMode, value: MotionValue) {
        // Snapshot the subscriber list: callbacks may subscribe or
        // unsubscribe while we iterate.
        let subs: SmallVec<[SubscriptionId; 4]> = match self.signals.get(id) {
            Some(node) => node.subscribers.clone(),
            None => return,
        };

        for sub in subs {
            // Liveness and mode are checked at dispatch time. Taking the
            // callback out while it runs means a disposed-or-mid-flight
            // subscription is skipped, never re-entered.
            let mut callback = match self.subscriptions.get_mut(sub) {
                Some(node) if node.mode == mode => match node.callback.take() {
                    Some(cb) => cb,
                    None => continue,
                },
                _ => continue,
            };

            self.notify_depth += 1;
            callback(self, value);
            self.notify_depth -= 1;

            // Restore unless the callback disposed its own subscription.
            if let Some(node) = self.subscriptions.get_mut(sub) {
                node.callback = Some(callback);
            }
        }
    }

    /// Statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            signal_count: self.signals.len(),
            subscription_count: self.subscriptions.len(),
            pending_framed: self.dirty.len(),
        }
    }
}

impl Default for MotionGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a [`MotionGraph`]
#[derive(Debug, Clone)]
pub struct GraphStats {
    pub signal_count: usize,
    pub subscription_count: usize,
    pub pending_framed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_create_get_set() {
        let mut graph = MotionGraph::new();

        let scroll = graph.create_scalar("scroll_y", 0.0).unwrap();
        assert_eq!(graph.scalar(scroll), Some(0.0));

        graph.set(scroll, 120.0).unwrap();
        assert_eq!(graph.scalar(scroll), Some(120.0));
        assert_eq!(graph.version(scroll), Some(1));
        assert_eq!(graph.lookup("scroll_y"), Some(scroll));
    }

    #[test]
    fn test_nan_rejected() {
        let mut graph = MotionGraph::new();

        assert_eq!(
            graph.create_scalar("bad", f32::NAN),
            Err(ConfigError::NanValue)
        );

        let ok = graph.create_scalar("ok", 0.0).unwrap();
        assert_eq!(graph.set(ok, f32::NAN), Err(SignalError::NanValue));
        // Value untouched by the rejected write
        assert_eq!(graph.scalar(ok), Some(0.0));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut graph = MotionGraph::new();
        graph.create_scalar("x", 0.0).unwrap();
        assert!(matches!(
            graph.create_scalar("x", 1.0),
            Err(ConfigError::DuplicateSignalName(_))
        ));
    }

    #[test]
    fn test_immediate_notification() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        graph.subscribe(sig, NotifyMode::Immediate, move |_, v| {
            seen_clone.lock().unwrap().push(v.scalar().unwrap());
        });

        graph.set(sig, 1.0).unwrap();
        graph.set(sig, 2.0).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_framed_coalescing() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        graph.subscribe(sig, NotifyMode::Framed, move |_, v| {
            seen_clone.lock().unwrap().push(v.scalar().unwrap());
        });

        // Multiple writes within a frame coalesce into one delivery of the
        // final value.
        graph.set(sig, 1.0).unwrap();
        graph.set(sig, 2.0).unwrap();
        graph.set(sig, 3.0).unwrap();
        assert!(seen.lock().unwrap().is_empty());

        graph.flush_framed();
        assert_eq!(*seen.lock().unwrap(), vec![3.0]);

        // Nothing pending after the flush
        graph.flush_framed();
        assert_eq!(*seen.lock().unwrap(), vec![3.0]);
    }

    #[test]
    fn test_unsubscribe_during_own_callback() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();

        let calls = Arc::new(Mutex::new(0));
        let calls_clone = calls.clone();
        let sub_cell = Arc::new(Mutex::new(None::<SubscriptionId>));
        let sub_cell_clone = sub_cell.clone();

        let sub = graph.subscribe(sig, NotifyMode::Immediate, move |g, _| {
            *calls_clone.lock().unwrap() += 1;
            let sub = sub_cell_clone.lock().unwrap().unwrap();
            g.unsubscribe(sub);
        });
        *sub_cell.lock().unwrap() = Some(sub);

        graph.set(sig, 1.0).unwrap();
        graph.set(sig, 2.0).unwrap();
        graph.flush_framed();

        // Fired exactly once; never again after self-disposal
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(graph.subscriber_count(sig), 0);
    }

    #[test]
    fn test_unsubscribe_with_pending_framed_delivery() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();

        let calls = Arc::new(Mutex::new(0));
        let calls_clone = calls.clone();
        let sub = graph.subscribe(sig, NotifyMode::Framed, move |_, _| {
            *calls_clone.lock().unwrap() += 1;
        });

        // Write queues the delivery, then the subscription is disposed
        // before the flush: it must not fire.
        graph.set(sig, 1.0).unwrap();
        graph.unsubscribe(sub);
        graph.flush_framed();

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_self_cycle_is_cut() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();

        let calls = Arc::new(Mutex::new(0));
        let calls_clone = calls.clone();
        graph.subscribe(sig, NotifyMode::Immediate, move |g, v| {
            *calls_clone.lock().unwrap() += 1;
            // Writing the signal we are reacting to: the mid-flight
            // callback must not be re-entered.
            let _ = g.set(sig, v.scalar().unwrap() + 1.0);
        });

        graph.set(sig, 1.0).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
        // The nested write landed even though its cascade was cut
        assert_eq!(graph.scalar(sig), Some(2.0));
    }

    #[test]
    fn test_long_chain_cut_at_depth_limit() {
        let mut graph = MotionGraph::new();

        // Chain s0 -> s1 -> ... -> s14, each subscription writing the next
        let ids: Vec<SignalId> = (0..15)
            .map(|i| graph.create_scalar(format!("s{i}"), 0.0).unwrap())
            .collect();
        let errors = Arc::new(Mutex::new(Vec::new()));
        for i in 0..14 {
            let next = ids[i + 1];
            let errors_clone = errors.clone();
            graph.subscribe(ids[i], NotifyMode::Immediate, move |g, v| {
                if let Err(e) = g.set(next, v.scalar().unwrap()) {
                    errors_clone.lock().unwrap().push(e);
                }
            });
        }

        graph.set(ids[0], 7.0).unwrap();

        // The chain was cut at the depth limit: the write at the limit
        // landed (last-write) but its cascade was dropped.
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SignalError::Reentrancy { .. }));
        let cut = MAX_NOTIFY_DEPTH as usize;
        assert_eq!(graph.scalar(ids[cut]), Some(7.0));
        assert_eq!(graph.scalar(ids[cut + 1]), Some(0.0));
    }

    #[test]
    fn test_remove_signal_drops_subscriptions() {
        let mut graph = MotionGraph::new();
        let sig = graph.create_scalar("x", 0.0).unwrap();
        graph.subscribe(sig, NotifyMode::Immediate, |_, _| {});
        graph.subscribe(sig, NotifyMode::Framed, |_, _| {});
        assert_eq!(graph.stats().subscription_count, 2);

        graph.remove(sig);
        let stats = graph.stats();
        assert_eq!(stats.signal_count, 0);
        assert_eq!(stats.subscription_count, 0);
        assert_eq!(graph.lookup("x"), None);
        assert_eq!(graph.set(sig, 1.0), Err(SignalError::Dangling));
    }

    #[test]
    fn test_vector_signal() {
        let mut graph = MotionGraph::new();
        let ptr = graph.create_vector("pointer", Vec2::ZERO).unwrap();

        graph.set(ptr, Vec2::new(3.0, 4.0)).unwrap();
        assert_eq!(graph.vector(ptr), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(graph.scalar(ptr), None);
    }
}
