//! Magnetic attraction fields
//!
//! Interactive elements (buttons, nav links) lean toward a nearby pointer.
//! Each registered target owns a spring-smoothed offset vector; while the
//! pointer is inside a target's radius the offset chases a fraction of the
//! pointer's displacement from the target center, and it relaxes back to
//! zero when the pointer moves away or leaves the surface. The light-mass
//! magnetic spring gives the characteristic quick catch and soft release.

use kinetic_animation::{AnimatedVec2, RuntimeHandle, SpringConfig};
use kinetic_core::{ConfigError, Point, Vec2};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered magnetic target
    pub struct MagnetId;
}

/// How attraction strength varies with distance from the target center
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// Full strength anywhere inside the radius
    #[default]
    Uniform,
    /// Strength fades linearly to zero at the radius edge
    Linear,
}

/// A magnetic target: an element center, an attraction radius, and the
/// fraction of pointer displacement the element follows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagnetTarget {
    pub center: Point,
    pub radius: f32,
    /// `0.3` means the element moves 30% of the way toward the pointer
    pub strength: f32,
    pub falloff: Falloff,
}

impl MagnetTarget {
    /// Standard button magnetism: 30% strength inside the given radius
    pub fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius,
            strength: 0.3,
            falloff: Falloff::Uniform,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || !self.strength.is_finite() {
            return Err(ConfigError::NonFinite);
        }
        if self.radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        Ok(())
    }

    /// The offset this target should chase for a pointer at `pointer`
    fn attraction(&self, pointer: Point) -> Vec2 {
        let displacement = pointer.offset_from(self.center);
        let distance = displacement.length();
        if distance >= self.radius {
            return Vec2::ZERO;
        }
        let scale = match self.falloff {
            Falloff::Uniform => self.strength,
            Falloff::Linear => self.strength * (1.0 - distance / self.radius),
        };
        displacement * scale
    }
}

struct MagnetNode {
    target: MagnetTarget,
    offset: AnimatedVec2,
}

/// The set of magnetic targets on a surface, driven by pointer events
pub struct MagnetField {
    handle: RuntimeHandle,
    targets: SlotMap<MagnetId, MagnetNode>,
}

impl MagnetField {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self {
            handle,
            targets: SlotMap::with_key(),
        }
    }

    /// Register a target. `name` becomes the offset signal's name in the
    /// motion graph.
    pub fn add(&mut self, name: &str, target: MagnetTarget) -> Result<MagnetId, ConfigError> {
        target.validate()?;
        let offset = AnimatedVec2::new(
            self.handle.clone(),
            name,
            Vec2::ZERO,
            SpringConfig::magnetic(),
        );
        Ok(self.targets.insert(MagnetNode { target, offset }))
    }

    /// Remove a target and its offset spring
    pub fn remove(&mut self, id: MagnetId) {
        if self.targets.remove(id).is_none() {
            tracing::debug!(?id, "remove of unknown magnet target");
        }
    }

    /// Update a target's center after layout changes
    pub fn set_center(&mut self, id: MagnetId, center: Point) {
        if let Some(node) = self.targets.get_mut(id) {
            node.target.center = center;
        }
    }

    /// Route a pointer position to every target
    pub fn pointer_moved(&mut self, pointer: Point) {
        for node in self.targets.values_mut() {
            node.offset.set_target(node.target.attraction(pointer));
        }
    }

    /// Pointer left the surface; every offset relaxes back to rest
    pub fn pointer_left(&mut self) {
        for node in self.targets.values_mut() {
            node.offset.set_target(Vec2::ZERO);
        }
    }

    /// Current smoothed offset for a target
    pub fn offset(&self, id: MagnetId) -> Option<Vec2> {
        self.targets.get(id).map(|node| node.offset.get())
    }

    /// The offset the target is currently chasing
    pub fn offset_target(&self, id: MagnetId) -> Option<Vec2> {
        self.targets.get(id).map(|node| node.offset.target())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
