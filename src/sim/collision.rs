//! Layer-masked collision resolution
//!
//! Interactions are filtered by the mask carried by the initiating object
//! (bullet or pickup), not by a generic collision category. Resolution is
//! pairwise and independent; each overlapping pair is processed at most
//! once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::character::{Character, DamageOutcome};
use super::events::GameEvent;
use super::state::PickupKind;

/// Collision layer a simulation object lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Player = 0,
    Enemy = 1,
}

/// Bitmask of layers an object is permitted to interact with on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask matching a single layer
    pub fn only(layer: Layer) -> Self {
        LayerMask(1 << layer as u32)
    }

    /// Mask extended with one more layer
    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | (1 << layer as u32))
    }

    pub fn contains(self, layer: Layer) -> bool {
        (1 << layer as u32) & self.0 != 0
    }
}

/// Circle overlap test on bounding radii
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

/// What happens to a bullet after striking a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    /// Target was vulnerable at contact: the bullet is spent
    Consumed,
    /// Target was invincible at contact: the bullet flies on
    PassedThrough,
}

/// Resolve a bullet overlapping a character
///
/// Returns `None` when the target's layer is not in the bullet's mask.
/// The invincibility flag is snapshotted before damage is applied, because
/// the damage reaction may itself change it; the bullet's fate depends on
/// the flag as it was at the moment of contact.
pub fn resolve_bullet_hit(
    mask: LayerMask,
    damage: i32,
    target_layer: Layer,
    target: &mut Character,
    events: &mut Vec<GameEvent>,
) -> Option<(DamageOutcome, BulletFate)> {
    if !mask.contains(target_layer) {
        return None;
    }

    let was_invincible = target.is_invincible();
    let outcome = target.apply_damage(damage, events);
    let fate = if was_invincible {
        BulletFate::PassedThrough
    } else {
        BulletFate::Consumed
    };
    Some((outcome, fate))
}

/// Resolve a pickup touching a character
///
/// Returns true when the pickup was consumed: any matching-layer contact
/// consumes it, regardless of the target's invincibility.
pub fn resolve_pickup(
    kind: PickupKind,
    mask: LayerMask,
    target_layer: Layer,
    target: &mut Character,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !mask.contains(target_layer) {
        return false;
    }

    match kind {
        PickupKind::Recovery { heal } => target.apply_healing(heal, events),
    }
    true
}
