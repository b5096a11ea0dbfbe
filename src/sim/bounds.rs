//! Playfield bounds and off-bounds culling
//!
//! The playfield is an axis-aligned rectangle centered on the origin,
//! computed once at level start. Culling uses each entity's half-extent so
//! removal happens only once the sprite is fully offscreen, and a
//! directional guard keeps freshly spawned entities that are still inbound
//! from off-screen spawn points.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned playfield rectangle centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    /// Half extents in world units
    pub half_extents: Vec2,
}

impl Playfield {
    pub fn new(half_extents: Vec2) -> Self {
        Self { half_extents }
    }

    /// True once an entity is fully past an edge and still moving away from
    /// the field on that axis
    pub fn should_cull(&self, pos: Vec2, vel: Vec2, half_extent: Vec2) -> bool {
        (pos.x > self.half_extents.x + half_extent.x && vel.x > 0.0) // right
            || (pos.x < -self.half_extents.x - half_extent.x && vel.x < 0.0) // left
            || (pos.y > self.half_extents.y + half_extent.y && vel.y > 0.0) // top
            || (pos.y < -self.half_extents.y - half_extent.y && vel.y < 0.0) // bottom
    }

    /// Clamp a position so the entity stays fully inside, inset by `padding`
    pub fn clamp_inside(&self, pos: Vec2, half_extent: Vec2, padding: f32) -> Vec2 {
        let limit = self.half_extents - half_extent - Vec2::splat(padding);
        Vec2::new(
            pos.x.clamp(-limit.x, limit.x),
            pos.y.clamp(-limit.y, limit.y),
        )
    }
}

/// Circle radius covering an entity's half-extent box
#[inline]
pub fn bounding_radius(half_extent: Vec2) -> f32 {
    half_extent.max_element()
}
