//! Difficulty-scaling enemy spawner
//!
//! Evaluation runs on its own cadence rather than every frame. A single
//! difficulty ramp, shared by every archetype, moves each archetype's spawn
//! odds and cooldown bounds from their start values toward their end values
//! as level time approaches `max_difficulty_time`. Each archetype keeps its
//! own re-check deadline; one archetype's schedule never affects another's.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use super::bounds::Playfield;
use crate::tuning::{EnemyArchetype, SpawnerTuning};

/// Side of the playfield an archetype enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSide {
    Top,
    Left,
    Right,
}

/// Interpolate from `max` at t=0 down (or up) to `min` at t=1
///
/// Deliberately written as `max - (max - min) * t` rather than a
/// conventional lerp: the arguments are the value at t=1 and the value at
/// t=0 respectively, so a config whose end bound exceeds its start bound
/// ramps the result upward over time. Callers pass (end, start, t).
#[inline]
pub fn lerp_down(min: f32, max: f32, t: f32) -> f32 {
    max - (max - min) * t
}

/// A pending enemy spawn emitted by an evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Index into the spawner's archetype list
    pub archetype: usize,
    pub pos: Vec2,
    /// Heading pointing inward from the spawn side
    pub heading: f32,
    pub vel: Vec2,
}

/// Periodic spawn evaluator with per-archetype cooldowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    update_interval: f32,
    max_difficulty_time: f32,
    /// Next evaluation deadline on the level clock
    next_update: f32,
    /// Per-archetype re-check deadlines, parallel to the archetype list
    next_spawn: Vec<f32>,
}

impl Spawner {
    pub fn new(tuning: &SpawnerTuning) -> Self {
        Self {
            update_interval: tuning.update_interval,
            max_difficulty_time: tuning.max_difficulty_time,
            next_update: 0.0,
            next_spawn: vec![0.0; tuning.archetypes.len()],
        }
    }

    /// Shared difficulty ramp: 0 at level start, saturating at 1
    pub fn difficulty_mod(&self, level_time: f32) -> f32 {
        (level_time / self.max_difficulty_time).clamp(0.0, 1.0)
    }

    /// Evaluate spawn conditions, appending any spawns to `out`
    ///
    /// Throttled to the configured cadence; between deadlines this is a
    /// no-op. Every gated archetype re-arms its cooldown whether or not it
    /// spawned anything this pass.
    pub fn update<R: Rng>(
        &mut self,
        level_time: f32,
        archetypes: &[EnemyArchetype],
        field: &Playfield,
        rng: &mut R,
        out: &mut Vec<SpawnRequest>,
    ) {
        if level_time < self.next_update {
            return;
        }

        let difficulty = self.difficulty_mod(level_time);

        for (index, arch) in archetypes.iter().enumerate() {
            if level_time < self.next_spawn[index] {
                continue;
            }

            let frequency =
                lerp_down(arch.frequency_end, arch.frequency_start, difficulty).clamp(0.0, 1.0);
            if rng.random::<f32>() <= frequency {
                out.push(spawn_request(index, arch, field, rng));
            }

            let min_delay = lerp_down(arch.min_delay_end, arch.min_delay_start, difficulty);
            let max_delay = lerp_down(arch.max_delay_end, arch.max_delay_start, difficulty);
            self.next_spawn[index] = level_time + sample_range(rng, min_delay, max_delay);
        }

        self.next_update = level_time + self.update_interval;
    }
}

/// Uniform sample over `[lo, hi)`, tolerating a degenerate window
fn sample_range<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Position flush against the configured side (offset by the half-extent),
/// uniform along the perpendicular axis, heading and velocity inward
fn spawn_request<R: Rng>(
    index: usize,
    arch: &EnemyArchetype,
    field: &Playfield,
    rng: &mut R,
) -> SpawnRequest {
    let he = arch.character.half_extent;
    let speed = arch.character.movement_speed;
    let half = field.half_extents;

    let (pos, heading, vel) = match arch.side {
        SpawnSide::Top => {
            let x = sample_range(rng, -half.x + he.x, half.x - he.x);
            (
                Vec2::new(x, half.y + he.y),
                PI,
                Vec2::new(0.0, -speed),
            )
        }
        SpawnSide::Left => {
            let y = sample_range(rng, -half.y + he.y, half.y - he.y);
            (
                Vec2::new(-half.x - he.x, y),
                -FRAC_PI_2,
                Vec2::new(speed, 0.0),
            )
        }
        SpawnSide::Right => {
            let y = sample_range(rng, -half.y + he.y, half.y - he.y);
            (
                Vec2::new(half.x + he.x, y),
                FRAC_PI_2,
                Vec2::new(-speed, 0.0),
            )
        }
    };

    SpawnRequest {
        archetype: index,
        pos,
        heading,
        vel,
    }
}
