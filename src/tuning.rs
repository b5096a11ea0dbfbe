//! Data-driven game balance
//!
//! Everything the simulation consumes as immutable configuration lives
//! here: character stats, bullet templates, the pickup drop table, and the
//! spawner's per-archetype schedule. Defaults mirror the shipped balance;
//! hosts override them by deserializing a JSON document, and missing fields
//! fall back to those defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::collision::{Layer, LayerMask};
use crate::sim::spawner::SpawnSide;

/// A projectile template carried by a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub damage: i32,
    pub speed: f32,
    /// Layers this bullet is allowed to strike
    pub collide_mask: LayerMask,
    pub half_extent: Vec2,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            damage: 1,
            speed: 20.0,
            collide_mask: LayerMask::only(Layer::Enemy),
            half_extent: Vec2::new(0.1, 0.2),
        }
    }
}

impl BulletTuning {
    /// Slower projectile aimed at the player layer
    fn enemy_shot() -> Self {
        Self {
            damage: 1,
            speed: 6.0,
            collide_mask: LayerMask::only(Layer::Player),
            half_extent: Vec2::new(0.1, 0.2),
        }
    }
}

/// Stats shared by every character variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    pub max_health: i32,
    pub movement_speed: f32,
    /// Minimum seconds between shots
    pub shoot_delay: f32,
    /// Bullet spawn anchor in the character's local frame (+Y forward)
    pub muzzle_offset: Vec2,
    pub bullet: BulletTuning,
    pub half_extent: Vec2,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            max_health: 3,
            movement_speed: 5.0,
            shoot_delay: 0.1,
            muzzle_offset: Vec2::new(0.0, 0.6),
            bullet: BulletTuning::default(),
            half_extent: Vec2::new(0.5, 0.5),
        }
    }
}

/// Player-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub character: CharacterTuning,
    pub start_pos: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            character: CharacterTuning::default(),
            start_pos: Vec2::new(0.0, -3.0),
        }
    }
}

/// One enemy spawn profile: stats plus schedule bounds
///
/// The four delay bounds and two frequency bounds are interpolated by the
/// shared difficulty ramp; `*_start` applies at level start, `*_end` at
/// saturation. Frequencies are probabilities in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    pub character: CharacterTuning,
    pub side: SpawnSide,
    pub min_delay_start: f32,
    pub min_delay_end: f32,
    pub max_delay_start: f32,
    pub max_delay_end: f32,
    pub frequency_start: f32,
    pub frequency_end: f32,
    /// Continuous spin in radians/sec when not tracking the player
    pub rotation_speed: f32,
    /// Face the player every frame
    pub look_at_player: bool,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            character: CharacterTuning {
                max_health: 1,
                movement_speed: 2.5,
                shoot_delay: 1.2,
                muzzle_offset: Vec2::new(0.0, 0.4),
                bullet: BulletTuning::enemy_shot(),
                half_extent: Vec2::new(0.4, 0.4),
            },
            side: SpawnSide::Top,
            min_delay_start: 2.0,
            min_delay_end: 1.0,
            max_delay_start: 5.0,
            max_delay_end: 2.0,
            frequency_start: 1.0,
            frequency_end: 1.0,
            rotation_speed: 0.0,
            look_at_player: false,
        }
    }
}

/// Recovery pickup drop table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryTuning {
    /// Probability of a drop per enemy death
    pub drop_rate: f32,
    pub heal: i32,
    /// Downward drift speed in world units/sec
    pub fall_speed: f32,
    pub collide_mask: LayerMask,
    pub half_extent: Vec2,
}

impl Default for RecoveryTuning {
    fn default() -> Self {
        Self {
            drop_rate: 0.1,
            heal: 1,
            fall_speed: 0.5,
            collide_mask: LayerMask::only(Layer::Player),
            half_extent: Vec2::new(0.25, 0.25),
        }
    }
}

/// Spawner cadence and archetype list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Seconds between spawn-condition evaluations
    pub update_interval: f32,
    /// Level time at which the difficulty ramp saturates
    pub max_difficulty_time: f32,
    pub archetypes: Vec<EnemyArchetype>,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            update_interval: 0.1,
            max_difficulty_time: 300.0,
            archetypes: vec![
                // Steady stream of darts from the top.
                EnemyArchetype::default(),
                // Raiders sweep in from the left and track the player,
                // growing more frequent as the run goes on.
                EnemyArchetype {
                    character: CharacterTuning {
                        max_health: 2,
                        movement_speed: 1.8,
                        shoot_delay: 2.0,
                        muzzle_offset: Vec2::new(0.0, 0.4),
                        bullet: BulletTuning::enemy_shot(),
                        half_extent: Vec2::new(0.45, 0.45),
                    },
                    side: SpawnSide::Left,
                    min_delay_start: 4.0,
                    min_delay_end: 2.0,
                    max_delay_start: 8.0,
                    max_delay_end: 3.0,
                    frequency_start: 0.3,
                    frequency_end: 0.8,
                    look_at_player: true,
                    ..EnemyArchetype::default()
                },
                // Heavy spinners from the right, rare early on.
                EnemyArchetype {
                    character: CharacterTuning {
                        max_health: 3,
                        movement_speed: 1.2,
                        shoot_delay: 1.5,
                        muzzle_offset: Vec2::new(0.0, 0.5),
                        bullet: BulletTuning::enemy_shot(),
                        half_extent: Vec2::new(0.55, 0.55),
                    },
                    side: SpawnSide::Right,
                    min_delay_start: 6.0,
                    min_delay_end: 2.5,
                    max_delay_start: 10.0,
                    max_delay_end: 4.0,
                    frequency_start: 0.2,
                    frequency_end: 0.6,
                    rotation_speed: 2.0,
                    ..EnemyArchetype::default()
                },
            ],
        }
    }
}

/// Root of the configuration surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield half extents in world units
    pub playfield_half_extents: Vec2,
    pub player: PlayerTuning,
    pub spawner: SpawnerTuning,
    pub recovery: RecoveryTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_half_extents: Vec2::new(8.0, 4.5),
            player: PlayerTuning::default(),
            spawner: SpawnerTuning::default(),
            recovery: RecoveryTuning::default(),
        }
    }
}

impl Tuning {
    /// Load a (possibly partial) balance document; missing fields keep
    /// their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
