//! Nova Strike - a top-down arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, damage, collisions, spawning)
//! - `score`: Score accumulator and session-best tracking
//! - `tuning`: Data-driven game balance
//!
//! The simulation is pure and deterministic: fixed timestep, seeded RNG,
//! stable entity order, no rendering or platform dependencies. A host embeds
//! `sim`, feeds it `TickInput` at a fixed cadence, and consumes the event
//! list each tick for presentation.

pub mod score;
pub mod sim;
pub mod tuning;

pub use score::{ScoreBoard, SessionBest};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Keeps the player off the very edge of the playfield
    pub const PLAYER_EDGE_PADDING: f32 = 0.25;

    /// Passive score granted per second of level time
    pub const TIME_SCORE_RATE: f32 = 50.0;
    /// Reward for damaging an enemy
    pub const ENEMY_HIT_SCORE: i64 = 100;
    /// Reward for destroying an enemy
    pub const ENEMY_KILL_SCORE: i64 = 1000;

    /// Seconds between the player's death and the terminal game over phase
    pub const PLAYER_DEATH_DELAY: f32 = 3.0;
}

/// Unit direction vector for a heading angle
///
/// Heading 0 points "up" (+Y); positive angles turn counterclockwise.
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), heading.cos())
}

/// Heading angle whose direction vector is `dir` (inverse of [`heading_to_dir`])
#[inline]
pub fn dir_to_heading(dir: Vec2) -> f32 {
    (-dir.x).atan2(dir.y)
}

/// Rotate a local-space offset into world space for a given heading
#[inline]
pub fn rotate_offset(offset: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(heading).rotate(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_dir_roundtrip() {
        for heading in [0.0_f32, 0.5, -0.5, std::f32::consts::FRAC_PI_2, 3.0] {
            let dir = heading_to_dir(heading);
            assert!((dir.length() - 1.0).abs() < 1e-6);
            let back = dir_to_heading(dir);
            let diff = (back - heading).abs();
            assert!(diff < 1e-5 || (diff - std::f32::consts::TAU).abs() < 1e-5);
        }
    }

    #[test]
    fn test_heading_zero_is_up() {
        let dir = heading_to_dir(0.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_offset_tracks_heading() {
        // A muzzle half a unit "in front" rotates with the ship's nose.
        let offset = Vec2::new(0.0, 0.5);
        let world = rotate_offset(offset, std::f32::consts::PI);
        assert!(world.x.abs() < 1e-6);
        assert!((world.y + 0.5).abs() < 1e-6);
    }
}
