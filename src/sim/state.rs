//! Game state and simulation entities
//!
//! Everything needed to reproduce a run deterministically lives here: the
//! seeded RNG, both clocks, every entity, and the spawner schedule.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Playfield;
use super::character::{BulletSpawn, Character};
use super::collision::LayerMask;
use super::events::GameEvent;
use super::spawner::{SpawnRequest, Spawner};
use crate::consts::ENEMY_HIT_SCORE;
use crate::score::ScoreBoard;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player destroyed; the explosion plays out before the terminal phase
    PlayerDown { remaining: f32 },
    /// Run ended - the simulation halts until an external restart request
    GameOver,
}

/// Effect a pickup applies when collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health
    Recovery { heal: i32 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub character: Character,
    pub pos: Vec2,
    /// Fixed nose-up heading; bullets inherit it
    pub heading: f32,
    /// Normalized input direction applied this tick
    pub move_dir: Vec2,
    pub half_extent: Vec2,
}

impl PlayerShip {
    /// Damage reaction: brief invincibility flash
    pub fn on_damaged(&mut self, now: f32) {
        self.character.begin_flash(3, 0.1, true, now);
    }

    /// Death reaction: stop moving and let the explosion sequence run
    pub fn on_death(&mut self) {
        self.move_dir = Vec2::ZERO;
    }
}

/// A spawned enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub character: Character,
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    /// Continuous spin when nonzero (and not tracking the player)
    pub rotation_speed: f32,
    /// Face the player every frame instead of spinning
    pub look_at_player: bool,
    pub half_extent: Vec2,
}

impl Enemy {
    /// Damage reaction: hit reward plus a single non-invincible flash
    pub fn on_damaged(&mut self, now: f32, score: &mut ScoreBoard, events: &mut Vec<GameEvent>) {
        score.add(ENEMY_HIT_SCORE);
        events.push(GameEvent::ScoreDelta {
            value: ENEMY_HIT_SCORE,
        });
        self.character.begin_flash(1, 0.1, false, now);
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub damage: i32,
    pub collide_mask: LayerMask,
    pub half_extent: Vec2,
}

impl Bullet {
    /// Velocity along the heading
    pub fn vel(&self) -> Vec2 {
        crate::heading_to_dir(self.heading) * self.speed
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub collide_mask: LayerMask,
    pub half_extent: Vec2,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Seconds since level start; resets on restart
    pub level_time: f32,
    /// Monotonic wall clock for shot cooldowns; survives restarts
    pub now: f32,
    pub phase: GamePhase,
    /// Playfield rectangle, computed once at level start
    pub field: Playfield,
    pub player: PlayerShip,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub spawner: Spawner,
    pub score: ScoreBoard,
    /// Immutable balance data the run was started with
    pub tuning: Tuning,
    /// Events produced by the most recent tick, in order
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed and balance data
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level_time: 0.0,
            now: 0.0,
            phase: GamePhase::Playing,
            field: Playfield::new(tuning.playfield_half_extents),
            player: PlayerShip {
                character: Character::new(0, &tuning.player.character),
                pos: tuning.player.start_pos,
                heading: 0.0,
                move_dir: Vec2::ZERO,
                half_extent: tuning.player.character.half_extent,
            },
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            spawner: Spawner::new(&tuning.spawner),
            score: ScoreBoard::new(),
            tuning: tuning.clone(),
            events: Vec::new(),
            // The player owns id 0; everything else allocates from here.
            next_id: 1,
        };
        log::info!("new run, seed {seed}");
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Instantiate an enemy from a spawner request
    pub fn spawn_enemy(&mut self, req: &SpawnRequest) {
        let arch = self.tuning.spawner.archetypes[req.archetype].clone();
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            character: Character::new(id, &arch.character),
            pos: req.pos,
            vel: req.vel,
            heading: req.heading,
            rotation_speed: arch.rotation_speed,
            look_at_player: arch.look_at_player,
            half_extent: arch.character.half_extent,
        });
        log::debug!("enemy {id} enters at ({:.1}, {:.1})", req.pos.x, req.pos.y);
    }

    /// Instantiate a bullet from a shoot request
    pub fn spawn_bullet(&mut self, spawn: BulletSpawn) {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: spawn.pos,
            heading: spawn.heading,
            speed: spawn.bullet.speed,
            damage: spawn.bullet.damage,
            collide_mask: spawn.bullet.collide_mask,
            half_extent: spawn.bullet.half_extent,
        });
    }

    /// Rebuild the level for a new run
    ///
    /// The wall clock and the RNG stream carry over; level time, score and
    /// every entity reset.
    pub fn restart(&mut self) {
        let mut fresh = GameState::new(self.seed, &self.tuning);
        fresh.rng = self.rng.clone();
        fresh.now = self.now;
        *self = fresh;
        log::info!("level restarted");
    }
}
