//! Health and damage model shared by the player and enemies
//!
//! Health writes clamp to `[0, max]` and notify observers only when the
//! clamped value actually changes. Death is a one-way transition guarded by
//! a dead flag, so repeated damage on a corpse is a silent no-op.
//! Invincibility rides on the flash sequence and clears exactly when the
//! sequence completes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::rotate_offset;
use crate::tuning::{BulletTuning, CharacterTuning};

/// Timed flash sequence; doubles as the invincibility window
///
/// Idle -> Flashing (-> invincible if requested) -> Idle. Restarting while
/// flashing overwrites the state with the new parameters - discarding the
/// stale deadline is the whole cancellation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FlashState {
    #[default]
    Idle,
    Flashing {
        /// Half-period toggles left (two per flash repetition)
        toggles_left: u32,
        /// Level time at which the next toggle fires
        next_toggle: f32,
        interval: f32,
        /// Sprite currently shown in the flash color
        lit: bool,
        /// Whether this sequence asserted invincibility
        grants_invincibility: bool,
    },
}

/// Outcome of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead or invincible - nothing happened
    Ignored,
    /// Health dropped but the character survived
    Damaged,
    /// Health reached zero on this call
    Died,
}

/// One projectile emitted by a successful shoot call
#[derive(Debug, Clone)]
pub struct BulletSpawn {
    pub pos: Vec2,
    pub heading: f32,
    pub bullet: BulletTuning,
}

/// Shared health/damage/shooting core of every character variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    id: u32,
    max_health: i32,
    health: i32,
    movement_speed: f32,
    invincible: bool,
    dead: bool,
    flash: FlashState,
    /// Bullet template this character fires
    bullet: BulletTuning,
    muzzle_offset: Vec2,
    shoot_delay: f32,
    /// Wall-clock time at which the next shot is allowed
    next_shot: f32,
}

impl Character {
    pub fn new(id: u32, tuning: &CharacterTuning) -> Self {
        Self {
            id,
            max_health: tuning.max_health,
            health: tuning.max_health,
            movement_speed: tuning.movement_speed,
            invincible: false,
            dead: false,
            flash: FlashState::Idle,
            bullet: tuning.bullet.clone(),
            muzzle_offset: tuning.muzzle_offset,
            shoot_delay: tuning.shoot_delay,
            next_shot: 0.0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    /// Bullet template this character fires (also used for contact damage)
    pub fn bullet(&self) -> &BulletTuning {
        &self.bullet
    }

    /// Whether the sprite should currently render in the flash color
    pub fn flash_lit(&self) -> bool {
        matches!(self.flash, FlashState::Flashing { lit: true, .. })
    }

    pub fn flash_state(&self) -> FlashState {
        self.flash
    }

    /// Clamped health write; notifies iff the stored value changed
    fn set_health(&mut self, value: i32, events: &mut Vec<GameEvent>) {
        let clamped = value.clamp(0, self.max_health);
        if clamped != self.health {
            self.health = clamped;
            events.push(GameEvent::HealthChanged {
                id: self.id,
                health: clamped,
            });
        }
    }

    /// Apply damage; a no-op on dead or invincible characters
    ///
    /// A fatal hit pushes `Died` exactly once; a survivable hit pushes
    /// `Damaged`. The caller runs the variant's reaction based on the
    /// returned outcome.
    pub fn apply_damage(&mut self, amount: i32, events: &mut Vec<GameEvent>) -> DamageOutcome {
        if self.dead || self.invincible {
            return DamageOutcome::Ignored;
        }

        self.set_health(self.health - amount, events);

        if self.health == 0 {
            self.dead = true;
            events.push(GameEvent::Died { id: self.id });
            DamageOutcome::Died
        } else {
            events.push(GameEvent::Damaged { id: self.id });
            DamageOutcome::Damaged
        }
    }

    /// Restore health, clamped at max; a no-op on the dead
    pub fn apply_healing(&mut self, amount: i32, events: &mut Vec<GameEvent>) {
        if self.dead {
            return;
        }
        self.set_health(self.health + amount, events);
    }

    /// Start (or restart) a flash sequence of `count` repetitions
    ///
    /// With `make_invincible`, damage is suppressed for the whole sequence
    /// and re-enabled exactly when it completes. Restarting replaces any
    /// active sequence with the new parameters.
    pub fn begin_flash(&mut self, count: u32, interval: f32, make_invincible: bool, now: f32) {
        self.invincible = make_invincible;
        self.flash = FlashState::Flashing {
            toggles_left: count * 2,
            next_toggle: now + interval,
            interval,
            lit: true,
            grants_invincibility: make_invincible,
        };
    }

    /// Advance the flash sequence against the level clock; call once per tick
    pub fn update_flash(&mut self, now: f32) {
        if let FlashState::Flashing {
            mut toggles_left,
            mut next_toggle,
            interval,
            mut lit,
            grants_invincibility,
        } = self.flash
        {
            while toggles_left > 0 && now >= next_toggle {
                lit = !lit;
                toggles_left -= 1;
                next_toggle += interval;
            }

            if toggles_left == 0 {
                self.flash = FlashState::Idle;
                self.invincible = false;
            } else {
                self.flash = FlashState::Flashing {
                    toggles_left,
                    next_toggle,
                    interval,
                    lit,
                    grants_invincibility,
                };
            }
        }
    }

    /// Rate-limited shot: drops the request unless `now` has reached the
    /// stored deadline, then re-arms the deadline
    ///
    /// A leaky bucket of one - excess requests are discarded, never queued.
    pub fn try_shoot(&mut self, now: f32, pos: Vec2, heading: f32) -> Option<BulletSpawn> {
        if self.dead || now < self.next_shot {
            return None;
        }
        self.next_shot = now + self.shoot_delay;
        Some(BulletSpawn {
            pos: pos + rotate_offset(self.muzzle_offset, heading),
            heading,
            bullet: self.bullet.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn character(max_health: i32) -> Character {
        let tuning = CharacterTuning {
            max_health,
            ..CharacterTuning::default()
        };
        Character::new(7, &tuning)
    }

    fn health_changes(events: &[GameEvent]) -> Vec<i32> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::HealthChanged { health, .. } => Some(*health),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_damage_sequence_kills_exactly_once() {
        let mut c = character(3);
        let mut events = Vec::new();

        assert_eq!(c.apply_damage(1, &mut events), DamageOutcome::Damaged);
        assert_eq!(c.apply_damage(1, &mut events), DamageOutcome::Damaged);
        assert_eq!(c.apply_damage(1, &mut events), DamageOutcome::Died);
        assert_eq!(health_changes(&events), vec![2, 1, 0]);

        let died = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count();
        assert_eq!(died, 1);

        // A fourth hit on the corpse is a silent no-op.
        events.clear();
        assert_eq!(c.apply_damage(1, &mut events), DamageOutcome::Ignored);
        assert!(events.is_empty());
    }

    #[test]
    fn test_health_changed_precedes_damaged() {
        let mut c = character(3);
        let mut events = Vec::new();
        c.apply_damage(1, &mut events);
        assert!(matches!(events[0], GameEvent::HealthChanged { .. }));
        assert!(matches!(events[1], GameEvent::Damaged { .. }));
    }

    #[test]
    fn test_dead_state_rejects_healing() {
        let mut c = character(2);
        let mut events = Vec::new();
        c.apply_damage(5, &mut events);
        assert!(c.is_dead());

        events.clear();
        c.apply_healing(1, &mut events);
        assert_eq!(c.health(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_heal_clamps_without_notification() {
        let mut c = character(3);
        let mut events = Vec::new();

        // Already at max: the clamp makes this a no-op, so no event.
        c.apply_healing(2, &mut events);
        assert_eq!(c.health(), 3);
        assert!(events.is_empty());

        c.apply_damage(2, &mut events);
        events.clear();
        c.apply_healing(10, &mut events);
        assert_eq!(c.health(), 3);
        assert_eq!(health_changes(&events), vec![3]);
    }

    #[test]
    fn test_invincible_damage_is_noop() {
        let mut c = character(3);
        c.begin_flash(3, 0.1, true, 0.0);
        let mut events = Vec::new();
        assert_eq!(c.apply_damage(2, &mut events), DamageOutcome::Ignored);
        assert_eq!(c.health(), 3);
        assert!(events.is_empty());
    }

    #[test]
    fn test_flash_clears_invincibility_exactly_on_completion() {
        let mut c = character(3);
        // 2 repetitions at 0.1s: sequence completes at t = 0.4.
        c.begin_flash(2, 0.1, true, 0.0);
        assert!(c.is_invincible());
        assert!(c.flash_lit());

        c.update_flash(0.39);
        assert!(c.is_invincible());
        assert!(matches!(c.flash_state(), FlashState::Flashing { .. }));

        c.update_flash(0.4);
        assert!(!c.is_invincible());
        assert_eq!(c.flash_state(), FlashState::Idle);
    }

    #[test]
    fn test_flash_restart_supersedes_parameters() {
        let mut c = character(3);
        c.begin_flash(3, 0.1, true, 0.0);
        c.update_flash(0.15);

        // Restart with a non-invincible single flash: the new request wins
        // immediately, including the invincibility flag.
        c.begin_flash(1, 0.05, false, 0.2);
        assert!(!c.is_invincible());

        c.update_flash(0.3);
        assert_eq!(c.flash_state(), FlashState::Idle);
    }

    #[test]
    fn test_shoot_rate_limit_drops_excess_requests() {
        let tuning = CharacterTuning {
            shoot_delay: 0.1,
            ..CharacterTuning::default()
        };
        let mut c = Character::new(1, &tuning);
        let pos = Vec2::ZERO;

        assert!(c.try_shoot(0.0, pos, 0.0).is_some());
        assert!(c.try_shoot(0.05, pos, 0.0).is_none());
        assert!(c.try_shoot(0.09, pos, 0.0).is_none());
        // The deadline itself is allowed.
        assert!(c.try_shoot(0.1, pos, 0.0).is_some());
    }

    #[test]
    fn test_shoot_spawns_at_muzzle() {
        let tuning = CharacterTuning {
            muzzle_offset: Vec2::new(0.0, 0.6),
            ..CharacterTuning::default()
        };
        let mut c = Character::new(1, &tuning);
        let spawn = c.try_shoot(0.0, Vec2::new(1.0, -2.0), 0.0).unwrap();
        assert!((spawn.pos - Vec2::new(1.0, -1.4)).length() < 1e-6);
        assert_eq!(spawn.heading, 0.0);
    }

    proptest! {
        /// Damage then equal healing restores health exactly, unless the
        /// hit was fatal - then the dead state is permanent.
        #[test]
        fn prop_damage_heal_roundtrip(max in 1_i32..20, amount in 0_i32..25) {
            let mut c = character(max);
            let before = c.health();
            let mut events = Vec::new();

            let outcome = c.apply_damage(amount, &mut events);
            c.apply_healing(amount, &mut events);

            if outcome == DamageOutcome::Died {
                prop_assert_eq!(c.health(), 0);
                prop_assert!(c.is_dead());
            } else {
                prop_assert_eq!(c.health(), before);
            }
        }
    }
}
