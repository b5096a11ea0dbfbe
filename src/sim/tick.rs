//! Fixed timestep simulation tick
//!
//! One tick runs the update pass (movement, shooting, spawn evaluation),
//! resolves collisions, then runs the late pass (bounds clamping, death
//! handling, off-bounds culling, phase transitions). Everything is driven
//! by deadlines on the two clocks; nothing blocks.

use glam::Vec2;
use rand::Rng;

use super::bounds::bounding_radius;
use super::character::{BulletSpawn, DamageOutcome};
use super::collision::{BulletFate, Layer, circles_overlap, resolve_bullet_hit, resolve_pickup};
use super::events::GameEvent;
use super::state::{GamePhase, GameState, Pickup, PickupKind};
use crate::consts::{ENEMY_KILL_SCORE, PLAYER_DEATH_DELAY, PLAYER_EDGE_PADDING};
use crate::{dir_to_heading, heading_to_dir};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Raw directional input; normalized before use
    pub move_dir: Vec2,
    /// Fire button held
    pub shoot: bool,
    /// External restart request, honored only at game over
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Terminal phase: nothing simulates until the host restarts the level.
    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.restart();
        }
        return;
    }

    state.level_time += dt;
    state.now += dt;
    let level_time = state.level_time;
    let now = state.now;

    let mut shots: Vec<BulletSpawn> = Vec::new();

    // --- update pass ---

    // Player input, movement and shooting; all input dies with the player.
    if state.phase == GamePhase::Playing && !state.player.character.is_dead() {
        let dir = input.move_dir.normalize_or_zero();
        state.player.move_dir = dir;
        state.player.pos += dir * state.player.character.movement_speed() * dt;

        if input.shoot
            && let Some(spawn) =
                state
                    .player
                    .character
                    .try_shoot(now, state.player.pos, state.player.heading)
        {
            shots.push(spawn);
        }
    }
    state.player.character.update_flash(level_time);

    // Enemies: drift, aim, and fire on their own cooldowns.
    let player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.pos += enemy.vel * dt;

        if enemy.look_at_player {
            let to_player = player_pos - enemy.pos;
            if to_player.length_squared() > 1e-6 {
                enemy.heading = dir_to_heading(to_player.normalize());
            }
        } else {
            enemy.heading += enemy.rotation_speed * dt;
        }

        enemy.character.update_flash(level_time);
        if let Some(spawn) = enemy.character.try_shoot(now, enemy.pos, enemy.heading) {
            shots.push(spawn);
        }
    }
    for spawn in shots {
        state.spawn_bullet(spawn);
    }

    // Projectiles and pickups coast along their velocities.
    for bullet in &mut state.bullets {
        bullet.pos += heading_to_dir(bullet.heading) * bullet.speed * dt;
    }
    for pickup in &mut state.pickups {
        pickup.pos += pickup.vel * dt;
    }

    // Spawn evaluation on its own cadence.
    let mut spawns = Vec::new();
    state.spawner.update(
        level_time,
        &state.tuning.spawner.archetypes,
        &state.field,
        &mut state.rng,
        &mut spawns,
    );
    for req in &spawns {
        state.spawn_enemy(req);
    }

    // --- collisions, between the update and late passes ---
    resolve_collisions(state, level_time);

    // --- late pass ---

    // Keep the player on the field, slightly inset from the edge.
    state.player.pos = state.field.clamp_inside(
        state.player.pos,
        state.player.half_extent,
        PLAYER_EDGE_PADDING,
    );

    resolve_enemy_deaths(state);

    // Off-bounds culling once an entity has fully and irrevocably left.
    let field = state.field;
    state
        .bullets
        .retain(|b| !field.should_cull(b.pos, b.vel(), b.half_extent));
    state
        .enemies
        .retain(|e| !field.should_cull(e.pos, e.vel, e.half_extent));
    state
        .pickups
        .retain(|p| !field.should_cull(p.pos, p.vel, p.half_extent));

    // Player death starts the explosion countdown; its end is game over.
    if state.phase == GamePhase::Playing && state.player.character.is_dead() {
        state.player.on_death();
        state.phase = GamePhase::PlayerDown {
            remaining: PLAYER_DEATH_DELAY,
        };
        log::info!("player down");
    } else if let GamePhase::PlayerDown { remaining } = &mut state.phase {
        *remaining -= dt;
        if *remaining <= 0.0 {
            state.phase = GamePhase::GameOver;
            log::info!(
                "game over, score {}",
                state.score.display(state.level_time)
            );
        }
    }
}

/// Pairwise, mask-filtered interaction resolution
fn resolve_collisions(state: &mut GameState, level_time: f32) {
    let player_radius = bounding_radius(state.player.half_extent);

    // Bullets against characters. A consumed bullet is removed on the spot
    // so it cannot strike a second target in the same tick.
    let mut i = 0;
    while i < state.bullets.len() {
        let (b_pos, b_radius, mask, damage) = {
            let b = &state.bullets[i];
            (b.pos, bounding_radius(b.half_extent), b.collide_mask, b.damage)
        };
        let mut consumed = false;

        if !state.player.character.is_dead()
            && circles_overlap(b_pos, b_radius, state.player.pos, player_radius)
            && let Some((outcome, fate)) = resolve_bullet_hit(
                mask,
                damage,
                Layer::Player,
                &mut state.player.character,
                &mut state.events,
            )
        {
            if outcome == DamageOutcome::Damaged {
                state.player.on_damaged(level_time);
            }
            consumed = fate == BulletFate::Consumed;
        }

        if !consumed {
            for j in 0..state.enemies.len() {
                if state.enemies[j].character.is_dead() {
                    continue;
                }
                if !circles_overlap(
                    b_pos,
                    b_radius,
                    state.enemies[j].pos,
                    bounding_radius(state.enemies[j].half_extent),
                ) {
                    continue;
                }
                let Some((outcome, fate)) = resolve_bullet_hit(
                    mask,
                    damage,
                    Layer::Enemy,
                    &mut state.enemies[j].character,
                    &mut state.events,
                ) else {
                    continue;
                };
                if outcome == DamageOutcome::Damaged {
                    state.enemies[j].on_damaged(level_time, &mut state.score, &mut state.events);
                }
                if fate == BulletFate::Consumed {
                    consumed = true;
                    break;
                }
            }
        }

        if consumed {
            state.bullets.remove(i);
        } else {
            i += 1;
        }
    }

    // Pickups against the player: any matching contact consumes them.
    let mut k = 0;
    while k < state.pickups.len() {
        let (p_pos, p_radius, kind, mask) = {
            let p = &state.pickups[k];
            (p.pos, bounding_radius(p.half_extent), p.kind, p.collide_mask)
        };
        let touching = !state.player.character.is_dead()
            && circles_overlap(p_pos, p_radius, state.player.pos, player_radius);
        if touching
            && resolve_pickup(
                kind,
                mask,
                Layer::Player,
                &mut state.player.character,
                &mut state.events,
            )
        {
            state.pickups.remove(k);
        } else {
            k += 1;
        }
    }

    // Enemy hulls ram the player with their bullet template's damage/mask;
    // the hull itself survives the contact.
    if !state.player.character.is_dead() {
        for j in 0..state.enemies.len() {
            if state.enemies[j].character.is_dead() {
                continue;
            }
            if !circles_overlap(
                state.enemies[j].pos,
                bounding_radius(state.enemies[j].half_extent),
                state.player.pos,
                player_radius,
            ) {
                continue;
            }
            let (mask, damage) = {
                let b = state.enemies[j].character.bullet();
                (b.collide_mask, b.damage)
            };
            if let Some((outcome, _)) = resolve_bullet_hit(
                mask,
                damage,
                Layer::Player,
                &mut state.player.character,
                &mut state.events,
            ) {
                if outcome == DamageOutcome::Damaged {
                    state.player.on_damaged(level_time);
                }
                if state.player.character.is_dead() {
                    break;
                }
            }
        }
    }
}

/// Kill rewards, probabilistic drops, and corpse removal
fn resolve_enemy_deaths(state: &mut GameState) {
    let mut k = 0;
    while k < state.enemies.len() {
        if !state.enemies[k].character.is_dead() {
            k += 1;
            continue;
        }

        let pos = state.enemies[k].pos;
        let item = state.tuning.recovery.clone();
        if state.rng.random::<f32>() <= item.drop_rate {
            let kind = PickupKind::Recovery { heal: item.heal };
            let id = state.next_entity_id();
            state.pickups.push(Pickup {
                id,
                kind,
                pos,
                vel: Vec2::new(0.0, -item.fall_speed),
                collide_mask: item.collide_mask,
                half_extent: item.half_extent,
            });
            state.events.push(GameEvent::PickupSpawned { kind, pos });
            log::debug!("recovery drop at ({:.1}, {:.1})", pos.x, pos.y);
        }

        state.score.add(ENEMY_KILL_SCORE);
        state.events.push(GameEvent::ScoreDelta {
            value: ENEMY_KILL_SCORE,
        });
        state.enemies.remove(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::character::Character;
    use crate::sim::collision::LayerMask;
    use crate::sim::state::{Bullet, Enemy};
    use crate::tuning::Tuning;

    fn state_with(tuning: &Tuning) -> GameState {
        GameState::new(12345, tuning)
    }

    /// Default balance with every archetype silenced, for crafted scenes
    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        for arch in &mut tuning.spawner.archetypes {
            arch.frequency_start = 0.0;
            arch.frequency_end = 0.0;
        }
        tuning
    }

    fn place_enemy(state: &mut GameState, pos: Vec2, max_health: i32) {
        let mut arch = state.tuning.spawner.archetypes[0].clone();
        arch.character.max_health = max_health;
        // Long cooldown so the planted enemy never shoots mid-test.
        arch.character.shoot_delay = 1e6;
        let id = state.next_entity_id();
        let mut character = Character::new(id, &arch.character);
        let _ = character.try_shoot(0.0, pos, 0.0); // burn the ready shot
        state.enemies.push(Enemy {
            character,
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            rotation_speed: 0.0,
            look_at_player: false,
            half_extent: arch.character.half_extent,
        });
    }

    fn place_bullet(state: &mut GameState, pos: Vec2, mask: LayerMask, damage: i32) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            heading: 0.0,
            speed: 0.0,
            damage,
            collide_mask: mask,
            half_extent: Vec2::splat(0.1),
        });
    }

    #[test]
    fn test_game_over_halts_simulation() {
        let tuning = Tuning::default();
        let mut state = state_with(&tuning);
        state.phase = GamePhase::GameOver;

        let before_time = state.level_time;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.level_time, before_time);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_request_leaves_game_over() {
        let tuning = Tuning::default();
        let mut state = state_with(&tuning);
        state.phase = GamePhase::GameOver;
        state.score.add(500);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score.earned(), 0);
    }

    #[test]
    fn test_bullet_kills_enemy_and_scores() {
        let mut tuning = quiet_tuning();
        tuning.recovery.drop_rate = 1.0;
        let mut state = state_with(&tuning);

        let spot = Vec2::new(3.0, 1.0);
        place_enemy(&mut state, spot, 1);
        place_bullet(&mut state, spot, LayerMask::only(Layer::Enemy), 1);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        // One-hit kill: the kill reward lands, the hit reward does not.
        assert_eq!(state.score.earned(), ENEMY_KILL_SCORE);
        // Guaranteed drop at the kill site.
        assert_eq!(state.pickups.len(), 1);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PickupSpawned { .. }))
        );
    }

    #[test]
    fn test_surviving_enemy_grants_hit_reward() {
        let mut state = state_with(&quiet_tuning());

        let spot = Vec2::new(3.0, 1.0);
        place_enemy(&mut state, spot, 3);
        place_bullet(&mut state, spot, LayerMask::only(Layer::Enemy), 1);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].character.health(), 2);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score.earned(), crate::consts::ENEMY_HIT_SCORE);
    }

    #[test]
    fn test_bullet_passes_through_flashing_player() {
        let mut state = state_with(&quiet_tuning());
        state.player.character.begin_flash(3, 0.1, true, 0.0);
        let health = state.player.character.health();

        let player_pos = state.player.pos;
        place_bullet(
            &mut state,
            player_pos,
            LayerMask::only(Layer::Player),
            1,
        );
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.character.health(), health);
        // The bullet was not consumed by the invincible target.
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_pickup_heals_player_and_is_consumed() {
        let mut state = state_with(&quiet_tuning());
        let mut events = Vec::new();
        state.player.character.apply_damage(1, &mut events);
        state.player.on_damaged(0.0);
        // Wait out the post-hit invincibility window.
        state.player.character.update_flash(1.0);

        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind: PickupKind::Recovery { heal: 1 },
            pos: state.player.pos,
            vel: Vec2::new(0.0, -0.5),
            collide_mask: LayerMask::only(Layer::Player),
            half_extent: Vec2::splat(0.25),
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.pickups.is_empty());
        assert_eq!(
            state.player.character.health(),
            state.player.character.max_health()
        );
    }

    #[test]
    fn test_enemy_contact_damages_player_once_per_window() {
        let mut state = state_with(&quiet_tuning());
        let player_pos = state.player.pos;
        place_enemy(&mut state, player_pos, 3);

        tick(&mut state, &TickInput::default(), SIM_DT);
        let after_ram = state.player.character.health();
        assert_eq!(after_ram, state.player.character.max_health() - 1);
        // The ram triggered the invincibility flash; staying in contact
        // does not drain further health while the window lasts.
        assert!(state.player.character.is_invincible());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.character.health(), after_ram);
        // The hull survives the contact.
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_player_death_reaches_game_over_after_delay() {
        let mut tuning = Tuning::default();
        tuning.player.character.max_health = 1;
        let mut state = state_with(&tuning);

        let player_pos = state.player.pos;
        place_bullet(
            &mut state,
            player_pos,
            LayerMask::only(Layer::Player),
            1,
        );
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(state.phase, GamePhase::PlayerDown { .. }));
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::Died { .. })));

        // The countdown runs its course; the terminal phase then holds.
        for _ in 0..(PLAYER_DEATH_DELAY / SIM_DT) as u32 + 2 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen = state.level_time;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.level_time, frozen);
    }

    #[test]
    fn test_spawned_enemies_enter_inbound_and_survive_culling() {
        let tuning = Tuning::default();
        let mut state = state_with(&tuning);

        // Default top archetype spawns at full frequency on the first
        // evaluation; the fresh enemy sits off-screen but inbound.
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.enemies.is_empty());

        let enemy = &state.enemies[0];
        assert!(enemy.pos.y > state.field.half_extents.y);
        assert!(enemy.vel.y < 0.0);
    }

    #[test]
    fn test_player_stays_clamped_to_field() {
        let tuning = Tuning::default();
        let mut state = state_with(&tuning);
        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state, &input, SIM_DT);
        }
        let limit = state.field.half_extents.x
            - state.player.half_extent.x
            - crate::consts::PLAYER_EDGE_PADDING;
        assert!(state.player.pos.x <= limit + 1e-4);
    }

    #[test]
    fn test_score_accrues_time_bonus() {
        let tuning = Tuning::default();
        let mut state = state_with(&tuning);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        // Two seconds of survival are worth at least 100 points.
        assert!(state.score.display(state.level_time) >= 100);
    }

    #[test]
    fn test_determinism_across_identical_runs() {
        let tuning = Tuning::default();
        let mut a = state_with(&tuning);
        let mut b = state_with(&tuning);

        let input = TickInput {
            move_dir: Vec2::new(0.3, -0.1),
            shoot: true,
            restart: false,
        };
        for _ in 0..600 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.bullets.len(), b.bullets.len());
        assert_eq!(a.score.earned(), b.score.earned());
        assert_eq!(a.level_time, b.level_time);
    }
}
