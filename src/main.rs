//! Nova Strike entry point
//!
//! Headless driver: advances the simulation through the same fixed-timestep
//! accumulator a real frontend would use, with a scripted pilot at the
//! controls. A presentation layer embeds `nova_strike::sim` the same way -
//! accumulate frame time, drain it in fixed ticks, dispatch the event list.

use glam::Vec2;
use nova_strike::consts::{MAX_SUBSTEPS, SIM_DT};
use nova_strike::score::SessionBest;
use nova_strike::sim::{EventBus, GameEvent, GamePhase, GameState, TickInput, tick};
use nova_strike::tuning::Tuning;

/// Simulated frame cadence for the headless run (50 Hz, off the sim rate
/// so the accumulator carries a remainder between frames)
const FRAME_DT: f32 = 1.0 / 50.0;
/// Longest run before the demo gives up, in frames (10 minutes)
const MAX_FRAMES: u32 = 50 * 60 * 10;

fn main() {
    env_logger::init();

    let tuning = Tuning::default();
    let seed = 0xC0FFEE;
    let mut state = GameState::new(seed, &tuning);
    let mut best = SessionBest::default();

    let mut bus = EventBus::new();
    let subscription = bus.subscribe(|event| match event {
        GameEvent::ScoreDelta { value } => log::debug!("score {value:+}"),
        GameEvent::Died { id } => log::debug!("entity {id} destroyed"),
        GameEvent::PickupSpawned { pos, .. } => {
            log::debug!("pickup dropped at ({:.1}, {:.1})", pos.x, pos.y)
        }
        _ => {}
    });

    // Scripted pilot: strafe in a lazy figure while holding the trigger.
    let mut input = TickInput {
        shoot: true,
        ..Default::default()
    };

    let mut accumulator = 0.0_f32;
    'frames: for _ in 0..MAX_FRAMES {
        // Clamp runaway frames, then drain the backlog in fixed steps; the
        // substep cap keeps a slow frame from spiraling.
        accumulator += FRAME_DT.min(0.1);
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let t = state.level_time;
            input.move_dir = Vec2::new((t * 0.7).sin(), (t * 0.3).cos() * 0.4);

            tick(&mut state, &input, SIM_DT);
            bus.dispatch(&state.events);
            accumulator -= SIM_DT;
            substeps += 1;

            if state.phase == GamePhase::GameOver {
                break 'frames;
            }
        }
    }

    let final_score = state.score.display(state.level_time);
    best.record(final_score);
    log::info!(
        "run complete after {:.1}s: score {final_score}, session best {}",
        state.level_time,
        best.get()
    );
    bus.unsubscribe(subscription);
}
