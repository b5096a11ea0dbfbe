//! Simulation event notifications
//!
//! The tick appends events to the frame's event list in the order they
//! happen; the host dispatches that list through an [`EventBus`] after each
//! tick. Subscribers register and unregister explicitly - unsubscribing on
//! teardown is mandatory, there is no implicit cleanup to fall back on.

use glam::Vec2;

use super::state::PickupKind;

/// A notification produced by the simulation core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A character's health value actually changed (damage or healing)
    HealthChanged { id: u32, health: i32 },
    /// A character took a non-fatal hit
    Damaged { id: u32 },
    /// A character died this tick
    Died { id: u32 },
    /// Points were added to (or deducted from) the score
    ScoreDelta { value: i64 },
    /// A pickup dropped into the playfield
    PickupSpawned { kind: PickupKind, pos: Vec2 },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

/// Explicit observer list for simulation events
///
/// Owned by the host, not the simulation: the tick fills
/// `GameState::events`, the host calls [`EventBus::dispatch`] with it.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Box<dyn FnMut(&GameEvent)>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; keep the returned id to unsubscribe later
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber; returns false if the id was already gone
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Deliver a tick's event list to every subscriber, in order
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            for (_, callback) in &mut self.subscribers {
                callback(event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
