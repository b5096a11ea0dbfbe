//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by spawn order / entity ID)
//! - No rendering or platform dependencies
//!
//! Each tick runs two ordered sub-phases: the update pass (movement, shooting,
//! spawn evaluation, collision resolution) and the late pass (bounds clamping,
//! off-bounds culling, death transitions).

pub mod bounds;
pub mod character;
pub mod collision;
pub mod events;
pub mod spawner;
pub mod state;
pub mod tick;

pub use bounds::Playfield;
pub use character::{BulletSpawn, Character, DamageOutcome, FlashState};
pub use collision::{BulletFate, Layer, LayerMask, circles_overlap};
pub use events::{EventBus, GameEvent, SubscriberId};
pub use spawner::{SpawnRequest, SpawnSide, Spawner, lerp_down};
pub use state::{Bullet, Enemy, GamePhase, GameState, Pickup, PickupKind, PlayerShip};
pub use tick::{TickInput, tick};
