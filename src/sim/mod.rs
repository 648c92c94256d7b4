//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one level generator, one cosmetic generator)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies; feedback leaves as events

pub mod collision;
pub mod effects;
pub mod enemy;
pub mod hazard;
pub mod player;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Contact;
pub use effects::{HitStop, ParticleSystem, ScreenShake};
pub use enemy::{Enemy, EnemyKind};
pub use hazard::{Camera, Water, Zone, ZONES, floor_for_height, zone_for_floor};
pub use player::Player;
pub use rect::Rect;
pub use spawn::Spawner;
pub use state::{
    GameEvent, Item, ItemKind, Platform, RunOutcome, RunState, TerminationReason,
};
pub use tick::{TickInput, autopilot, tick};
