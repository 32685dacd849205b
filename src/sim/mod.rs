//! Simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep, explicit Euler integration
//! - Seeded RNG only
//! - Stable iteration order (platforms in generation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod generator;
pub mod platform;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Landing, Sweep, find_landing};
pub use generator::{LevelGenerator, placement_window};
pub use platform::{DestructiblePhase, Platform, PlatformBehavior, PlatformId, PlatformKind};
pub use player::{Controls, Player, PlayerStep};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
