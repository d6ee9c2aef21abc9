//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, deltas scaled by the time scale
//! - Seeded RNG only (owned by the run context)
//! - Mark-and-compact removal, one filter pass per collection per tick
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entities;
pub mod geometry;
pub mod lifecycle;
pub mod modifiers;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use collision::Resolution;
pub use entities::{Obstacle, ObstacleKind, Particle, Powerup, PowerupKind, WeatherParticle};
pub use geometry::Rect;
pub use lifecycle::{CountdownStep, Phase};
pub use modifiers::Modifiers;
pub use player::{Player, PlayerState};
pub use snapshot::{FrameSnapshot, RunSummary};
pub use state::{GameEvent, RunContext, Viewport};
pub use tick::{TickInput, tick};
