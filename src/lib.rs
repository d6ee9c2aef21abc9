//! Neon Runner - A side-scrolling neon arcade runner
//!
//! Core modules:
//! - `sim`: Per-frame simulation (physics, spawning, modifiers, collisions, lifecycle)
//! - `game`: Lifecycle orchestration around the simulation (countdown, pause, shop, game over)
//! - `renderer`: WebGPU presentation adapter
//! - `platform`: Storage and frame-scheduling abstractions
//! - `persistence`: Career progress record (wallet, record, themes, stats)
//! - `theme`: Unlockable theme catalog

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod shop;
pub mod sim;
pub mod theme;

pub use game::Game;
pub use persistence::PlayerData;
pub use settings::Settings;
pub use theme::{Theme, ThemeId, WeatherKind};

/// Game configuration constants
///
/// All durations are in frames (one simulation tick per display refresh).
pub mod consts {
    /// Default playfield size, replaced by the real canvas size on resize
    pub const DEFAULT_WIDTH: f32 = 960.0;
    pub const DEFAULT_HEIGHT: f32 = 540.0;

    /// Height of the floor strip at the bottom of the screen
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Downward acceleration per frame
    pub const GRAVITY: f32 = 0.6;
    /// Upward impulse for a grounded jump
    pub const JUMP_FORCE: f32 = -11.0;
    /// Upward impulse for the mid-air jump
    pub const DOUBLE_JUMP_FORCE: f32 = -9.0;
    /// Extra downward acceleration per frame while fast-dropping
    pub const FAST_DROP_FORCE: f32 = 2.0;
    /// Grounded jump + one mid-air jump
    pub const MAX_JUMPS: u8 = 2;

    /// Player box
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 8;

    /// Dash active frames
    pub const DASH_DURATION: u32 = 15;
    /// Dash cooldown frames (starts when the dash ends)
    pub const DASH_COOLDOWN_FRAMES: f32 = 300.0;

    /// World scroll rate at run start
    pub const BASE_SPEED: f32 = 7.0;
    /// Speed gained per frame
    pub const SPEED_RAMP: f32 = 0.001;
    /// Score gained per frame
    pub const SCORE_RATE: f32 = 0.2;

    /// Hitbox forgiveness subtracted from each edge of the other box
    pub const COLLISION_INSET: f32 = 10.0;

    /// Power-up effects
    pub const WARP_FRAMES: u32 = 300;
    pub const MAGNET_FRAMES: u32 = 600;
    pub const WARP_TIME_SCALE: f32 = 0.5;
    pub const SHIELD_SCORE_BONUS: f32 = 50.0;
    pub const CURRENCY_PICKUP: u32 = 10;
    /// Magnet reach ahead of the player
    pub const MAGNET_RANGE: f32 = 400.0;
    /// Extra leftward pull on magnetised power-ups
    pub const MAGNET_PULL: f32 = 5.0;
    /// Vertical closing speed on magnetised power-ups
    pub const MAGNET_LIFT: f32 = 3.0;

    /// Camera shake
    pub const DASH_SHAKE: f32 = 5.0;
    pub const SHIELD_HIT_SHAKE: f32 = 15.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_CUTOFF: f32 = 0.5;

    /// Spawning
    pub const OBSTACLE_SPAWN_BUDGET: f32 = 1200.0;
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.015;
    pub const POWERUP_SIZE: f32 = 20.0;

    /// Entities past these x positions are removed
    pub const OBSTACLE_DESPAWN_X: f32 = -50.0;
    pub const POWERUP_DESPAWN_X: f32 = -20.0;

    /// Ambient weather particle count for non-clear themes
    pub const WEATHER_PARTICLES: usize = 60;
    /// Ground grid line spacing
    pub const GRID_SPACING: f32 = 40.0;
}

/// Floor a score for display and stats
#[inline]
pub fn floor_score(score: f32) -> u32 {
    score.max(0.0).floor() as u32
}
