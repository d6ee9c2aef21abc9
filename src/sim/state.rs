//! Run state and the owned simulation context
//!
//! Everything one run mutates lives in `RunContext`. It is rebuilt from
//! scratch at run start and passed explicitly to every update function.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Obstacle, ParallaxLayer, Particle, Powerup, PowerupKind, WeatherParticle};
use super::modifiers::Modifiers;
use super::player::Player;
use crate::consts::*;
use crate::theme::{Theme, ThemeId, WeatherKind};

/// Notable things that happened during a tick, drained by the host afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    DashStarted,
    PowerupCollected(PowerupKind),
    /// Shield soaked an obstacle hit
    ShieldAbsorbed,
    /// Unshielded hit; the run is over
    Crashed,
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

/// Complete state for one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub viewport: Viewport,
    pub theme: ThemeId,

    /// Distance score, never decreases while playing
    pub score: f32,
    /// Currency picked up this run (merged into the wallet at game over)
    pub run_currency: u32,
    /// World scroll rate, grows every frame
    pub speed: f32,
    /// Frames simulated this run
    pub frame: u64,
    pub modifiers: Modifiers,
    /// Set by an unshielded collision; no further ticks run
    pub crashed: bool,

    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    pub weather: Vec<WeatherParticle>,
    pub parallax: Vec<ParallaxLayer>,
    /// Ground grid scroll phase (0..GRID_SPACING)
    pub grid_offset: f32,

    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl RunContext {
    pub fn new(seed: u64, theme: ThemeId, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let parallax = ParallaxLayer::default_set(viewport.width, &mut rng);
        let mut ctx = Self {
            seed,
            rng,
            viewport,
            theme,
            score: 0.0,
            run_currency: 0,
            speed: BASE_SPEED,
            frame: 0,
            modifiers: Modifiers::default(),
            crashed: false,
            player: Player::new(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            weather: Vec::new(),
            parallax,
            grid_offset: 0.0,
            events: Vec::new(),
        };
        ctx.seed_weather();
        ctx
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme.theme()
    }

    /// Switch theme; restarts the weather stream for the new kind
    pub fn set_theme(&mut self, theme: ThemeId) {
        self.theme = theme;
        self.seed_weather();
    }

    /// Canvas resized; scenery is regenerated for the new width
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.parallax = ParallaxLayer::default_set(viewport.width, &mut self.rng);
    }

    fn seed_weather(&mut self) {
        let kind = self.theme().weather;
        self.weather.clear();
        if kind == WeatherKind::Clear {
            return;
        }
        let Viewport { width, height } = self.viewport;
        for _ in 0..WEATHER_PARTICLES {
            let p = WeatherParticle::new(kind, width, height, self.speed, &mut self.rng);
            self.weather.push(p);
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
