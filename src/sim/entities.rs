//! Track entities: obstacles, power-ups, particles, weather and parallax scenery
//!
//! Removal is mark-and-compact: updates set `remove`, the tick filters each
//! collection once at the end of the frame.

use glam::Vec2;
use rand::Rng;

use super::geometry::Rect;
use crate::consts::*;
use crate::theme::{Color, WeatherKind, rgb, rgba};

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Grounded box of random size
    Block,
    /// Small flyer at head height
    Drone,
    /// Ground-level wheel
    Roller,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Visual spin (radians)
    pub rotation: f32,
    pub remove: bool,
}

impl Obstacle {
    /// Create an obstacle just past the right edge of a `width` x `height` field
    pub fn spawn(kind: ObstacleKind, width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let ground = height - GROUND_HEIGHT;
        let x = width + 100.0;
        let rect = match kind {
            ObstacleKind::Block => {
                let w = 30.0 + rng.random::<f32>() * 20.0;
                let h = 40.0 + rng.random::<f32>() * 30.0;
                Rect::new(x, ground - h, w, h)
            }
            ObstacleKind::Drone => Rect::new(x, ground - 110.0, 40.0, 20.0),
            ObstacleKind::Roller => Rect::new(x, ground - 30.0, 30.0, 30.0),
        };
        Self {
            kind,
            rect,
            rotation: 0.0,
            remove: false,
        }
    }

    /// Scroll left and spin; marks itself for removal once off-screen
    pub fn update(&mut self, speed: f32, time_scale: f32) {
        self.rect.pos.x -= speed * time_scale;
        match self.kind {
            ObstacleKind::Drone => self.rotation += 0.2 * time_scale,
            ObstacleKind::Roller => self.rotation -= 0.1 * time_scale,
            ObstacleKind::Block => {}
        }
        if self.rect.right() < OBSTACLE_DESPAWN_X {
            self.remove = true;
        }
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Currency,
    Shield,
    Warp,
    Magnet,
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub rect: Rect,
    pub remove: bool,
}

impl Powerup {
    /// Create a power-up at the right edge, floating above the ground
    pub fn spawn(kind: PowerupKind, width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let y = height - 150.0 - rng.random::<f32>() * 100.0;
        Self {
            kind,
            rect: Rect::new(width, y, POWERUP_SIZE, POWERUP_SIZE),
            remove: false,
        }
    }

    /// Whether a magnet held by a player at `player_x` reaches this power-up
    pub fn in_magnet_window(&self, player_x: f32) -> bool {
        self.rect.pos.x < player_x + MAGNET_RANGE && self.rect.pos.x > player_x
    }

    /// Scroll left, or get pulled toward `magnet_target` when one is given
    pub fn update(&mut self, speed: f32, time_scale: f32, magnet_target: Option<Vec2>) {
        match magnet_target {
            Some(target) if self.in_magnet_window(target.x) => {
                self.rect.pos.x -= speed * time_scale + MAGNET_PULL;
                if self.rect.pos.y > target.y {
                    self.rect.pos.y -= MAGNET_LIFT;
                } else if self.rect.pos.y < target.y {
                    self.rect.pos.y += MAGNET_LIFT;
                }
            }
            _ => self.rect.pos.x -= speed * time_scale,
        }
    }

    pub fn off_screen(&self) -> bool {
        self.rect.pos.x < POWERUP_DESPAWN_X
    }
}

/// Short-lived spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 1.0 at birth, removed at or below zero
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, color: Color, spread: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            ),
            color,
            life: 1.0,
            size: rng.random::<f32>() * 3.0 + 1.0,
        }
    }

    pub fn update(&mut self, time_scale: f32) {
        self.pos += self.vel * time_scale;
        self.life -= 0.03 * time_scale;
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Spark spread used for every burst
pub const BURST_SPREAD: f32 = 8.0;

/// Append `count` particles at `pos`
pub fn burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    count: usize,
    color: Color,
    rng: &mut impl Rng,
) {
    particles.extend((0..count).map(|_| Particle::new(pos, color, BURST_SPREAD, rng)));
}

/// Ambient weather speck; recycles instead of dying
#[derive(Debug, Clone)]
pub struct WeatherParticle {
    pub kind: WeatherKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    /// Katakana glyph for matrix rain
    pub glyph: Option<char>,
}

impl WeatherParticle {
    /// New particle scattered anywhere on screen so the stream starts full
    pub fn new(kind: WeatherKind, width: f32, height: f32, speed: f32, rng: &mut impl Rng) -> Self {
        let mut p = Self {
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 1.0,
            color: rgb(0xffffff),
            glyph: None,
        };
        p.reset(width, height, speed, rng);
        p.pos = Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height);
        p
    }

    /// Respawn at the entry edge for this kind
    pub fn reset(&mut self, width: f32, height: f32, speed: f32, rng: &mut impl Rng) {
        self.size = rng.random::<f32>() * 2.0 + 1.0;
        self.glyph = None;
        match self.kind {
            WeatherKind::Embers => {
                self.pos = Vec2::new(rng.random::<f32>() * width, height + 10.0);
                self.vel = Vec2::new(-2.0 - rng.random::<f32>(), -1.0 - rng.random::<f32>());
                self.color = rgba(0xff6400, rng.random::<f32>());
            }
            WeatherKind::Matrix => {
                self.pos = Vec2::new(rng.random::<f32>() * width, -10.0);
                self.vel = Vec2::new(0.0, 15.0);
                self.color = rgb(0x00ff00);
                let offset = (rng.random::<f32>() * 96.0) as u32;
                self.glyph = char::from_u32(0x30A0 + offset);
            }
            WeatherKind::Rain | WeatherKind::Clear => {
                self.pos = Vec2::new(rng.random::<f32>() * width + width, -10.0);
                self.vel = Vec2::new(
                    -speed - rng.random::<f32>() * 5.0,
                    10.0 + rng.random::<f32>() * 5.0,
                );
                self.color = rgba(0xc8c8ff, rng.random::<f32>() * 0.5);
            }
        }
    }

    pub fn update(
        &mut self,
        time_scale: f32,
        width: f32,
        height: f32,
        speed: f32,
        rng: &mut impl Rng,
    ) {
        self.pos += self.vel * time_scale;
        let exited = match self.kind {
            WeatherKind::Embers => self.pos.y < 0.0,
            _ => self.pos.y > height,
        };
        if exited {
            self.reset(width, height, speed, rng);
        }
    }
}

/// One skyline silhouette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxElement {
    pub x: f32,
    pub w: f32,
    pub h: f32,
}

/// A band of skyline scrolling at a fraction of the world speed
#[derive(Debug, Clone)]
pub struct ParallaxLayer {
    pub factor: f32,
    pub color: Color,
    pub elements: Vec<ParallaxElement>,
}

impl ParallaxLayer {
    pub fn new(
        factor: f32,
        heights: (f32, f32),
        count: usize,
        color: Color,
        width: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let elements = (0..count)
            .map(|_| ParallaxElement {
                x: rng.random::<f32>() * width,
                w: 20.0 + rng.random::<f32>() * 50.0,
                h: heights.0 + rng.random::<f32>() * (heights.1 - heights.0),
            })
            .collect();
        Self {
            factor,
            color,
            elements,
        }
    }

    /// Far, mid and near skylines
    pub fn default_set(width: f32, rng: &mut impl Rng) -> Vec<Self> {
        vec![
            Self::new(0.1, (50.0, 100.0), 10, rgb(0x000000), width, rng),
            Self::new(0.2, (80.0, 150.0), 8, rgb(0x111111), width, rng),
            Self::new(0.5, (30.0, 60.0), 5, rgb(0x222222), width, rng),
        ]
    }

    /// `scroll` is the world scroll for this frame (speed * time scale)
    pub fn update(&mut self, scroll: f32, width: f32, rng: &mut impl Rng) {
        for el in &mut self.elements {
            el.x -= scroll * self.factor;
            if el.x + el.w < 0.0 {
                el.x = width + rng.random::<f32>() * 100.0;
            }
        }
    }
}
