//! Player avatar and its controller state machine
//!
//! The player stays in a fixed lane and only moves vertically. Dash is a short
//! invulnerable window with no vertical motion; fast-drop is an extra downward
//! pull available only while airborne and not dashing.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::Rect;
use super::tick::TickInput;
use crate::consts::*;

/// Derived controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Grounded,
    Airborne,
    Dashing,
}

/// Something the controller did this frame, for the tick to turn into
/// particles, shake and sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Jumped,
    DoubleJumped,
    DashStarted,
    DashEnded,
    FastDropped,
}

/// Per-frame world values the controller needs
#[derive(Debug, Clone, Copy)]
pub struct StepEnv {
    pub time_scale: f32,
    /// Playfield height (ground line is `height - GROUND_HEIGHT`)
    pub height: f32,
    /// World scroll rate, used to drift trail points
    pub speed: f32,
    pub frame: u64,
}

/// Trail sample for rendering (oldest first)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
    /// White dash streak instead of the accent-colored afterimage
    pub dash: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashState {
    pub active: bool,
    /// Active frames remaining
    pub timer: u32,
    /// Cooldown frames remaining, scaled by time scale (0..=DASH_COOLDOWN_FRAMES)
    pub cooldown: f32,
}

impl DashState {
    pub fn ready(&self) -> bool {
        !self.active && self.cooldown <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    pub has_shield: bool,
    /// Jumps since last landing (0..=MAX_JUMPS)
    pub jump_count: u8,
    pub dash: DashState,
    /// Set while the jump input is held so holding does not bunny-hop
    pub jump_locked: bool,
    pub trail: VecDeque<TrailPoint>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// New player at the top of the lane; it falls onto the ground on its own
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, 0.0),
            size: Vec2::splat(PLAYER_SIZE),
            vel_y: 0.0,
            grounded: false,
            has_shield: false,
            jump_count: 0,
            dash: DashState::default(),
            jump_locked: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.dash.active {
            PlayerState::Dashing
        } else if self.grounded {
            PlayerState::Grounded
        } else {
            PlayerState::Airborne
        }
    }

    /// Fraction of the dash cooldown still to run (1.0 right after a dash, 0.0 when ready)
    pub fn dash_cooldown_fraction(&self) -> f32 {
        (self.dash.cooldown / DASH_COOLDOWN_FRAMES).clamp(0.0, 1.0)
    }

    /// Top of the player box when standing on the ground
    pub fn ground_y(&self, height: f32) -> f32 {
        height - GROUND_HEIGHT - self.size.y
    }

    /// Advance the controller one frame. Returns the actions taken, in order.
    pub fn update(&mut self, input: &TickInput, env: StepEnv) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        let ts = env.time_scale;

        // Dash takes priority; a dash started this frame also blocks fast-drop and jump
        if input.dash && self.dash.ready() {
            self.dash.active = true;
            self.dash.timer = DASH_DURATION;
            actions.push(PlayerAction::DashStarted);
        }

        if input.drop && !self.grounded && !self.dash.active {
            self.vel_y += FAST_DROP_FORCE * ts;
            actions.push(PlayerAction::FastDropped);
        }

        self.age_trail(env.speed * ts);

        let dashing = self.dash.active;
        if dashing {
            self.vel_y = 0.0;
            self.dash.timer = self.dash.timer.saturating_sub(1);
            if self.dash.timer == 0 {
                self.dash.active = false;
                self.dash.cooldown = DASH_COOLDOWN_FRAMES;
                actions.push(PlayerAction::DashEnded);
            }
            self.push_trail(TrailPoint {
                pos: self.pos,
                alpha: 0.8,
                dash: true,
            });
        } else {
            self.pos.y += self.vel_y * ts;
            let ground_y = self.ground_y(env.height);
            if self.pos.y < ground_y {
                self.vel_y += GRAVITY * ts;
                self.grounded = false;
            } else {
                self.pos.y = ground_y;
                self.vel_y = 0.0;
                self.grounded = true;
                self.jump_count = 0;
            }
        }

        if !dashing && self.dash.cooldown > 0.0 {
            self.dash.cooldown = (self.dash.cooldown - ts).max(0.0);
        }

        if input.jump {
            if !self.jump_locked && !self.dash.active {
                if self.grounded {
                    self.jump(JUMP_FORCE);
                    actions.push(PlayerAction::Jumped);
                } else if self.jump_count < MAX_JUMPS {
                    self.jump(DOUBLE_JUMP_FORCE);
                    actions.push(PlayerAction::DoubleJumped);
                }
                self.jump_locked = true;
            }
        } else {
            self.jump_locked = false;
        }

        if env.frame % 2 == 0 {
            self.push_trail(TrailPoint {
                pos: self.pos,
                alpha: 0.5,
                dash: false,
            });
        }

        actions
    }

    fn jump(&mut self, force: f32) {
        self.vel_y = force;
        self.grounded = false;
        self.jump_count += 1;
    }

    fn push_trail(&mut self, point: TrailPoint) {
        self.trail.push_back(point);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Trail points drift with the world and fade out
    fn age_trail(&mut self, scroll: f32) {
        for point in self.trail.iter_mut() {
            point.pos.x -= scroll;
            point.alpha = (point.alpha - 0.05).max(0.0);
        }
    }
}
