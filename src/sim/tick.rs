//! Per-frame simulation tick
//!
//! One call advances a run by exactly one display frame. Order matters and is
//! fixed: timers, scenery, player, spawning, power-ups, obstacles, particles,
//! then score and pace.

use glam::Vec2;

use super::collision::{Resolution, resolve_obstacles, resolve_powerups};
use super::entities::burst;
use super::player::{PlayerAction, StepEnv};
use super::spawner::{try_spawn_obstacle, try_spawn_powerup};
use super::state::{GameEvent, RunContext};
use crate::consts::*;
use crate::floor_score;
use crate::theme::rgb;

/// Input snapshot for a single frame (sampled once, before the tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump key held (edge-triggered inside the controller)
    pub jump: bool,
    /// Dash key held
    pub dash: bool,
    /// Fast-drop key held
    pub drop: bool,
}

/// Advance the run by one frame
pub fn tick(ctx: &mut RunContext, input: &TickInput) -> Resolution {
    if ctx.crashed {
        return Resolution::GameOver;
    }

    ctx.modifiers.advance();
    let ts = ctx.modifiers.time_scale;
    let scroll = ctx.speed * ts;
    let (width, height) = (ctx.viewport.width, ctx.viewport.height);

    // Scenery
    for layer in ctx.parallax.iter_mut() {
        layer.update(scroll, width, &mut ctx.rng);
    }
    ctx.grid_offset = (ctx.grid_offset + scroll) % GRID_SPACING;
    for speck in ctx.weather.iter_mut() {
        speck.update(ts, width, height, ctx.speed, &mut ctx.rng);
    }

    // Player
    let env = StepEnv {
        time_scale: ts,
        height,
        speed: ctx.speed,
        frame: ctx.frame,
    };
    let actions = ctx.player.update(input, env);
    apply_player_actions(ctx, &actions);

    // Spawning
    if let Some(obstacle) =
        try_spawn_obstacle(ctx.frame, ctx.speed, ctx.score, width, height, &mut ctx.rng)
    {
        ctx.obstacles.push(obstacle);
    }
    if let Some(powerup) = try_spawn_powerup(width, height, &mut ctx.rng) {
        ctx.powerups.push(powerup);
    }

    // Power-ups
    let magnet_target = ctx.modifiers.magnet_active().then_some(ctx.player.pos);
    for powerup in ctx.powerups.iter_mut() {
        powerup.update(ctx.speed, ts, magnet_target);
    }
    resolve_powerups(ctx);
    ctx.powerups.retain(|p| !p.remove);

    // Obstacles
    for obstacle in ctx.obstacles.iter_mut() {
        obstacle.update(ctx.speed, ts);
    }
    let resolution = resolve_obstacles(ctx);
    ctx.obstacles.retain(|o| !o.remove);
    if resolution == Resolution::GameOver {
        log::info!(
            "Run over at frame {}: score {}, currency {}",
            ctx.frame,
            floor_score(ctx.score),
            ctx.run_currency
        );
        return resolution;
    }

    // Particles
    for particle in ctx.particles.iter_mut() {
        particle.update(ts);
    }
    ctx.particles.retain(|p| p.alive());

    ctx.score += SCORE_RATE * ts;
    ctx.speed += SPEED_RAMP * ts;
    ctx.frame += 1;

    Resolution::Continue
}

/// Turn controller actions into events, sparks and shake
fn apply_player_actions(ctx: &mut RunContext, actions: &[PlayerAction]) {
    let accent = ctx.theme().palette.accent;
    let player = ctx.player.rect();
    let feet = Vec2::new(player.center().x, player.bottom());

    for action in actions {
        match action {
            PlayerAction::Jumped => ctx.events.push(GameEvent::Jumped),
            PlayerAction::DoubleJumped => {
                ctx.events.push(GameEvent::DoubleJumped);
                burst(&mut ctx.particles, feet, 5, accent, &mut ctx.rng);
            }
            PlayerAction::DashStarted => {
                ctx.events.push(GameEvent::DashStarted);
                ctx.modifiers.shake(DASH_SHAKE);
            }
            PlayerAction::FastDropped => {
                let head = Vec2::new(player.center().x, player.top());
                burst(&mut ctx.particles, head, 1, rgb(0xffffff), &mut ctx.rng);
            }
            PlayerAction::DashEnded => {}
        }
    }
}
