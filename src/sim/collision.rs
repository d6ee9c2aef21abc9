//! Collision detection and outcome rules
//!
//! Hits use the forgiving inset test. Power-ups are resolved before their
//! off-screen check, so a pickup on the frame it leaves the screen still counts.

use super::entities::{PowerupKind, burst};
use super::geometry::Rect;
use super::player::Player;
use super::state::{GameEvent, RunContext};
use crate::consts::*;

/// Whether the run survives this frame's obstacle checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    GameOver,
}

/// Player box against another box with the hitbox inset applied to `other`
pub fn player_hits(player: &Player, other: &Rect) -> bool {
    player.rect().intersects_inset(other, COLLISION_INSET)
}

/// Apply a collected power-up's effect
pub fn apply_powerup(ctx: &mut RunContext, kind: PowerupKind) {
    match kind {
        PowerupKind::Shield => {
            ctx.player.has_shield = true;
            ctx.score += SHIELD_SCORE_BONUS;
        }
        PowerupKind::Warp => ctx.modifiers.activate_warp(),
        PowerupKind::Magnet => ctx.modifiers.activate_magnet(),
        PowerupKind::Currency => ctx.run_currency += CURRENCY_PICKUP,
    }
    ctx.events.push(GameEvent::PowerupCollected(kind));
}

/// Collect touched power-ups, then retire the ones that scrolled away
pub fn resolve_powerups(ctx: &mut RunContext) {
    let mut collected = Vec::new();
    for powerup in ctx.powerups.iter_mut().filter(|p| !p.remove) {
        if player_hits(&ctx.player, &powerup.rect) {
            powerup.remove = true;
            collected.push(powerup.kind);
        } else if powerup.off_screen() {
            powerup.remove = true;
        }
    }
    for kind in collected {
        apply_powerup(ctx, kind);
    }
}

/// Check obstacles against the player. Dashing is immune; a shield absorbs
/// exactly one hit; any other hit ends the run immediately.
pub fn resolve_obstacles(ctx: &mut RunContext) -> Resolution {
    if ctx.player.dash.active {
        return Resolution::Continue;
    }

    let palette = ctx.theme.theme().palette;
    for obstacle in ctx.obstacles.iter_mut().filter(|o| !o.remove) {
        if !player_hits(&ctx.player, &obstacle.rect) {
            continue;
        }

        if ctx.player.has_shield {
            ctx.player.has_shield = false;
            obstacle.remove = true;
            burst(&mut ctx.particles, obstacle.rect.pos, 20, palette.secondary, &mut ctx.rng);
            ctx.modifiers.shake(SHIELD_HIT_SHAKE);
            ctx.events.push(GameEvent::ShieldAbsorbed);
            log::debug!("Shield absorbed {:?} at frame {}", obstacle.kind, ctx.frame);
        } else {
            ctx.crashed = true;
            ctx.events.push(GameEvent::Crashed);
            return Resolution::GameOver;
        }
    }

    Resolution::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Obstacle, ObstacleKind, Powerup};
    use crate::sim::state::Viewport;
    use crate::theme::ThemeId;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx() -> RunContext {
        let mut ctx = RunContext::new(3, ThemeId::NeonCity, Viewport::default());
        ctx.player.pos.y = ctx.player.ground_y(ctx.viewport.height);
        ctx.player.grounded = true;
        ctx
    }

    /// Obstacle sitting squarely on the player
    fn obstacle_on_player(ctx: &RunContext) -> Obstacle {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut o = Obstacle::spawn(ObstacleKind::Roller, 960.0, 540.0, &mut rng);
        o.rect.pos = ctx.player.pos;
        o
    }

    fn powerup_on_player(ctx: &RunContext, kind: PowerupKind) -> Powerup {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut p = Powerup::spawn(kind, 960.0, 540.0, &mut rng);
        p.rect.pos = ctx.player.pos + glam::Vec2::splat(10.0);
        p
    }

    #[test]
    fn test_unshielded_hit_ends_run() {
        let mut ctx = ctx();
        let o = obstacle_on_player(&ctx);
        ctx.obstacles.push(o);
        assert_eq!(resolve_obstacles(&mut ctx), Resolution::GameOver);
        assert!(ctx.crashed);
        assert_eq!(ctx.events, vec![GameEvent::Crashed]);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_hit() {
        let mut ctx = ctx();
        ctx.player.has_shield = true;
        let a = obstacle_on_player(&ctx);
        let b = obstacle_on_player(&ctx);
        ctx.obstacles.push(a);
        ctx.obstacles.push(b);

        assert_eq!(resolve_obstacles(&mut ctx), Resolution::GameOver);
        assert!(ctx.obstacles[0].remove);
        assert!(!ctx.obstacles[1].remove);
        assert!(!ctx.player.has_shield);
        assert_eq!(ctx.events, vec![GameEvent::ShieldAbsorbed, GameEvent::Crashed]);
    }

    #[test]
    fn test_shield_hit_keeps_run_alive() {
        let mut ctx = ctx();
        ctx.player.has_shield = true;
        let o = obstacle_on_player(&ctx);
        ctx.obstacles.push(o);

        assert_eq!(resolve_obstacles(&mut ctx), Resolution::Continue);
        assert!(!ctx.player.has_shield);
        assert!(ctx.obstacles[0].remove);
        assert_eq!(ctx.particles.len(), 20);
        assert_eq!(ctx.modifiers.shake, SHIELD_HIT_SHAKE);
    }

    #[test]
    fn test_dash_is_immune() {
        let mut ctx = ctx();
        ctx.player.dash.active = true;
        let o = obstacle_on_player(&ctx);
        ctx.obstacles.push(o);
        assert_eq!(resolve_obstacles(&mut ctx), Resolution::Continue);
        assert!(!ctx.obstacles[0].remove);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_graze_inside_margin_is_not_a_hit() {
        let mut ctx = ctx();
        let mut o = obstacle_on_player(&ctx);
        // Overlap the player's right edge by 8 units only
        o.rect.pos.x = ctx.player.rect().right() - 8.0;
        ctx.obstacles.push(o);
        assert_eq!(resolve_obstacles(&mut ctx), Resolution::Continue);
    }

    #[test]
    fn test_powerup_effects() {
        let mut ctx = ctx();
        for kind in [
            PowerupKind::Shield,
            PowerupKind::Warp,
            PowerupKind::Magnet,
            PowerupKind::Currency,
        ] {
            let p = powerup_on_player(&ctx, kind);
            ctx.powerups.push(p);
        }
        resolve_powerups(&mut ctx);

        assert!(ctx.powerups.iter().all(|p| p.remove));
        assert!(ctx.player.has_shield);
        assert_eq!(ctx.score, SHIELD_SCORE_BONUS);
        assert_eq!(ctx.modifiers.warp_timer, WARP_FRAMES);
        assert_eq!(ctx.modifiers.magnet_timer, MAGNET_FRAMES);
        assert_eq!(ctx.run_currency, CURRENCY_PICKUP);
        assert_eq!(ctx.events.len(), 4);
    }

    #[test]
    fn test_collection_beats_offscreen_removal() {
        let mut ctx = ctx();
        // Player pushed to the left edge so the pickup overlaps it past the despawn line
        ctx.player.pos.x = -40.0;
        let mut p = powerup_on_player(&ctx, PowerupKind::Currency);
        p.rect.pos.x = -25.0;
        assert!(p.off_screen());
        ctx.powerups.push(p);

        resolve_powerups(&mut ctx);
        assert!(ctx.powerups[0].remove);
        assert_eq!(ctx.run_currency, CURRENCY_PICKUP);
    }

    #[test]
    fn test_offscreen_powerup_is_retired() {
        let mut ctx = ctx();
        let mut p = powerup_on_player(&ctx, PowerupKind::Shield);
        p.rect.pos = glam::Vec2::new(-21.0, 0.0);
        ctx.powerups.push(p);
        resolve_powerups(&mut ctx);
        assert!(ctx.powerups[0].remove);
        assert!(!ctx.player.has_shield);
    }
}
