//! Attract-mode autopilot
//!
//! Produces the same `TickInput` a player would, so the simulation rules are
//! untouched. Jumps ground obstacles and dashes through drones when it can.

use std::cmp::Ordering;

use super::entities::ObstacleKind;
use super::state::RunContext;
use super::tick::TickInput;

/// Frames of warning before reacting to the nearest obstacle
const LOOKAHEAD_FRAMES: f32 = 8.0;

pub fn autopilot(ctx: &RunContext) -> TickInput {
    let mut input = TickInput::default();
    let player = ctx.player.rect();
    let lead = ctx.speed * ctx.modifiers.time_scale * LOOKAHEAD_FRAMES;

    let threat = ctx
        .obstacles
        .iter()
        .filter(|o| !o.remove && o.rect.right() > player.left())
        .min_by(|a, b| {
            a.rect
                .left()
                .partial_cmp(&b.rect.left())
                .unwrap_or(Ordering::Equal)
        });
    let Some(obstacle) = threat else {
        return input;
    };

    let gap = obstacle.rect.left() - player.right();
    if gap > lead {
        return input;
    }

    match obstacle.kind {
        ObstacleKind::Block | ObstacleKind::Roller => {
            if ctx.player.grounded {
                input.jump = true;
            } else if gap < 0.0
                && player.bottom() > obstacle.rect.top()
                && ctx.player.dash.ready()
            {
                // Jumped too late; dash through
                input.dash = true;
            }
        }
        ObstacleKind::Drone => {
            let overlaps_vertically =
                player.top() < obstacle.rect.bottom() && player.bottom() > obstacle.rect.top();
            if !ctx.player.grounded && overlaps_vertically && ctx.player.dash.ready() {
                input.dash = true;
            }
        }
    }

    input
}
