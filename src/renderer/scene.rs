//! Scene geometry for one frame
//!
//! Turns the theme and the current run into a flat triangle list in screen
//! pixels. Pure CPU work; the render state only uploads and draws the result.

use glam::Vec2;

use super::shapes::{
    circle, gradient_circle, gradient_rect, line, rect, rect_outline, ring, rotated_square,
};
use super::vertex::{Vertex, fade};
use crate::consts::*;
use crate::game::Game;
use crate::sim::{ObstacleKind, PowerupKind, Rect, RunContext, Viewport};
use crate::theme::{Color, Theme, WeatherKind, rgb, rgba};

const WHITE: Color = rgb(0xffffff);
const BLACK: Color = rgb(0x000000);
const GOLD: Color = rgb(0xffd700);

/// Sun disc radius and height above the ground line
const SUN_RADIUS: f32 = 100.0;
const SUN_LIFT: f32 = 50.0;
/// Spacing of the floor's converging lines at the horizon
const FLOOR_RAY_SPACING: f32 = 120.0;

/// Everything drawn for the game's current state
pub fn frame(game: &Game, viewport: Viewport) -> Vec<Vertex> {
    build(game.theme(), game.run(), viewport, game.shake_offset())
}

/// Build the frame: backdrop, scenery, entities, then effects, offset by `shake`
pub fn build(
    theme: &Theme,
    run: Option<&RunContext>,
    viewport: Viewport,
    shake: Vec2,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let grid_offset = run.map_or(0.0, |ctx| ctx.grid_offset);

    backdrop(&mut out, theme, viewport);
    if let Some(ctx) = run {
        skyline(&mut out, ctx);
    }
    floor(&mut out, theme, viewport, grid_offset);

    if let Some(ctx) = run {
        weather(&mut out, ctx);
        player(&mut out, ctx, theme);
        powerups(&mut out, ctx);
        obstacles(&mut out, ctx, theme);
        for p in &ctx.particles {
            let half = Vec2::splat(p.size / 2.0);
            rotated_square(&mut out, p.pos, half, 0.0, fade(p.color, p.life));
        }
        if ctx.modifiers.warp_active() {
            let tint = fade(theme.palette.secondary, 0.08);
            rect(&mut out, &Rect::new(0.0, 0.0, viewport.width, viewport.height), tint);
        }
    }

    if shake != Vec2::ZERO {
        for v in &mut out {
            v.position[0] += shake.x;
            v.position[1] += shake.y;
        }
    }
    out
}

fn backdrop(out: &mut Vec<Vertex>, theme: &Theme, viewport: Viewport) {
    let p = &theme.palette;
    let sky = Rect::new(0.0, 0.0, viewport.width, viewport.height);
    gradient_rect(out, &sky, p.bg_top, p.bg_bottom);

    let sun = Vec2::new(viewport.width / 2.0, viewport.ground_y() - SUN_LIFT);
    gradient_circle(out, sun, SUN_RADIUS, p.sun_top, p.sun_bottom, 48);

    // Retro scan bands across the lower half of the sun
    let shadow = rgba(0x000000, 0.2);
    for i in 0..10 {
        let y = sun.y + (i * 15) as f32 - 20.0;
        let half_chord = (SUN_RADIUS * SUN_RADIUS - (y - sun.y).powi(2)).max(0.0).sqrt();
        if half_chord > 0.0 {
            let band = Rect::new(sun.x - half_chord, y, half_chord * 2.0, 4.0 + i as f32);
            rect(out, &band, shadow);
        }
    }
}

fn skyline(out: &mut Vec<Vertex>, ctx: &RunContext) {
    let ground = ctx.viewport.ground_y();
    for (index, layer) in ctx.parallax.iter().enumerate() {
        // Far layers are dimmer
        let color = fade(layer.color, 0.3 + index as f32 * 0.2);
        for el in &layer.elements {
            rect(out, &Rect::new(el.x, ground - el.h, el.w, el.h), color);
        }
    }
}

fn floor(out: &mut Vec<Vertex>, theme: &Theme, viewport: Viewport, grid_offset: f32) {
    let ground = viewport.ground_y();
    let width = viewport.width;
    rect(out, &Rect::new(0.0, ground, width, GROUND_HEIGHT), BLACK);

    let grid = theme.palette.grid;
    let mut i = 0.0;
    while i < GROUND_HEIGHT {
        let mut y = ground + i + grid_offset;
        if y > viewport.height {
            y -= GROUND_HEIGHT;
        }
        line(out, Vec2::new(0.0, y), Vec2::new(width, y), 2.0, grid);
        i += GRID_SPACING;
    }

    let mut x = -width;
    while x < width * 2.0 {
        let far = Vec2::new(x, ground);
        let near = Vec2::new((x - width / 2.0) * 4.0 + width / 2.0, viewport.height);
        line(out, far, near, 2.0, grid);
        x += FLOOR_RAY_SPACING;
    }

    line(out, Vec2::new(0.0, ground), Vec2::new(width, ground), 3.0, theme.palette.accent);
}

fn weather(out: &mut Vec<Vertex>, ctx: &RunContext) {
    for w in &ctx.weather {
        match w.kind {
            WeatherKind::Rain => {
                let tail = w.pos + w.vel.normalize_or_zero() * 15.0;
                line(out, w.pos, tail, 1.0, w.color);
            }
            WeatherKind::Matrix => {
                let color = fade(w.color, 0.6);
                match w.glyph {
                    Some(glyph) => matrix_glyph(out, w.pos, glyph, color),
                    None => rect(out, &Rect::new(w.pos.x, w.pos.y, 9.0, 12.0), color),
                }
            }
            WeatherKind::Embers => {
                circle(out, w.pos, w.size, w.color, 6);
            }
            WeatherKind::Clear => {}
        }
    }
}

/// Pixel size of one cell in a matrix glyph
const GLYPH_CELL: f32 = 3.0;

/// Blocky 3x4 stand-in for a katakana glyph, one bit per cell (row-major).
/// Derived from the code point so each character keeps its own shape.
fn glyph_mask(glyph: char) -> u16 {
    let mixed = (glyph as u32).wrapping_mul(0x9E37_79B1) >> 20;
    // Top-middle cell always lit so no glyph is blank
    (mixed as u16 & 0x0FFF) | 0b010
}

fn matrix_glyph(out: &mut Vec<Vertex>, pos: Vec2, glyph: char, color: Color) {
    let mask = glyph_mask(glyph);
    for bit in 0..12 {
        if mask & (1 << bit) == 0 {
            continue;
        }
        let col = (bit % 3) as f32;
        let row = (bit / 3) as f32;
        let cell = Rect::new(
            pos.x + col * GLYPH_CELL,
            pos.y + row * GLYPH_CELL,
            GLYPH_CELL,
            GLYPH_CELL,
        );
        rect(out, &cell, color);
    }
}

fn player(out: &mut Vec<Vertex>, ctx: &RunContext, theme: &Theme) {
    let accent = theme.palette.accent;
    let player = &ctx.player;
    let body = player.rect();

    for t in &player.trail {
        let color = if t.dash {
            rgba(0xffffff, 0.7)
        } else {
            fade(accent, t.alpha)
        };
        rect(out, &Rect::new(t.pos.x, t.pos.y, body.size.x, body.size.y), color);
    }

    let center = body.center();
    if player.has_shield {
        ring(out, center, 44.0, 46.0, theme.palette.secondary, 48);
    }
    if ctx.modifiers.magnet_active() {
        let alpha = 0.1 + (ctx.frame as f32 * 0.1).sin() * 0.05;
        ring(out, center, 99.5, 100.5, rgba(0xffffff, alpha), 64);
    }

    if player.dash.active {
        rect(out, &body, WHITE);
    } else {
        rect(out, &body, BLACK);
        rect_outline(out, &body, 2.0, accent);
        let core = Rect::new(
            body.left() + 12.0,
            body.top() + 12.0,
            body.size.x - 24.0,
            body.size.y - 24.0,
        );
        rect(out, &core, accent);
    }
}

fn powerups(out: &mut Vec<Vertex>, ctx: &RunContext) {
    for p in &ctx.powerups {
        let c = p.rect.center();
        match p.kind {
            PowerupKind::Shield => circle(out, c, 8.0, WHITE, 16),
            PowerupKind::Currency => {
                rotated_square(out, c, Vec2::splat(7.0), std::f32::consts::FRAC_PI_4, GOLD)
            }
            PowerupKind::Magnet => {
                rect(out, &Rect::new(c.x - 8.0, c.y - 8.0, 16.0, 16.0), rgb(0xff0000));
                rect(out, &Rect::new(c.x - 8.0, c.y - 4.0, 16.0, 8.0), rgb(0xcccccc));
            }
            PowerupKind::Warp => {
                rect(out, &Rect::new(c.x - 6.0, c.y - 6.0, 12.0, 12.0), rgb(0x00f3ff));
                rect_outline(out, &Rect::new(c.x - 8.0, c.y - 8.0, 16.0, 16.0), 1.0, WHITE);
            }
        }
    }
}

fn obstacles(out: &mut Vec<Vertex>, ctx: &RunContext, theme: &Theme) {
    let danger = theme.palette.danger;
    for o in &ctx.obstacles {
        let c = o.rect.center();
        match o.kind {
            ObstacleKind::Drone => {
                // Diamond
                let angle = o.rotation + std::f32::consts::FRAC_PI_4;
                rotated_square(out, c, Vec2::splat(10.6), angle, danger);
            }
            ObstacleKind::Roller => {
                ring(out, c, 13.5, 16.5, danger, 24);
                let spoke = Vec2::from_angle(o.rotation) * 15.0;
                line(out, c - spoke, c + spoke, 3.0, danger);
                let cross = spoke.perp();
                line(out, c - cross, c + cross, 3.0, danger);
            }
            ObstacleKind::Block => {
                rect(out, &o.rect, rgb(0x111111));
                rect_outline(out, &o.rect, 2.0, danger);
                let stripe = Rect::new(o.rect.left() + 5.0, c.y - 5.0, o.rect.size.x - 10.0, 10.0);
                rect(out, &stripe, danger);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::theme::{MIDNIGHT_TOKYO, NEON_CITY, ThemeId};

    #[test]
    fn test_menu_backdrop_only() {
        let out = build(&NEON_CITY, None, Viewport::default(), Vec2::ZERO);
        assert!(!out.is_empty());
        assert_eq!(out.len() % 3, 0);
        // Sky covers the whole screen with the theme's top color
        assert_eq!(out[0].color, NEON_CITY.palette.bg_top);
    }

    #[test]
    fn test_run_adds_geometry() {
        let mut ctx = RunContext::new(3, ThemeId::MidnightTokyo, Viewport::default());
        for _ in 0..30 {
            tick(&mut ctx, &TickInput::default());
        }
        let menu = build(&MIDNIGHT_TOKYO, None, ctx.viewport, Vec2::ZERO);
        let run = build(&MIDNIGHT_TOKYO, Some(&ctx), ctx.viewport, Vec2::ZERO);
        assert!(run.len() > menu.len());
        assert_eq!(run.len() % 3, 0);
    }

    #[test]
    fn test_matrix_glyphs_draw_their_own_cells() {
        let a = glyph_mask('\u{30A2}');
        let b = glyph_mask('\u{30AB}');
        assert_ne!(a, b);
        assert!(a & 0b010 != 0);
        assert_eq!(a >> 12, 0);

        let mut out = Vec::new();
        matrix_glyph(&mut out, Vec2::new(10.0, 20.0), '\u{30A2}', WHITE);
        assert_eq!(out.len(), a.count_ones() as usize * 6);
        for v in &out {
            assert!((10.0..=10.0 + 3.0 * GLYPH_CELL).contains(&v.position[0]));
            assert!((20.0..=20.0 + 4.0 * GLYPH_CELL).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_shake_offsets_everything() {
        let ctx = RunContext::new(3, ThemeId::NeonCity, Viewport::default());
        let still = build(&NEON_CITY, Some(&ctx), ctx.viewport, Vec2::ZERO);
        let shaken = build(&NEON_CITY, Some(&ctx), ctx.viewport, Vec2::new(3.0, -2.0));
        assert_eq!(still.len(), shaken.len());
        for (a, b) in still.iter().zip(&shaken) {
            assert!((b.position[0] - a.position[0] - 3.0).abs() < 1e-4);
            assert!((b.position[1] - a.position[1] + 2.0).abs() < 1e-4);
        }
    }
}
