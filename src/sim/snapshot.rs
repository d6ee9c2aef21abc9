//! Read-only view of a frame for the HUD and presentation layer

use super::lifecycle::Phase;
use super::state::RunContext;
use crate::floor_score;

/// Result of a finished run, shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Floored final score
    pub score: u32,
    /// Currency picked up during the run
    pub currency: u32,
    pub new_record: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub phase: Phase,
    /// Floored run score (0 outside a run)
    pub score: u32,
    /// Wallet plus this run's pickups
    pub currency: u32,
    pub high_score: u32,
    pub shield: bool,
    pub warp: bool,
    pub magnet: bool,
    /// Dash cooldown still to run, 1.0 right after a dash, 0.0 when ready
    pub dash_cooldown: f32,
    pub shake: f32,
    pub summary: Option<RunSummary>,
}

impl FrameSnapshot {
    pub fn capture(
        phase: Phase,
        run: Option<&RunContext>,
        wallet: u32,
        high_score: f32,
        summary: Option<RunSummary>,
    ) -> Self {
        let mut snap = Self {
            phase,
            score: 0,
            currency: wallet,
            high_score: floor_score(high_score),
            shield: false,
            warp: false,
            magnet: false,
            dash_cooldown: 0.0,
            shake: 0.0,
            summary,
        };
        if let Some(ctx) = run {
            snap.score = floor_score(ctx.score);
            snap.currency = wallet.saturating_add(ctx.run_currency);
            snap.shield = ctx.player.has_shield;
            snap.warp = ctx.modifiers.warp_active();
            snap.magnet = ctx.modifiers.magnet_active();
            snap.dash_cooldown = ctx.player.dash_cooldown_fraction();
            snap.shake = ctx.modifiers.shake;
        }
        snap
    }

    /// Score as shown in the HUD, zero-padded to five digits
    pub fn score_text(&self) -> String {
        format!("{:05}", self.score)
    }

    pub fn record_text(&self) -> String {
        format!("RECORD: {}", self.high_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::theme::ThemeId;

    #[test]
    fn test_hud_text() {
        let mut ctx = RunContext::new(1, ThemeId::NeonCity, Viewport::default());
        ctx.score = 42.9;
        let snap = FrameSnapshot::capture(Phase::Playing, Some(&ctx), 0, 1234.5, None);
        assert_eq!(snap.score_text(), "00042");
        assert_eq!(snap.record_text(), "RECORD: 1234");

        ctx.score = 123_456.0;
        let snap = FrameSnapshot::capture(Phase::Playing, Some(&ctx), 0, 0.0, None);
        assert_eq!(snap.score_text(), "123456");
    }

    #[test]
    fn test_currency_combines_wallet_and_run() {
        let mut ctx = RunContext::new(1, ThemeId::NeonCity, Viewport::default());
        ctx.run_currency = 30;
        ctx.player.has_shield = true;
        ctx.modifiers.activate_magnet();
        let snap = FrameSnapshot::capture(Phase::Playing, Some(&ctx), 500, 0.0, None);
        assert_eq!(snap.currency, 530);
        assert!(snap.shield && snap.magnet && !snap.warp);

        let idle = FrameSnapshot::capture(Phase::Idle, None, 500, 0.0, None);
        assert_eq!(idle.currency, 500);
        assert_eq!(idle.score_text(), "00000");
    }
}
