//! Game orchestrator
//!
//! Owns the lifecycle phase, the current run, the career record and the
//! preferences. Hosts drive it with control calls (start, pause, shop) and
//! one `run_frame` per display refresh while a frame is pending.

use glam::Vec2;

use crate::audio::SoundCue;
use crate::persistence::PlayerData;
use crate::platform::{FrameLoop, FrameToken, Storage};
use crate::settings::Settings;
use crate::shop::{self, ShopOutcome};
use crate::sim::entities::burst;
use crate::sim::{
    CountdownStep, FrameSnapshot, Phase, Resolution, RunContext, RunSummary, TickInput, Viewport,
    tick,
};
use crate::theme::{Theme, ThemeId};

pub struct Game {
    phase: Phase,
    run: Option<RunContext>,
    data: PlayerData,
    settings: Settings,
    storage: Box<dyn Storage>,
    frames: FrameLoop,
    cues: Vec<SoundCue>,
    summary: Option<RunSummary>,
    /// Seed for the next run
    next_seed: u64,
    viewport: Viewport,
    shop_open: bool,
}

impl Game {
    /// Load progress and settings from `storage`; `seed` seeds the first run
    pub fn new(storage: Box<dyn Storage>, seed: u64, viewport: Viewport) -> Self {
        let data = PlayerData::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        Self {
            phase: Phase::Idle,
            run: None,
            data,
            settings,
            storage,
            frames: FrameLoop::new(),
            cues: Vec::new(),
            summary: None,
            next_seed: seed,
            viewport,
            shop_open: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current or last finished run
    pub fn run(&self) -> Option<&RunContext> {
        self.run.as_ref()
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    pub fn shop_open(&self) -> bool {
        self.shop_open
    }

    /// Theme to draw: the run's theme while one exists, else the equipped one
    pub fn theme(&self) -> &'static Theme {
        match &self.run {
            Some(ctx) => ctx.theme(),
            None => self.data.equipped_theme.theme(),
        }
    }

    /// Frame the host should run next, if any
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.frames.pending()
    }

    // === Lifecycle ===

    /// Begin the countdown. Allowed from Idle, GameOver and Paused; a paused
    /// run is abandoned without touching the career record.
    pub fn start(&mut self) -> bool {
        if !self.phase.can_start() {
            return false;
        }
        if self.phase == Phase::Paused {
            log::info!("Abandoning paused run");
        }
        self.frames.cancel();
        self.run = None;
        self.summary = None;
        self.shop_open = false;
        self.phase = Phase::Countdown(CountdownStep::Three);
        true
    }

    /// Step the countdown. Returns the delay in milliseconds before the next
    /// call, or `None` once the run has begun (or no countdown is running).
    pub fn advance_countdown(&mut self) -> Option<u32> {
        let Phase::Countdown(step) = self.phase else {
            return None;
        };
        match step.next() {
            Some(next) => {
                self.phase = Phase::Countdown(next);
                self.cue(SoundCue::Countdown);
                Some(next.delay_ms())
            }
            None => {
                self.begin_run();
                None
            }
        }
    }

    fn begin_run(&mut self) {
        let seed = self.next_seed;
        self.next_seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);

        self.run = Some(RunContext::new(seed, self.data.equipped_theme, self.viewport));
        self.phase = Phase::Playing;
        self.frames.schedule();
        log::info!(
            "Run started with seed {} on {}",
            seed,
            self.data.equipped_theme.as_str()
        );
    }

    /// Run one tick if `token` is the pending frame. Stale tokens (from before
    /// a pause) are ignored. Schedules the following frame unless the run ended.
    pub fn run_frame(&mut self, token: FrameToken, input: &TickInput) -> Resolution {
        if !self.frames.fire(token) || self.phase != Phase::Playing {
            return Resolution::Continue;
        }
        let Some(ctx) = self.run.as_mut() else {
            return Resolution::Continue;
        };

        let resolution = tick(ctx, input);
        let events = ctx.drain_events();
        for event in events {
            self.cue(SoundCue::from_event(event));
        }

        match resolution {
            Resolution::Continue => {
                self.frames.schedule();
            }
            Resolution::GameOver => self.finish_run(),
        }
        resolution
    }

    /// Merge the run into the career record and save it
    fn finish_run(&mut self) {
        let Some(ctx) = self.run.as_mut() else {
            return;
        };
        let danger = ctx.theme().palette.danger;
        let center = ctx.player.rect().center();
        burst(&mut ctx.particles, center, 50, danger, &mut ctx.rng);

        ctx.modifiers.shake = 0.0;

        // The run's pickups move into the wallet
        let run_currency = std::mem::take(&mut ctx.run_currency);
        let summary = self.data.record_run(ctx.score, run_currency);
        log::info!(
            "Game over: score {}, +{} currency{}",
            summary.score,
            summary.currency,
            if summary.new_record { ", new record" } else { "" }
        );

        self.summary = Some(summary);
        self.phase = Phase::GameOver;
        self.frames.cancel();
        self.save_data();
    }

    /// Pause a running game. Calling it again while paused does nothing.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.frames.cancel();
        self.phase = Phase::Paused;
        log::info!("Paused");
        true
    }

    /// Resume a paused game. Calling it again while playing does nothing.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Playing;
        self.frames.schedule();
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Focus lost: a running game pauses itself
    pub fn on_blur(&mut self) {
        if self.phase == Phase::Playing {
            self.pause();
            log::info!("Auto-paused (window blur)");
        }
    }

    // === Preferences ===

    /// Flip and persist the mute flag. Returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        if self.settings.muted {
            self.cues.clear();
        }
        self.save_settings();
        self.settings.muted
    }

    pub fn set_screen_shake(&mut self, enabled: bool) {
        self.settings.screen_shake = enabled;
        self.save_settings();
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.settings.reduced_motion = enabled;
        self.save_settings();
    }

    // === Shop ===

    /// Only reachable from the menu or the game-over screen
    pub fn open_shop(&mut self) -> bool {
        if !self.phase.allows_shop() {
            return false;
        }
        self.shop_open = true;
        true
    }

    /// Closing the shop lands on the start menu
    pub fn close_shop(&mut self) {
        self.shop_open = false;
        self.to_menu();
    }

    /// Leave the game-over screen for the start menu, dropping the finished run
    pub fn to_menu(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.frames.cancel();
        self.run = None;
        self.summary = None;
        self.shop_open = false;
        self.phase = Phase::Idle;
        true
    }

    /// Equip or buy a theme. `None` when the shop is closed.
    pub fn select_theme(&mut self, id: ThemeId) -> Option<ShopOutcome> {
        if !self.shop_open || !self.phase.allows_shop() {
            return None;
        }

        let outcome = shop::select_theme(&mut self.data, id);
        match outcome {
            ShopOutcome::Purchased(_) => self.cue(SoundCue::Buy),
            ShopOutcome::Equipped(theme) => {
                // Repaint the finished run's backdrop too
                if let Some(ctx) = self.run.as_mut() {
                    ctx.set_theme(theme);
                }
            }
            ShopOutcome::Denied { cost, currency } => {
                log::info!("Cannot afford {} ({} < {})", id.as_str(), currency, cost);
                self.cue(SoundCue::Denied);
            }
        }
        if outcome.changed() {
            self.save_data();
        }
        Some(outcome)
    }

    // === Presentation ===

    pub fn snapshot(&self) -> FrameSnapshot {
        let mut snap = FrameSnapshot::capture(
            self.phase,
            self.run.as_ref(),
            self.data.currency,
            self.data.high_score,
            self.summary,
        );
        if !self.settings.effective_screen_shake() {
            snap.shake = 0.0;
        }
        snap
    }

    /// Camera offset for this frame, zero when shake is off
    pub fn shake_offset(&self) -> Vec2 {
        let Some(ctx) = &self.run else {
            return Vec2::ZERO;
        };
        let shake = ctx.modifiers.shake;
        if shake <= 0.0 || !self.settings.effective_screen_shake() {
            return Vec2::ZERO;
        }
        // Deterministic jitter derived from the frame so rendering never touches the run RNG
        let t = ctx.frame as f32;
        Vec2::new((t * 12.9898).sin(), (t * 78.233).cos()) * shake * 0.5
    }

    /// Take the cues produced since the last call
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        if self.settings.muted {
            self.cues.clear();
        }
        std::mem::take(&mut self.cues)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
        if let Some(ctx) = self.run.as_mut() {
            ctx.resize(self.viewport);
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        if self.settings.muted {
            return;
        }
        // Gameplay cues need a live run; the final crash tick still counts
        if cue.is_gameplay() && self.run.is_none() {
            return;
        }
        self.cues.push(cue);
    }

    fn save_data(&mut self) {
        if let Err(e) = self.data.save(self.storage.as_mut()) {
            log::warn!("Failed to save progress: {}", e);
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(self.storage.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    #[cfg(test)]
    fn run_mut(&mut self) -> Option<&mut RunContext> {
        self.run.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SHIELD_HIT_SHAKE;
    use crate::persistence::STORAGE_KEY;
    use crate::platform::MemoryStorage;
    use crate::sim::entities::{Obstacle, ObstacleKind, Powerup, PowerupKind};

    fn new_game() -> Game {
        Game::new(Box::new(MemoryStorage::new()), 7, Viewport::default())
    }

    fn playing() -> Game {
        let mut game = new_game();
        assert!(game.start());
        while game.advance_countdown().is_some() {}
        assert_eq!(game.phase(), Phase::Playing);
        game
    }

    fn step(game: &mut Game) -> Resolution {
        let token = game.pending_frame().expect("no frame pending");
        game.run_frame(token, &TickInput::default())
    }

    /// Put an obstacle right where the player will be after this frame's scroll
    fn obstacle_on_player(game: &mut Game) {
        let ctx = game.run_mut().unwrap();
        let mut o = Obstacle::spawn(ObstacleKind::Roller, 960.0, 540.0, &mut ctx.rng);
        o.rect.pos = ctx.player.pos + Vec2::new(ctx.speed, 10.0);
        ctx.obstacles.push(o);
    }

    #[test]
    fn test_countdown_then_playing() {
        let mut game = new_game();
        assert!(game.start());
        assert_eq!(game.phase(), Phase::Countdown(CountdownStep::Three));
        assert!(game.pending_frame().is_none());

        assert_eq!(game.advance_countdown(), Some(800));
        assert_eq!(game.advance_countdown(), Some(800));
        assert_eq!(game.advance_countdown(), Some(500));
        assert_eq!(game.phase(), Phase::Countdown(CountdownStep::Go));
        assert_eq!(game.advance_countdown(), None);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.pending_frame().is_some());
        assert_eq!(game.drain_cues(), vec![SoundCue::Countdown; 3]);
    }

    #[test]
    fn test_cannot_start_mid_run() {
        let mut game = playing();
        assert!(!game.start());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut game = playing();
        let token = game.pending_frame().unwrap();

        assert!(game.pause());
        assert!(!game.pause());
        assert_eq!(game.phase(), Phase::Paused);
        assert!(game.pending_frame().is_none());

        // A frame requested before the pause does nothing
        let frame = game.run().unwrap().frame;
        game.run_frame(token, &TickInput::default());
        assert_eq!(game.run().unwrap().frame, frame);

        assert!(game.resume());
        assert!(!game.resume());
        let resumed = game.pending_frame().unwrap();
        assert_ne!(resumed, token);
        step(&mut game);
        assert_eq!(game.run().unwrap().frame, frame + 1);
    }

    #[test]
    fn test_blur_pauses_only_when_playing() {
        let mut game = new_game();
        game.on_blur();
        assert_eq!(game.phase(), Phase::Idle);

        let mut game = playing();
        game.on_blur();
        assert_eq!(game.phase(), Phase::Paused);
        game.on_blur();
        assert_eq!(game.phase(), Phase::Paused);
    }

    #[test]
    fn test_game_over_records_stats() {
        let mut game = playing();
        // Long enough to land on the ground
        for _ in 0..40 {
            step(&mut game);
        }
        game.run_mut().unwrap().run_currency = 20;
        let score = game.run().unwrap().score;
        obstacle_on_player(&mut game);

        assert_eq!(step(&mut game), Resolution::GameOver);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.pending_frame().is_none());

        let data = game.data();
        assert_eq!(data.stats.runs, 1);
        assert_eq!(data.stats.total_dist, u64::from(crate::floor_score(score)));
        assert_eq!(data.currency, 20);
        assert!(game.drain_cues().contains(&SoundCue::Crash));

        let summary = game.summary().unwrap();
        assert_eq!(summary.currency, 20);
        assert!(summary.new_record);
        assert_eq!(game.snapshot().currency, 20);

        // Saved to storage
        let saved = PlayerData::from_json(&game.storage().get(STORAGE_KEY).unwrap());
        assert_eq!(saved.stats.runs, 1);
        assert_eq!(saved.currency, 20);
    }

    /// A finished run sitting on the game-over screen
    fn crashed() -> Game {
        let mut game = playing();
        for _ in 0..40 {
            step(&mut game);
        }
        obstacle_on_player(&mut game);
        assert_eq!(step(&mut game), Resolution::GameOver);
        game
    }

    #[test]
    fn test_game_over_stops_shake() {
        let mut game = playing();
        for _ in 0..40 {
            step(&mut game);
        }
        game.run_mut().unwrap().modifiers.shake(SHIELD_HIT_SHAKE);
        obstacle_on_player(&mut game);
        assert_eq!(step(&mut game), Resolution::GameOver);

        assert_eq!(game.run().unwrap().modifiers.shake, 0.0);
        assert_eq!(game.snapshot().shake, 0.0);
        assert_eq!(game.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_closing_shop_after_game_over_returns_to_menu() {
        let mut game = crashed();
        assert!(game.open_shop());
        game.close_shop();

        assert_eq!(game.phase(), Phase::Idle);
        assert!(!game.shop_open());
        assert!(game.run().is_none());
        assert!(game.summary().is_none());
        assert!(game.pending_frame().is_none());
        assert_eq!(game.data().stats.runs, 1);

        // The menu still starts a fresh run
        assert!(game.start());
        assert_eq!(game.phase(), Phase::Countdown(CountdownStep::Three));
    }

    #[test]
    fn test_to_menu_only_from_game_over() {
        let mut game = playing();
        assert!(!game.to_menu());
        assert_eq!(game.phase(), Phase::Playing);

        // Closing a shop opened from the menu stays on the menu
        let mut game = new_game();
        game.open_shop();
        game.close_shop();
        assert_eq!(game.phase(), Phase::Idle);

        let mut game = crashed();
        assert!(game.to_menu());
        assert!(!game.to_menu());
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut game = playing();
        {
            let ctx = game.run_mut().unwrap();
            let mut p = Powerup::spawn(PowerupKind::Shield, 960.0, 540.0, &mut ctx.rng);
            p.rect.pos = ctx.player.pos + Vec2::new(ctx.speed, 10.0);
            ctx.powerups.push(p);
        }
        step(&mut game);
        assert!(game.run().unwrap().player.has_shield);

        obstacle_on_player(&mut game);
        assert_eq!(step(&mut game), Resolution::Continue);
        let ctx = game.run().unwrap();
        assert!(!ctx.player.has_shield);
        assert!(ctx.obstacles.iter().all(|o| o.kind != ObstacleKind::Roller));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.data().stats.runs, 0);
    }

    #[test]
    fn test_restart_from_pause_abandons_run() {
        let mut game = playing();
        step(&mut game);
        game.pause();
        assert!(game.start());
        assert!(game.run().is_none());
        assert_eq!(game.data().stats.runs, 0);
        assert_eq!(game.phase(), Phase::Countdown(CountdownStep::Three));
    }

    #[test]
    fn test_mute_silences_cues() {
        let mut game = new_game();
        assert!(game.toggle_mute());
        game.start();
        game.advance_countdown();
        assert!(game.drain_cues().is_empty());

        let reloaded = Settings::load(game.storage());
        assert!(reloaded.muted);
        assert!(!game.toggle_mute());
    }

    #[test]
    fn test_shop_gating() {
        let mut game = playing();
        assert!(!game.open_shop());
        assert_eq!(game.select_theme(ThemeId::MarsColony), None);

        let mut game = new_game();
        assert_eq!(game.select_theme(ThemeId::MarsColony), None);
        assert!(game.open_shop());
        assert!(matches!(
            game.select_theme(ThemeId::MarsColony),
            Some(ShopOutcome::Denied { cost: 500, .. })
        ));
        assert_eq!(game.drain_cues(), vec![SoundCue::Denied]);
        assert_eq!(game.data().inventory.len(), 1);
    }

    #[test]
    fn test_purchase_persists() {
        let mut storage = MemoryStorage::new();
        let data = PlayerData {
            currency: 600,
            ..Default::default()
        };
        data.save(&mut storage).unwrap();

        let mut game = Game::new(Box::new(storage), 1, Viewport::default());
        game.open_shop();
        assert_eq!(
            game.select_theme(ThemeId::MarsColony),
            Some(ShopOutcome::Purchased(ThemeId::MarsColony))
        );
        assert_eq!(game.drain_cues(), vec![SoundCue::Buy]);
        assert_eq!(
            game.select_theme(ThemeId::MarsColony),
            Some(ShopOutcome::Equipped(ThemeId::MarsColony))
        );

        let saved = PlayerData::load(game.storage());
        assert_eq!(saved.currency, 100);
        assert!(saved.owns(ThemeId::MarsColony));
        assert_eq!(saved.equipped_theme, ThemeId::MarsColony);
        assert_eq!(game.theme().id, ThemeId::MarsColony);
    }

    #[test]
    fn test_reduced_motion_hides_shake() {
        let mut game = playing();
        game.run_mut().unwrap().modifiers.shake(SHIELD_HIT_SHAKE);
        assert!(game.snapshot().shake > 0.0);
        game.set_reduced_motion(true);
        assert_eq!(game.snapshot().shake, 0.0);
        assert_eq!(game.shake_offset(), Vec2::ZERO);
    }
}
