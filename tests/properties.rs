//! Property tests over random input sequences and control-call orderings

use std::collections::BTreeSet;

use proptest::prelude::*;

use neon_runner::consts::*;
use neon_runner::platform::{MemoryStorage, Storage};
use neon_runner::shop::{ShopOutcome, select_theme};
use neon_runner::sim::collision::apply_powerup;
use neon_runner::sim::spawner::select_obstacle;
use neon_runner::sim::{
    ObstacleKind, Phase, PowerupKind, Resolution, RunContext, TickInput, Viewport, tick,
};
use neon_runner::{Game, PlayerData, ThemeId};

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(jump, dash, drop)| TickInput {
        jump,
        dash,
        drop,
    })
}

fn theme_strategy() -> impl Strategy<Value = ThemeId> {
    prop::sample::select(ThemeId::ALL.to_vec())
}

#[derive(Debug, Clone, Copy)]
enum Control {
    Pause,
    Resume,
    Toggle,
    Blur,
    Frame,
}

fn control_strategy() -> impl Strategy<Value = Control> {
    prop_oneof![
        Just(Control::Pause),
        Just(Control::Resume),
        Just(Control::Toggle),
        Just(Control::Blur),
        Just(Control::Frame),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn controller_invariants_hold(
        seed in any::<u64>(),
        theme in theme_strategy(),
        inputs in prop::collection::vec(input_strategy(), 1..400),
    ) {
        let mut ctx = RunContext::new(seed, theme, Viewport::default());
        let mut last_score = 0.0;
        for input in &inputs {
            let resolution = tick(&mut ctx, input);

            let dash = &ctx.player.dash;
            prop_assert!((0.0..=DASH_COOLDOWN_FRAMES).contains(&dash.cooldown));
            prop_assert!(dash.timer <= DASH_DURATION);
            let ts = ctx.modifiers.time_scale;
            prop_assert!(ts == 1.0 || ts == WARP_TIME_SCALE);
            prop_assert!(ctx.player.trail.len() <= TRAIL_LENGTH);
            prop_assert!(ctx.player.jump_count <= MAX_JUMPS);
            prop_assert!(ctx.score >= last_score);
            last_score = ctx.score;

            if resolution == Resolution::GameOver {
                break;
            }
        }
    }

    #[test]
    fn magnet_runs_exactly_its_duration(
        seed in any::<u64>(),
        warp_at in prop::option::of(0u32..600),
        inputs in prop::collection::vec(input_strategy(), 600),
    ) {
        let mut ctx = RunContext::new(seed, ThemeId::NeonCity, Viewport::default());
        apply_powerup(&mut ctx, PowerupKind::Magnet);
        prop_assert_eq!(ctx.modifiers.magnet_timer, MAGNET_FRAMES);

        for (i, input) in inputs.iter().enumerate() {
            // No pickups and nothing to crash into
            ctx.powerups.clear();
            ctx.obstacles.clear();
            if warp_at == Some(i as u32) {
                ctx.modifiers.activate_warp();
            }
            prop_assert!(ctx.modifiers.magnet_active());
            prop_assert_eq!(tick(&mut ctx, input), Resolution::Continue);
        }
        prop_assert_eq!(ctx.modifiers.magnet_timer, 0);
    }

    #[test]
    fn low_scores_only_spawn_blocks(draw in 0.0f32..1.0) {
        prop_assert_eq!(select_obstacle(0.0, draw), ObstacleKind::Block);
        prop_assert_ne!(select_obstacle(2000.0, draw), ObstacleKind::Drone);
        prop_assert_ne!(select_obstacle(4000.0, draw), ObstacleKind::Roller);
    }

    #[test]
    fn progress_survives_save_and_load(
        currency in 0u32..100_000,
        high_score in 0.0f32..1e6,
        owned in prop::collection::btree_set(theme_strategy(), 0..4),
        equip in theme_strategy(),
        runs in 0u32..1000,
    ) {
        let mut inventory: BTreeSet<ThemeId> = owned;
        inventory.insert(ThemeId::default());
        let equipped_theme = if inventory.contains(&equip) { equip } else { ThemeId::default() };
        let mut data = PlayerData {
            currency,
            high_score,
            inventory,
            equipped_theme,
            ..Default::default()
        };
        data.stats.runs = runs;

        let mut storage = MemoryStorage::new();
        data.save(&mut storage).unwrap();
        prop_assert_eq!(PlayerData::load(&storage), data);
    }

    #[test]
    fn shop_never_overspends(currency in 0u32..3000, theme in theme_strategy()) {
        let mut data = PlayerData { currency, ..Default::default() };
        let before = data.clone();
        match select_theme(&mut data, theme) {
            ShopOutcome::Denied { cost, .. } => {
                prop_assert!(cost > currency);
                prop_assert_eq!(data, before);
            }
            ShopOutcome::Purchased(id) => {
                prop_assert_eq!(data.currency, currency - id.theme().cost);
                prop_assert!(data.owns(id));
                prop_assert_eq!(data.equipped_theme, before.equipped_theme);
            }
            ShopOutcome::Equipped(id) => {
                prop_assert_eq!(data.currency, currency);
                prop_assert_eq!(data.equipped_theme, id);
            }
        }
    }

    #[test]
    fn frames_pending_only_while_playing(
        controls in prop::collection::vec(control_strategy(), 1..60),
    ) {
        let mut game = Game::new(Box::new(MemoryStorage::new()), 5, Viewport::default());
        game.start();
        while game.advance_countdown().is_some() {}

        for control in controls {
            match control {
                Control::Pause => { game.pause(); }
                Control::Resume => { game.resume(); }
                Control::Toggle => { game.toggle_pause(); }
                Control::Blur => game.on_blur(),
                Control::Frame => {
                    if let Some(token) = game.pending_frame() {
                        game.run_frame(token, &TickInput::default());
                    }
                }
            }
            let playing = game.phase() == Phase::Playing;
            prop_assert_eq!(game.pending_frame().is_some(), playing);
        }
    }
}

#[test]
fn missing_and_corrupt_records_fall_back_to_defaults() {
    let empty = MemoryStorage::new();
    assert_eq!(PlayerData::load(&empty), PlayerData::default());

    let mut corrupt = MemoryStorage::new();
    corrupt
        .set(neon_runner::persistence::STORAGE_KEY, "{not json")
        .unwrap();
    assert_eq!(PlayerData::load(&corrupt), PlayerData::default());
}

#[test]
fn headless_autopilot_run_finishes_or_survives() {
    let mut game = Game::new(Box::new(MemoryStorage::new()), 42, Viewport::default());
    game.start();
    while game.advance_countdown().is_some() {}

    let mut frames = 0;
    while let Some(token) = game.pending_frame() {
        if frames == 3000 {
            break;
        }
        let input = game
            .run()
            .map(neon_runner::sim::autopilot)
            .unwrap_or_default();
        game.run_frame(token, &input);
        frames += 1;
    }

    match game.phase() {
        Phase::GameOver => assert_eq!(game.data().stats.runs, 1),
        phase => {
            assert_eq!(phase, Phase::Playing);
            assert_eq!(frames, 3000);
        }
    }
    assert!(game.snapshot().score > 0);
}
