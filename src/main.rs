//! Neon Runner entry point
//!
//! In the browser: wires the DOM (canvas, HUD, menus, shop) to the `Game` and
//! drives it from requestAnimationFrame. Natively: plays one headless run on
//! autopilot and saves progress to disk.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use neon_runner::audio::AudioManager;
    use neon_runner::platform::{LocalStorage, MemoryStorage, Storage};
    use neon_runner::renderer::{RenderState, scene};
    use neon_runner::shop;
    use neon_runner::sim::{Phase, TickInput, Viewport, autopilot};
    use neon_runner::{Game, ThemeId};

    /// Browser host state
    struct App {
        game: Game,
        audio: AudioManager,
        render_state: Option<RenderState>,
        /// Keys currently held
        input: TickInput,
        /// Attract mode drives the run instead of the keyboard
        autopilot: bool,
        viewport: Viewport,
        /// Physical pixels per CSS pixel
        dpr: f64,
    }

    impl App {
        /// Run the pending simulation frame, if any, and play its cues
        fn update(&mut self) {
            if let Some(token) = self.game.pending_frame() {
                let input = match (self.autopilot, self.game.run()) {
                    (true, Some(ctx)) => autopilot(ctx),
                    _ => self.input,
                };
                self.game.run_frame(token, &input);
            }
            for cue in self.game.drain_cues() {
                self.audio.play(cue);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::frame(&self.game, self.viewport);
            let clear = self.game.theme().palette.bg_top;
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, clear) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h, self.viewport);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snap = self.game.snapshot();

            set_text(document, "score", &snap.score_text());
            set_text(document, "currency", &snap.currency.to_string());
            set_text(document, "high-score", &snap.record_text());

            for (id, on) in [
                ("shield-status", snap.shield),
                ("warp-status", snap.warp),
                ("magnet-status", snap.magnet),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("style", if on { "opacity: 1" } else { "opacity: 0" });
                }
            }

            if let Some(bar) = document.get_element_by_id("dash-bar") {
                let ready = snap.dash_cooldown <= 0.0;
                let color = if ready {
                    to_css(self.game.theme().palette.accent)
                } else {
                    "#555".to_string()
                };
                let style = format!(
                    "transform: scaleX({:.3}); background-color: {}",
                    1.0 - snap.dash_cooldown,
                    color
                );
                let _ = bar.set_attribute("style", &style);
            }

            let menu = snap.phase == Phase::Idle && !self.game.shop_open();
            set_visible(document, "start-screen", menu);
            set_visible(document, "pause-menu", snap.phase == Phase::Paused);
            set_visible(document, "shop", self.game.shop_open());

            match snap.phase {
                Phase::Countdown(step) => {
                    set_visible(document, "countdown", true);
                    set_text(document, "countdown", step.label());
                }
                _ => set_visible(document, "countdown", false),
            }

            let game_over = snap.phase == Phase::GameOver && !self.game.shop_open();
            set_visible(document, "game-over", game_over);
            if let Some(summary) = snap.summary {
                set_text(document, "final-score", &summary.score.to_string());
                set_text(document, "final-currency", &format!("+{}", summary.currency));
                set_visible(document, "new-record", summary.new_record);
            }

            set_text(
                document,
                "mute-btn",
                if self.game.settings().muted { "SOUND: OFF" } else { "SOUND: ON" },
            );
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * self.dpr) as u32;
            let height = (client_h as f64 * self.dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            self.viewport = Viewport {
                width: client_w as f32,
                height: client_h as f32,
            };
            self.game.resize(self.viewport.width, self.viewport.height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, self.viewport);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn to_css(color: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0).round(),
            (color[1] * 255.0).round(),
            (color[2] * 255.0).round(),
            color[3]
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let storage: Box<dyn Storage> = match LocalStorage::new() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not persist", e);
                Box::new(MemoryStorage::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(storage, seed, Viewport::default()),
            audio: AudioManager::new(),
            render_state: None,
            input: TickInput::default(),
            autopilot: false,
            viewport: Viewport::default(),
            dpr: window.device_pixel_ratio(),
        }));
        app.borrow_mut().resize(&canvas);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height, viewport) = {
            let a = app.borrow();
            (canvas.width(), canvas.height(), a.viewport)
        };
        match RenderState::new(surface, &adapter, width, height, viewport).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(&canvas, app.clone());
        render_shop(app.clone());

        request_animation_frame(app);

        log::info!("Neon Runner running!");
    }

    /// Start (or restart) a run and kick off the countdown timers
    fn start_run(app: Rc<RefCell<App>>) {
        let started = {
            let mut a = app.borrow_mut();
            a.audio.resume();
            a.game.start()
        };
        if started {
            schedule_countdown(app, neon_runner::sim::CountdownStep::Three.delay_ms());
        }
    }

    /// Real-time countdown: each step waits its own delay
    fn schedule_countdown(app: Rc<RefCell<App>>, delay_ms: u32) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move || {
            let next = app.borrow_mut().game.advance_countdown();
            if let Some(delay) = next {
                schedule_countdown(app, delay);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                match key.as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        app.borrow_mut().input.jump = true;
                    }
                    "Shift" => app.borrow_mut().input.dash = true,
                    "ArrowDown" | "s" | "S" => {
                        event.prevent_default();
                        app.borrow_mut().input.drop = true;
                    }
                    "p" | "P" | "Escape" => {
                        app.borrow_mut().game.toggle_pause();
                    }
                    "m" | "M" => {
                        app.borrow_mut().game.toggle_mute();
                    }
                    "i" | "I" => {
                        let mut a = app.borrow_mut();
                        a.autopilot = !a.autopilot;
                        log::info!("Autopilot: {}", a.autopilot);
                    }
                    "Enter" => {
                        let can_start = {
                            let a = app.borrow();
                            let phase = a.game.phase();
                            matches!(phase, Phase::Idle | Phase::GameOver) && !a.game.shop_open()
                        };
                        if can_start {
                            start_run(app.clone());
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => a.input.jump = false,
                    "Shift" => a.input.dash = false,
                    "ArrowDown" | "s" | "S" => a.input.drop = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: tap to jump, two fingers to dash
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                if event.touches().length() >= 2 {
                    a.input.dash = true;
                } else {
                    a.input.jump = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut a = app.borrow_mut();
                a.input.jump = false;
                a.input.dash = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure =
                Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-btn", "retry-btn", "restart-btn"] {
            let app = app.clone();
            on_click(&document, id, move || start_run(app.clone()));
        }
        {
            let app = app.clone();
            on_click(&document, "resume-btn", move || {
                app.borrow_mut().game.resume();
            });
        }
        {
            let app = app.clone();
            on_click(&document, "pause-btn", move || {
                app.borrow_mut().game.toggle_pause();
            });
        }
        {
            let app = app.clone();
            on_click(&document, "mute-btn", move || {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.game.toggle_mute();
            });
        }
        for id in ["shop-btn", "game-over-shop-btn"] {
            let app = app.clone();
            on_click(&document, id, move || {
                let opened = app.borrow_mut().game.open_shop();
                if opened {
                    render_shop(app.clone());
                }
            });
        }
        on_click(&document, "close-shop-btn", move || {
            app.borrow_mut().game.close_shop();
        });
    }

    /// Rebuild the shop list from the current progress record
    fn render_shop(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(list) = document.get_element_by_id("shop-items") else {
            return;
        };
        list.set_inner_html("");

        let entries = shop::listing(app.borrow().game.data());
        for entry in entries {
            let Ok(btn) = document.create_element("button") else {
                continue;
            };
            let class = if entry.equipped {
                "shop-item equipped"
            } else if entry.owned || entry.affordable {
                "shop-item"
            } else {
                "shop-item locked"
            };
            let _ = btn.set_attribute("class", class);
            btn.set_text_content(Some(&format!("{}  {}", entry.name, entry.status_text())));

            let app = app.clone();
            let id: ThemeId = entry.id;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let outcome = {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.game.select_theme(id)
                };
                if outcome.is_some_and(|o| o.changed()) {
                    render_shop(app.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
            let _ = list.append_child(&btn);
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().game.on_blur();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                // Released keys never reach us after a blur
                a.input = TickInput::default();
                a.game.on_blur();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.update();
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use neon_runner::Game;
    use neon_runner::platform::FileStorage;
    use neon_runner::sim::{Phase, Viewport, autopilot};

    env_logger::init();
    log::info!("Neon Runner (native) starting...");

    let seed = env_parse("NEON_RUNNER_SEED").unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    let max_frames: u64 = env_parse("NEON_RUNNER_FRAMES").unwrap_or(20_000);
    let save_dir = std::env::var("NEON_RUNNER_SAVE_DIR").unwrap_or_else(|_| ".".to_string());

    let storage = FileStorage::new(&save_dir);
    let mut game = Game::new(Box::new(storage), seed, Viewport::default());
    game.start();
    while game.advance_countdown().is_some() {}

    let mut frames = 0u64;
    while let Some(token) = game.pending_frame() {
        if frames >= max_frames {
            log::info!("Frame cap reached; run not recorded");
            break;
        }
        let input = game.run().map(autopilot).unwrap_or_default();
        game.run_frame(token, &input);
        for cue in game.drain_cues() {
            log::debug!("cue: {}", cue.as_str());
        }
        frames += 1;
    }

    let snap = game.snapshot();
    println!("Seed {} ran {} frames", seed, frames);
    match (snap.phase, snap.summary) {
        (Phase::GameOver, Some(summary)) => {
            println!(
                "GAME OVER  score {:05}  +{} currency{}",
                summary.score,
                summary.currency,
                if summary.new_record { "  NEW RECORD" } else { "" }
            );
        }
        _ => println!("Still running at score {}", snap.score_text()),
    }
    let data = game.data();
    println!(
        "{}  wallet {}  runs {}  distance {}",
        snap.record_text(),
        data.currency,
        data.stats.runs,
        data.stats.total_dist
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
