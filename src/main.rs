//! Moxie Mining entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use moxie_mining::consts::*;
    use moxie_mining::history::{self, GameHistory, GameRecord};
    use moxie_mining::platform;
    use moxie_mining::renderer::CanvasRenderer;
    use moxie_mining::sim::{GameEvent, GamePhase, RenderableFrame};
    use moxie_mining::{Session, Settings};

    struct Game {
        session: Session,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        history: GameHistory,
        last_frame: Option<RenderableFrame>,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Cleared when the page is hidden so no orphaned frame keeps ticking
        running: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(seed),
                renderer: None,
                settings: Settings::load(),
                history: GameHistory::load(),
                last_frame: None,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                running: true,
            }
        }

        /// Run simulation ticks and react to session events
        fn update(&mut self, dt: f32, time: f64) {
            let frame = self.session.advance(dt);

            for event in &frame.events {
                match event {
                    GameEvent::SessionEnded { final_score } => {
                        let record = GameRecord::from_state(self.session.state(), platform::now_ms());
                        let rank = self.history.record(record);
                        self.history.save();
                        log::info!("Run recorded: {} tokens (rank {})", final_score, rank);
                        show_game_over(*final_score, rank, &self.history);
                    }
                    GameEvent::SessionRestarted { .. } => hide_game_over(),
                    _ => {}
                }
            }
            self.last_frame = Some(frame);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let (Some(renderer), Some(frame)) = (&self.renderer, &self.last_frame) {
                renderer.render(frame, &self.settings);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(frame) = &self.last_frame else {
                return;
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &frame.score.to_string());

            let hearts: String = (0..frame.max_health)
                .map(|i| if i < frame.health { '♥' } else { '♡' })
                .collect();
            set_text(&document, "#hud-health .hud-value", &hearts);

            set_text(&document, "#hud-speed .hud-value", &format!("x{:.1}", frame.speed));
            set_text(&document, "#hud-size .hud-value", &format!("x{:.1}", frame.size));

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let class = if self.settings.show_fps {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }
            set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if frame.phase == GamePhase::Paused {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Reset for a new run
        fn restart(&mut self) {
            let seed = platform::time_seed();
            self.session.restart(seed);
            self.last_time = 0.0;
        }
    }

    fn set_text(document: &web_sys::Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show_game_over(score: u64, rank: usize, history: &GameHistory) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("final-rank") {
            el.set_text_content(Some(&format!("#{}", rank)));
        }
        if let Some(el) = document.get_element_by_id("best-score") {
            let best = history.best_score().unwrap_or(0);
            el.set_text_content(Some(&best.to_string()));
        }
        if let Some(el) = document.get_element_by_id("total-mined") {
            el.set_text_content(Some(&format!("{} MOXIE", history.total_mined)));
        }
        if let Some(el) = document.get_element_by_id("top-runs") {
            let now = platform::now_ms();
            let lines: Vec<String> = history
                .top(3)
                .iter()
                .map(|r| {
                    format!(
                        "{} tokens, {:.0}s ({})",
                        r.score,
                        r.duration_secs,
                        history::format_relative(r.timestamp, now)
                    )
                })
                .collect();
            el.set_text_content(Some(&lines.join(" | ")));
        }
        if let Some(el) = document.get_element_by_id("game-over") {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_game_over() {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-over"))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Moxie Mining starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element on the page");
            return;
        };

        let seed = platform::time_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));

        match CanvasRenderer::new(canvas.clone()) {
            Some(renderer) => game.borrow_mut().renderer = Some(renderer),
            None => log::error!("Canvas 2D context unavailable"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_pause_menu(game.clone());
        setup_auto_pause(game.clone());
        setup_lifecycle(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Moxie Mining running!");
    }

    fn canvas_x(canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        client_x as f32 - rect.left() as f32
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let css_x = canvas_x(&canvas_clone, event.client_x());
                let field_x = match &g.renderer {
                    Some(r) => r.screen_to_field_x(css_x),
                    None => css_x,
                };
                g.session.pointer_moved(field_x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let css_x = canvas_x(&canvas_clone, touch.client_x());
                    let field_x = match &g.renderer {
                        Some(r) => r.screen_to_field_x(css_x),
                        None => css_x,
                    };
                    g.session.pointer_moved(field_x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.session.toggle_pause(),
                    "Enter" | "r" | "R" if g.session.phase() == GamePhase::GameOver => {
                        g.restart();
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "q" | "Q" => {
                        let next = g.settings.quality.next();
                        g.settings.apply_preset(next);
                        g.settings.save();
                        log::info!("Quality: {}", next.as_str());
                    }
                    "m" | "M" => {
                        g.settings.reduced_motion = !g.settings.reduced_motion;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                    renderer.resize();
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Resume button
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.toggle_pause(); // Toggle back to playing
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.pause_on_blur {
                        g.session.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                let mut g = game.borrow_mut();
                if g.settings.pause_on_blur {
                    g.session.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop the frame loop when the page goes away, resume when it comes back
    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().running = false;
                log::info!("Frame loop stopped (page hidden)");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let resumed = {
                    let mut g = game.borrow_mut();
                    let was_stopped = !g.running;
                    g.running = true;
                    g.last_time = 0.0;
                    was_stopped
                };
                if resumed {
                    request_animation_frame(game.clone());
                    log::info!("Frame loop resumed");
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Moxie Mining (native) starting...");
    log::info!("Native mode runs a headless bot session - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(moxie_mining::platform::time_seed);

    let tuning = match std::env::args().nth(2) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => moxie_mining::Tuning::default(),
    };

    let summary = headless::run(seed, tuning, headless::MAX_SECONDS);
    println!(
        "seed {}: score {}, health {}, speed x{:.1}, survived {:.1}s{}",
        seed,
        summary.score,
        summary.health,
        summary.speed,
        summary.seconds,
        if summary.game_over { "" } else { " (time limit)" }
    );
}

/// Read a tuning JSON file (missing fields keep their defaults)
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<moxie_mining::Tuning, String> {
    let json =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let tuning = moxie_mining::Tuning::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    log::info!("Loaded tuning from {}", path);
    Ok(tuning)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use moxie_mining::consts::*;
    use moxie_mining::{Session, Tuning};
    use moxie_mining::sim::frame::RenderableFrame;
    use moxie_mining::sim::{EntityKind, GameEvent};

    /// Longest headless run (simulated seconds)
    pub const MAX_SECONDS: f32 = 600.0;

    pub struct Summary {
        pub score: u64,
        pub health: u8,
        pub speed: f32,
        pub seconds: f64,
        pub game_over: bool,
    }

    /// Play one session with a simple dodging bot
    pub fn run(seed: u64, tuning: Tuning, max_seconds: f32) -> Summary {
        let mut session = Session::with_tuning(seed, tuning);
        let frames = (max_seconds / SIM_DT) as u32;
        let mut frame = session.advance(SIM_DT);

        for _ in 0..frames {
            if frame.is_over() {
                break;
            }
            if let Some(x) = choose_target(&frame) {
                session.pointer_moved(x);
            }
            frame = session.advance(SIM_DT);
            for event in &frame.events {
                if let GameEvent::DifficultyIncreased { speed, size } = event {
                    log::info!("t={:.0}s speed x{:.1} size x{:.1}", session.state().clock_ms / 1000.0, speed, size);
                }
            }
        }

        let state = session.state();
        Summary {
            score: state.score,
            health: state.health,
            speed: state.speed,
            seconds: state.clock_ms / 1000.0,
            game_over: state.is_over(),
        }
    }

    /// Pick the column that is nearest a reward and clear of low obstacles
    fn choose_target(frame: &RenderableFrame) -> Option<f32> {
        let width = frame.player.width();
        let danger_line = frame.player.min.y - 120.0;
        let current = frame.player.center().x;

        let mut best: Option<(f32, f32)> = None;
        let mut x = width / 2.0;
        while x <= FIELD_WIDTH - width / 2.0 {
            let left = x - width / 2.0 - 4.0;
            let right = x + width / 2.0 + 4.0;
            let blocked = frame.entities.iter().any(|e| {
                e.kind != EntityKind::Reward
                    && e.pos.y + ENTITY_SIZE > danger_line
                    && e.pos.x < right
                    && e.pos.x + ENTITY_SIZE > left
            });
            if !blocked {
                let reward_pull = frame
                    .entities
                    .iter()
                    .filter(|e| e.kind == EntityKind::Reward)
                    .map(|e| (e.pos.x + ENTITY_SIZE / 2.0 - x).abs() - e.pos.y)
                    .fold(f32::MAX, f32::min);
                let cost = reward_pull.min(FIELD_WIDTH) + (x - current).abs() * 0.5;
                if best.is_none_or(|(c, _)| cost < c) {
                    best = Some((cost, x));
                }
            }
            x += 10.0;
        }
        best.map(|(_, x)| x)
    }

}
