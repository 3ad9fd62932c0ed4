//! Star Hop entry point
//!
//! The web build runs the game in a canvas; the native build runs a headless
//! autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use star_hop::consts::*;
    use star_hop::platform::{FixedStep, InputState, Key};
    use star_hop::renderer::{RenderState, build_scene};
    use star_hop::sim::{GamePhase, GameState, tick};
    use star_hop::{AppError, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        step: FixedStep,
        last_time: f64,
        input: InputState,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::new(seed, tuning),
                render_state: None,
                step: FixedStep::default(),
                last_time: 0.0,
                input: InputState::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.step.advance(dt) {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input);
                if !self.state.is_running() {
                    break;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let (vertices, clear) = build_scene(&self.state);
                match render_state.render(&vertices, clear) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
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
            let phase = self.state.phase;
            let score = self.state.session.score.to_string();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&score));
            }
            set_visible(document, "hud", phase == GamePhase::Playing);
            set_visible(document, "main-menu", phase == GamePhase::MainMenu);
            set_visible(document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&score));
                }
            }
            set_visible(document, "idle-badge", self.input.idle_mode());
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Gameplay overrides from the page, if any
    fn load_tuning(document: &Document) -> Result<Tuning, AppError> {
        match document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        {
            Some(json) if !json.trim().is_empty() => Ok(Tuning::from_json(&json)?),
            _ => Ok(Tuning::default()),
        }
    }

    pub async fn run() -> Result<(), AppError> {
        log::info!("Star Hop starting...");

        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoWindow)?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(AppError::CanvasMissing("canvas"))?;

        // Backing store at device resolution; the scene is laid out in logical pixels
        let dpr = window.device_pixel_ratio();
        let width = (SCREEN_WIDTH as f64 * dpr) as u32;
        let height = (SCREEN_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = load_tuning(&document).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning overrides: {e}");
            Tuning::default()
        });

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        // Start game loop
        request_animation_frame(game, canvas);

        log::info!("Star Hop running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom(&event.key()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                if matches!(key, Key::Left | Key::Right | Key::Jump) {
                    event.prevent_default();
                }
                if event.repeat() && key == Key::ToggleIdle {
                    return;
                }
                game.borrow_mut().input.key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page closed or navigated away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.request_quit();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.input.request_pause();
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
                g.input.release_all();
                if g.state.phase == GamePhase::Playing {
                    g.input.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, time: f64) {
        let document = web_sys::window().and_then(|w| w.document());
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);

            if !g.state.is_running() {
                let _ = canvas.class_list().add_1("hidden");
                if let Some(document) = &document {
                    for id in ["hud", "main-menu", "game-over"] {
                        set_visible(document, id, false);
                    }
                    set_visible(document, "goodbye", true);
                }
                log::info!("Star Hop stopped");
                return;
            }

            g.render();
            if let Some(document) = &document {
                g.update_hud(document);
            }
        }

        request_animation_frame(game, canvas);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Star Hop failed to start: {e}");
    }
}

/// Ticks the headless run lasts at most (30 seconds of play)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_TICKS: u64 = 60 * 30;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use star_hop::Tuning;
    use star_hop::consts::TARGET_FPS;
    use star_hop::platform::FrameLimiter;
    use star_hop::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Hop (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    log::info!("Seed: {}", seed);

    let mut state = GameState::new(seed, Tuning::default());
    let mut limiter = FrameLimiter::new(TARGET_FPS);

    let start = TickInput {
        confirm: true,
        idle_mode: true,
        ..Default::default()
    };
    tick(&mut state, &start);

    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let report_every = u64::from(TARGET_FPS) * 5;
    for n in 1..HEADLESS_TICKS {
        tick(&mut state, &autopilot);
        if state.phase != GamePhase::Playing {
            break;
        }
        if n % report_every == 0 {
            log::info!(
                "t={}s score={} platforms={}",
                n / u64::from(TARGET_FPS),
                state.session.score,
                state.session.platforms.len()
            );
        }
        limiter.wait();
    }

    log::info!(
        "Finished in {} with score {} (seed {})",
        state.phase.as_str(),
        state.session.score,
        state.session.seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
