//! Gyro Serpent entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, HtmlCanvasElement, MouseEvent, TouchEvent};

    use gyro_serpent::BestScore;
    use gyro_serpent::consts::*;
    use gyro_serpent::control::{GameControl, SensorOutcome};
    use gyro_serpent::input::{InputSource, Tilt};
    use gyro_serpent::platform::{EventSubscription, now_ms};
    use gyro_serpent::render::Renderer;
    use gyro_serpent::sim::{GamePhase, GameState, HudSnapshot, TickInput, tick};

    // The orientation permission gate only exists on iOS Safari; probe for
    // it instead of assuming either way.
    #[wasm_bindgen(inline_js = "
        export function orientation_permission_gated() {
            return typeof DeviceOrientationEvent !== 'undefined'
                && typeof DeviceOrientationEvent.requestPermission === 'function';
        }
        export function request_orientation_permission() {
            return DeviceOrientationEvent.requestPermission();
        }
    ")]
    extern "C" {
        fn orientation_permission_gated() -> bool;
        #[wasm_bindgen(catch)]
        fn request_orientation_permission() -> Result<js_sys::Promise, JsValue>;
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputSource,
        best: BestScore,
        renderer: Renderer,
        /// One-shot commands latched by UI events until the next substep
        pending: TickInput,
        accumulator: f32,
        last_time: f64,
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Scoped listeners; dropping them is the whole teardown
        subscriptions: Vec<EventSubscription>,
        orientation_sub: Option<EventSubscription>,
        /// Back-reference for async callbacks (permission grant, sensor events)
        self_ref: Weak<RefCell<Game>>,
        disposed: bool,
    }

    impl Game {
        fn new(seed: u64, viewport: Vec2, renderer: Renderer) -> Self {
            let best = BestScore::load();
            let mut state = GameState::new(seed, viewport);
            state.best_tenths = best.tenths();
            Self {
                state,
                input: InputSource::new(),
                best,
                renderer,
                pending: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Intro,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                subscriptions: Vec::new(),
                orientation_sub: None,
                self_ref: Weak::new(),
                disposed: false,
            }
        }

        /// Run simulation substeps for this frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.25);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    target: Some(self.input.target(self.state.viewport)),
                    ..self.pending
                };
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot commands after processing
                self.pending.start = false;
                self.pending.retry = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Persist the best exactly at the Playing -> GameOver transition
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::GameOver && self.best.record(self.state.score_tenths) {
                    log::info!("New session best: {:.1}", self.best.seconds());
                }
                self.last_phase = phase;
            }
        }

        fn render(&self) {
            self.renderer.render(&self.state);
        }

        /// Reflect HUD values and overlays into the DOM, and push the
        /// snapshot to the host shell. Only runs when something changed.
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            // FPS readout refreshes every frame
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }

            if !self.state.hud_dirty {
                return;
            }
            self.state.hud_dirty = false;
            let hud = self.state.hud();

            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{:.1}", hud.score)));
            }
            if let Some(el) = document
                .query_selector("#hud-best .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{:.1}", hud.best_score)));
            }

            // Overlays follow the phase
            set_overlay(&document, "intro", self.state.phase == GamePhase::Intro);
            set_overlay(&document, "game-over", hud.game_over);
            if hud.game_over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&format!("{:.1}", hud.score)));
                }
                if let Some(el) = document.get_element_by_id("final-best") {
                    el.set_text_content(Some(&format!("{:.1}", hud.best_score)));
                }
            }

            push_hud_snapshot(&hud);
        }

        /// Register the deviceorientation listener and mark the sensor live
        fn attach_orientation_listener(&mut self) {
            if self.orientation_sub.is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let game = self.self_ref.clone();
            let sub = EventSubscription::listen(
                &window,
                "deviceorientation",
                move |event: DeviceOrientationEvent| {
                    if let Some(game) = game.upgrade() {
                        // Latest value wins; the frame loop reads it when it runs
                        game.borrow_mut().input.set_tilt(Tilt {
                            beta: event.beta().unwrap_or(0.0) as f32,
                            gamma: event.gamma().unwrap_or(0.0) as f32,
                        });
                    }
                },
            );
            self.orientation_sub = Some(sub);
            self.input.set_sensor_active(true);
        }

        /// Drop every listener and stop the loop. Idempotent.
        fn dispose(&mut self) {
            if self.disposed {
                return;
            }
            self.disposed = true;
            self.input.set_sensor_active(false);
            self.orientation_sub = None;
            // The pagehide listener that triggers dispose lives in this Vec;
            // its closure must not be freed while it is still on the stack,
            // so the drop is deferred past the current event dispatch.
            let subs = std::mem::take(&mut self.subscriptions);
            wasm_bindgen_futures::spawn_local(async move {
                drop(subs);
            });
            log::info!("Gyro Serpent torn down");
        }
    }

    impl GameControl for Game {
        fn reset(&mut self) {
            self.state.reset_round();
        }

        fn set_intro_active(&mut self, active: bool) {
            self.state.set_intro_active(active);
        }

        fn activate_sensor(&mut self) -> SensorOutcome {
            if self.input.sensor_active() {
                return SensorOutcome::Activated;
            }

            if !orientation_permission_gated() {
                // No permission gate on this platform: activate silently.
                // Desktops without a sensor just never deliver samples and
                // the pointer fallback stays in charge.
                self.attach_orientation_listener();
                return SensorOutcome::Activated;
            }

            match request_orientation_permission() {
                Ok(promise) => {
                    let game = self.self_ref.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match wasm_bindgen_futures::JsFuture::from(promise).await {
                            Ok(outcome)
                                if outcome.as_string().as_deref() == Some("granted") =>
                            {
                                if let Some(game) = game.upgrade() {
                                    game.borrow_mut().attach_orientation_listener();
                                    log::info!("Orientation sensor active");
                                }
                            }
                            Ok(_) => {
                                log::warn!("Orientation permission denied, using pointer input");
                            }
                            Err(err) => {
                                log::warn!("Orientation permission request failed: {err:?}");
                            }
                        }
                    });
                    SensorOutcome::Pending
                }
                Err(err) => {
                    log::warn!("Orientation permission API unusable: {err:?}");
                    SensorOutcome::PointerFallback
                }
            }
        }
    }

    fn set_overlay(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "overlay" } else { "overlay hidden" });
        }
    }

    /// Hand the HUD snapshot to the surrounding page as a CustomEvent
    fn push_hud_snapshot(hud: &HudSnapshot) {
        let Ok(json) = serde_json::to_string(hud) else {
            return;
        };
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&JsValue::from_str(&json));
        if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict("serpent-hud", &init) {
            if let Some(window) = web_sys::window() {
                let _ = window.dispatch_event(&event);
            }
        }
    }

    /// Canvas size for the current window: full viewport width on narrow
    /// (mobile) screens, a fixed width on desktop; always full height.
    fn canvas_size(window: &web_sys::Window) -> Vec2 {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DESKTOP_WIDTH as f64) as f32;
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as f32;
        Vec2::new(inner_w.min(DESKTOP_WIDTH), inner_h)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gyro Serpent starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = canvas_size(&window);
        let dpr = window.device_pixel_ratio();

        let mut renderer = Renderer::new(canvas.clone()).expect("2d context");
        renderer.resize(viewport, dpr);
        renderer.load_sprite("assets/serpent-head.png");

        let seed = now_ms() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport, renderer)));
        game.borrow_mut().self_ref = Rc::downgrade(&game);

        log::info!(
            "Session seed {seed}, canvas {}x{}",
            viewport.x as u32,
            viewport.y as u32
        );

        setup_pointer_input(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_keyboard(&window, game.clone());
        setup_resize(&window, game.clone());
        setup_teardown(&window, game.clone());

        request_animation_frame(game);

        log::info!("Gyro Serpent running");
    }

    fn setup_pointer_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let mut subs = Vec::new();

        // Mouse move - absolute position in canvas coordinates
        {
            let game = game.clone();
            subs.push(EventSubscription::listen(
                canvas.as_ref(),
                "mousemove",
                move |event: MouseEvent| {
                    let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                    game.borrow_mut().input.set_pointer(pos);
                },
            ));
        }

        // Touch move - first touch, relative to the canvas box
        {
            let game = game.clone();
            let canvas = canvas.clone();
            subs.push(EventSubscription::listen(
                canvas.clone().as_ref(),
                "touchmove",
                move |event: TouchEvent| {
                    event.prevent_default();
                    if let Some(touch) = event.touches().get(0) {
                        let rect = canvas.get_bounding_client_rect();
                        let pos = Vec2::new(
                            touch.client_x() as f32 - rect.left() as f32,
                            touch.client_y() as f32 - rect.top() as f32,
                        );
                        game.borrow_mut().input.set_pointer(pos);
                    }
                },
            ));
        }

        game.borrow_mut().subscriptions.extend(subs);
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let mut subs = Vec::new();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            subs.push(EventSubscription::listen(
                btn.as_ref(),
                "click",
                move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    // The start gesture is the one moment the permission
                    // prompt is allowed; the result may land frames later.
                    let outcome = g.activate_sensor();
                    log::info!("Sensor activation: {outcome:?}");
                    g.pending.start = true;
                },
            ));
        }

        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let game = game.clone();
            subs.push(EventSubscription::listen(
                btn.as_ref(),
                "click",
                move |_event: MouseEvent| {
                    game.borrow_mut().pending.retry = true;
                },
            ));
        }

        game.borrow_mut().subscriptions.extend(subs);
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let sub = {
            let game = game.clone();
            EventSubscription::listen(
                window.as_ref(),
                "keydown",
                move |event: web_sys::KeyboardEvent| {
                    let mut g = game.borrow_mut();
                    match event.key().as_str() {
                        // Quit to the intro overlay (also empties the field)
                        "Escape" => g.set_intro_active(true),
                        // Debug: restart the current round in place
                        "r" | "R" => g.reset(),
                        _ => {}
                    }
                },
            )
        };
        game.borrow_mut().subscriptions.push(sub);
    }

    fn setup_resize(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let sub = {
            let game = game.clone();
            EventSubscription::listen(window.as_ref(), "resize", move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = canvas_size(&window);
                let dpr = window.device_pixel_ratio();
                let mut g = game.borrow_mut();
                g.state.set_viewport(viewport);
                g.renderer.resize(viewport, dpr);
                log::info!("Resized to {}x{}", viewport.x as u32, viewport.y as u32);
            })
        };
        game.borrow_mut().subscriptions.push(sub);
    }

    fn setup_teardown(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let sub = {
            let game = game.clone();
            EventSubscription::listen(
                window.as_ref(),
                "pagehide",
                move |_event: web_sys::PageTransitionEvent| {
                    game.borrow_mut().dispose();
                },
            )
        };
        game.borrow_mut().subscriptions.push(sub);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.disposed {
                return;
            }

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
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use gyro_serpent::consts::SIM_DT;
    use gyro_serpent::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Gyro Serpent (native) starting...");
    log::info!("Native mode is a headless sanity run - serve the wasm build for the game");

    // Scripted round: start, weave for five seconds, report the score
    let mut state = GameState::new(0xC0FFEE, Vec2::new(800.0, 600.0));
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        SIM_DT,
    );

    let mut steps = 0u32;
    while state.phase == GamePhase::Playing && steps < 300 {
        let t = steps as f32 * SIM_DT;
        let target = Vec2::new(
            400.0 + 250.0 * (t * 1.3).sin(),
            300.0 + 180.0 * (t * 0.9).cos(),
        );
        tick(
            &mut state,
            &TickInput {
                target: Some(target),
                ..Default::default()
            },
            SIM_DT,
        );
        steps += 1;
    }

    match state.phase {
        GamePhase::GameOver => println!(
            "Round over after {:.1}s ({} obstacles on screen)",
            state.score(),
            state.obstacles.len()
        ),
        _ => println!(
            "Survived the scripted run: score {:.1}, {} obstacles dodged or live",
            state.score(),
            state.obstacles.len()
        ),
    }
}
