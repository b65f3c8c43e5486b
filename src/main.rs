//! Binary Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use binary_blaster::audio::WebAudio;
    use binary_blaster::sim::{GamePhase, InputMode, TickInput};
    use binary_blaster::{AssetContext, Session, Settings};

    // Drawing is done by the page; it receives one frame view per rAF
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (window.binaryBlasterRender) {
                window.binaryBlasterRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding the session and per-frame input
    pub struct Game {
        session: Session,
        settings: Settings,
        input: TickInput,
        last_time: f64,
        /// CSS pixels -> field units
        scale_x: f32,
        last_choices: Vec<String>,
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Run `f` against the live game, if any
    pub fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let game = GAME.with(|g| g.borrow().clone())?;
        let mut g = game.borrow_mut();
        Some(f(&mut g))
    }

    fn new_session(settings: &Settings) -> Session {
        let audio = WebAudio::new(settings);
        let seed = js_sys::Date::now() as u64;
        Session::start(
            settings.session_config(),
            AssetContext::new(Box::new(audio)),
            seed,
        )
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            Self {
                session: new_session(&settings),
                settings,
                input: TickInput::default(),
                last_time: 0.0,
                scale_x: 1.0,
                last_choices: Vec::new(),
            }
        }

        /// Replace the running session (settings changed or new game)
        pub fn restart_with(&mut self, settings: Settings) {
            let old = std::mem::replace(&mut self.session, new_session(&settings));
            if let Some(score) = old.end() {
                log::info!("Previous run ended with {}", score);
            }
            self.settings = settings;
            self.input = TickInput::default();
            self.last_choices.clear();
        }

        pub fn session(&mut self) -> &mut Session {
            &mut self.session
        }

        fn set_pointer_x(&mut self, css_x: f32) {
            self.input.target_x = Some(css_x * self.scale_x);
        }

        fn update(&mut self, dt: f32) {
            let input = self.input.clone();
            self.session.frame(&input, dt);
            // One-shot inputs
            self.input.pause = false;
        }

        fn render(&self) {
            match serde_json::to_string(&self.session.frame_view()) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Frame serialization failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = document() else { return };
            let t = self.session.telemetry();

            set_text(&document, "#hud-score .hud-value", &t.score.to_string());
            set_text(&document, "#hud-lives .hud-value", &t.lives.to_string());
            set_text(&document, "#hud-streak .hud-value", &t.streak.to_string());
            set_text(&document, "#hud-wave .hud-value", &(t.wave + 1).to_string());
            set_text(
                &document,
                "#hud-timer .hud-value",
                &format!("{:.0}%", t.wave_fraction * 100.0),
            );
            set_text(
                &document,
                "#hud-progress .hud-value",
                &format!("{}%", t.level_progress),
            );
            set_text(&document, "#hud-mode", t.mode.title());

            let label = t.target.as_ref().map(|x| x.label.as_str()).unwrap_or("");
            set_text(&document, "#problem", label);

            // Choice buttons are only rewritten when the set changes
            if t.choices != self.last_choices {
                for i in 0..binary_blaster::consts::CHOICE_COUNT {
                    let id = format!("choice-{}", i);
                    match t.choices.get(i) {
                        Some(choice) => {
                            set_text(&document, &format!("#{}", id), choice);
                            set_hidden(&document, &id, false);
                        }
                        None => set_hidden(&document, &id, true),
                    }
                }
                self.last_choices = t.choices.clone();
            }
            set_hidden(
                &document,
                "answer-form",
                t.input_mode != InputMode::NumericInput,
            );

            if let Some(log_el) = document.get_element_by_id("learning-log") {
                let html: String = t
                    .learning_log
                    .iter()
                    .map(|e| format!("<li>{} = {}</li>", e.problem, e.answer))
                    .collect();
                log_el.set_inner_html(&html);
            }

            set_hidden(&document, "pause-menu", t.phase != GamePhase::Paused);
            set_hidden(&document, "wave-banner", t.phase != GamePhase::WaveComplete);
            set_hidden(&document, "game-over", t.phase != GamePhase::GameOver);
            if let Some(score) = t.final_score {
                set_text(&document, "#final-score", &score.to_string());
                set_text(&document, "#final-wave", &(t.wave + 1).to_string());
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Binary Blaster starting...");

        let document = document().ok_or("no document")?;
        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::default();
        canvas.set_width(settings.field_width as u32);
        canvas.set_height(settings.field_height as u32);

        let game = Rc::new(RefCell::new(Game::new(settings)));
        GAME.with(|g| *g.borrow_mut() = Some(game.clone()));

        setup_input_handlers(&canvas, game.clone());
        setup_answer_controls(&document, game.clone());
        setup_auto_pause(&document, game.clone());
        set_hidden(&document, "hud", false);

        request_animation_frame(game);
        log::info!("Binary Blaster running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let w = canvas_clone.client_width().max(1) as f32;
                g.scale_x = g.settings.field_width / w;
                g.set_pointer_x(event.offset_x() as f32);
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
                    let w = canvas_clone.client_width().max(1) as f32;
                    g.scale_x = g.settings.field_width / w;
                    let rect = canvas_clone.get_bounding_client_rect();
                    g.set_pointer_x(touch.client_x() as f32 - rect.left() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "1" | "2" | "3" | "4" if g.session.state().input_mode == InputMode::MultipleChoice => {
                        let index = event.key().parse::<usize>().unwrap_or(1) - 1;
                        if let Some(choice) = g.last_choices.get(index).cloned() {
                            g.session.submit_current(choice);
                        }
                    }
                    "F2" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_answer_controls(document: &Document, game: Rc<RefCell<Game>>) {
        // Multiple-choice buttons submit their own label
        for i in 0..binary_blaster::consts::CHOICE_COUNT {
            let Some(btn) = document.get_element_by_id(&format!("choice-{}", i)) else {
                continue;
            };
            let game = game.clone();
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(answer) = btn_clone.text_content() {
                    game.borrow_mut().session.submit_current(answer);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Free-text answer on Enter
        if let Some(input) = document
            .get_element_by_id("answer-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let game = game.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    let answer = input_clone.value();
                    if !answer.trim().is_empty() {
                        game.borrow_mut().session.submit_current(answer);
                    }
                    input_clone.set_value("");
                }
            });
            let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().session.restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.session.phase() == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // rAF time is in milliseconds
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Submit an answer for the current target. Returns false when nothing is targeted.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn submit_answer(answer: String) -> bool {
    wasm_game::with_game(|g| g.session().submit_current(answer)).unwrap_or(false)
}

/// Switch between "multiple-choice" and "numeric-input"
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_input_mode(mode: &str) -> Result<(), JsValue> {
    let mode: binary_blaster::sim::InputMode = serde_json::from_value(serde_json::Value::from(mode))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    wasm_game::with_game(|g| g.session().set_input_mode(mode));
    Ok(())
}

/// Start a new session from settings JSON (defaults for missing fields)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_session(settings_json: Option<String>) {
    let settings = binary_blaster::Settings::load_or_default(settings_json.as_deref());
    wasm_game::with_game(|g| g.restart_with(settings));
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn telemetry_json() -> String {
    wasm_game::with_game(|g| serde_json::to_string(&g.session().telemetry()).ok())
        .flatten()
        .unwrap_or_default()
}

/// Practice arena: convert `input` between radixes named like "bin" or "16"
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn convert_numeral(input: &str, from: &str, to: &str) -> Result<String, JsValue> {
    binary_blaster::sim::convert_named(input, from, to).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Headless demo: autopilot plays a few waves and reports telemetry
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use binary_blaster::sim::{GamePhase, TickInput};
    use binary_blaster::{AssetContext, Session, Settings};

    env_logger::init();
    log::info!("Binary Blaster (native) starting...");

    let mut args = std::env::args().skip(1).peekable();

    // `convert <input> <from> <to>`: practice arena on the command line
    if args.peek().map(String::as_str) == Some("convert") {
        let rest: Vec<String> = args.skip(1).collect();
        let [input, from, to] = rest.as_slice() else {
            eprintln!("usage: binary-blaster convert <input> <from> <to>");
            std::process::exit(2);
        };
        match binary_blaster::sim::convert_named(input, from, to) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let settings_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            None
        }
    });
    let settings = Settings::load_or_default(settings_json.as_deref());

    let mut session = Session::start(settings.session_config(), AssetContext::silent(), seed);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    // Three minutes at 60 fps
    for frame in 0..60 * 180 {
        for event in session.frame(&input, 1.0 / 60.0) {
            log::debug!("frame {}: {:?}", frame, event);
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    match serde_json::to_string_pretty(&session.telemetry()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Telemetry serialization failed: {}", e),
    }
    session.end();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
