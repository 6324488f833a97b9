//! Heardle-like entry point
//!
//! On the web: wires the puzzle page (player, buttons, guess form) to the
//! game. Natively: a terminal version of today's puzzle without audio.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement};

    use heardle_like::consts::{SUGGESTION_LIMIT, VALIDATION_ENDPOINT};
    use heardle_like::game::{
        GuessError, LossReason, Outcome, PuzzleIdentity, SessionStatus, SongCatalog,
        progress_fraction,
    };
    use heardle_like::persistence::{KeyValueStore, MemoryStore};
    use heardle_like::platform::storage::LocalStore;
    use heardle_like::platform::widget::WidgetPlayback;
    use heardle_like::platform::{clipboard, fetch};
    use heardle_like::{PuzzleApp, Settings};

    type Game = PuzzleApp<Box<dyn KeyValueStore>, WidgetPlayback>;

    fn input_value(document: &Document, id: &str) -> Option<String> {
        document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_width(document: &Document, id: &str, fraction: f64) {
        set_style(document, id, "width", &format!("{}%", fraction * 100.0));
    }

    fn set_guess_enabled(document: &Document, enabled: bool) {
        if let Some(input) = document
            .get_element_by_id("guess-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_disabled(!enabled);
        }
    }

    /// Stage boundaries on the progress bar
    fn create_markers(document: &Document, fractions: &[f64]) {
        let Some(container) = document.get_element_by_id("markers-container") else {
            return;
        };
        for fraction in fractions {
            if let Ok(marker) = document.create_element("div") {
                marker.set_class_name("slice-marker");
                let _ = marker.set_attribute("style", &format!("left: {}%", fraction * 100.0));
                let _ = container.append_child(&marker);
            }
        }
    }

    fn render_suggestions(document: &Document, catalog: &SongCatalog, partial: &str) {
        let Some(list) = document.get_element_by_id("song-suggestions") else {
            return;
        };
        list.set_inner_html("");
        for entry in catalog.suggest(partial, SUGGESTION_LIMIT) {
            if let Ok(option) = document.create_element("option") {
                let _ = option.set_attribute("value", &entry.answer);
                option.set_text_content(Some(&entry.artist));
                let _ = list.append_child(&option);
            }
        }
    }

    fn outcome_message(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Correct => "Correct! Well done.",
            Outcome::PartialArtist => "Right artist, wrong song!",
            Outcome::Incorrect => "Wrong guess!",
            Outcome::Skipped => "You skipped!",
        }
    }

    fn final_message(game: &Game, answer: &str) -> String {
        match (game.session().status(), game.session().loss_reason()) {
            (SessionStatus::Won, _) => "Correct! Well done.".to_string(),
            (_, Some(LossReason::LadderExhausted)) => {
                format!("No more slices! The correct answer was \"{answer}\".")
            }
            _ => format!("Out of attempts! The correct answer was \"{answer}\"."),
        }
    }

    /// Redraw everything derived from the session
    fn render(game: &Game, document: &Document, answer: &str) {
        set_width(document, "unlocked-bar", game.unlocked_fraction());

        if let Some(history) = document.get_element_by_id("guess-history") {
            history.set_inner_html("");
            for line in game.history_lines() {
                if let Ok(row) = document.create_element("p") {
                    row.set_text_content(Some(&line));
                    let _ = history.append_child(&row);
                }
            }
        }

        if game.session().is_finished() {
            show_finished(game, document, answer);
        }
    }

    /// Terminal state: hide the controls, reveal the full player, offer sharing
    fn show_finished(game: &Game, document: &Document, answer: &str) {
        set_text(
            document,
            "feedback",
            &format!("{} Game over!", final_message(game, answer)),
        );
        for id in ["play-button", "skip-button", "guess-form"] {
            set_style(document, id, "display", "none");
        }
        set_style(document, "sc-player", "display", "block");

        if document.get_element_by_id("share-button").is_some() {
            return;
        }
        let (Some(feedback), Ok(button)) = (
            document.get_element_by_id("feedback"),
            document.create_element("button"),
        ) else {
            return;
        };
        button.set_id("share-button");
        button.set_text_content(Some("Share result"));

        let text = game.share_text();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let text = text.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let message = if clipboard::copy_text(&text).await {
                    "Copied to clipboard!"
                } else {
                    "Failed to copy."
                };
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(message);
                }
            });
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();

        if let Ok(br) = document.create_element("br") {
            let _ = feedback.append_child(&br);
        }
        let _ = feedback.append_child(&button);
    }

    fn show_result(
        game: &Rc<RefCell<Game>>,
        document: &Document,
        answer: &str,
        result: Result<Outcome, GuessError>,
    ) {
        let g = game.borrow();
        match result {
            Ok(outcome) => set_text(document, "feedback", outcome_message(outcome)),
            Err(err) => set_text(document, "feedback", &err.to_string()),
        }
        set_guess_enabled(document, !g.is_awaiting());
        render(&g, document, answer);
    }

    fn setup_controls(game: Rc<RefCell<Game>>, document: &Document, answer: Rc<str>) {
        // Play button
        if let Some(btn) = document.get_element_by_id("play-button") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if !g.session().is_finished() {
                    g.play();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Skip button
        if let Some(btn) = document.get_element_by_id("skip-button") {
            let game = game.clone();
            let document = document.clone();
            let answer = answer.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let result = game.borrow_mut().submit_skip();
                show_result(&game, &document, &answer, result);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Autocomplete
        if let Some(input) = document.get_element_by_id("guess-input") {
            let game = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let partial = input_value(&document, "guess-input").unwrap_or_default();
                render_suggestions(&document, game.borrow().catalog(), &partial);
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Guess form
        if let Some(form) = document.get_element_by_id("guess-form") {
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let raw = input_value(&document, "guess-input").unwrap_or_default();
                let request = match game.borrow_mut().begin_guess(&raw) {
                    Ok(request) => request,
                    Err(err) => {
                        set_text(&document, "feedback", &err.to_string());
                        return;
                    }
                };

                set_guess_enabled(&document, false);
                set_text(&document, "feedback", "Checking...");
                if let Some(input) = document
                    .get_element_by_id("guess-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value("");
                }

                let game = game.clone();
                let document = document.clone();
                let answer = answer.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let verdict = fetch::validate(VALIDATION_ENDPOINT, &request).await;
                    let result = game.borrow_mut().resolve_guess(request, verdict);
                    show_result(&game, &document, &answer, result);
                });
            });
            let _ =
                form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Heardle-like starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable - progress will not be saved");
                Box::new(MemoryStore::new())
            }
        };

        let mut settings = Settings::load(&store);
        if let Err(err) = settings.ladder() {
            log::warn!("Stored ladder rejected ({err}), using defaults");
            settings = Settings::default();
        }

        let answer = input_value(&document, "correct-answer")
            .unwrap_or_default()
            .trim()
            .to_string();
        let catalog = document
            .get_element_by_id("song-catalog")
            .and_then(|el| el.text_content())
            .and_then(|json| match serde_json::from_str::<SongCatalog>(&json) {
                Ok(catalog) => Some(catalog),
                Err(err) => {
                    log::warn!("Song catalog unreadable: {err}");
                    None
                }
            })
            .unwrap_or_default();
        let puzzle = input_value(&document, "puzzle-id")
            .filter(|id| !id.trim().is_empty())
            .map(PuzzleIdentity::custom)
            .unwrap_or_else(|| PuzzleIdentity::from_unix_ms(js_sys::Date::now()));

        let playback = WidgetPlayback::attach("sc-player");
        let mut game = match Game::start(&puzzle, &answer, &settings, catalog, store, playback) {
            Ok(game) => game,
            Err(err) => {
                log::error!("Cannot start puzzle {puzzle}: {err}");
                return;
            }
        };
        if let Some(track) = input_value(&document, "track-url").filter(|t| !t.is_empty()) {
            game.load_track(&track);
        }

        let ladder = game.session().ladder().clone();
        create_markers(&document, &ladder.marker_fractions());

        let game = Rc::new(RefCell::new(game));
        let answer: Rc<str> = Rc::from(answer);

        // Playback progress: move the bar, enforce the listen limit
        {
            let game_ref = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(f64)>::new(move |position_ms: f64| {
                set_width(&document, "current-bar", progress_fraction(&ladder, position_ms));
                game_ref.borrow_mut().on_playback_position(position_ms);
            });
            game.borrow().reveal().playback().on_progress(closure);
        }

        render(&game.borrow(), &document, &answer);
        setup_controls(game, &document, answer);

        log::info!("Puzzle {puzzle} ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Heardle-like (native) starting...");

    if let Err(err) = terminal::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::error::Error;
    use std::io::{self, BufRead, Write};
    use std::time::{SystemTime, UNIX_EPOCH};

    use heardle_like::game::{
        CatalogEntry, LossReason, Outcome, PuzzleIdentity, SessionStatus, SilentPlayback,
        SongCatalog, day_number, pick_track,
    };
    use heardle_like::persistence::MemoryStore;
    use heardle_like::{PuzzleApp, Settings};

    fn demo_catalog() -> SongCatalog {
        SongCatalog::new(vec![
            CatalogEntry::new("Circles", "Post Malone"),
            CatalogEntry::new("Sunflower", "Post Malone"),
            CatalogEntry::new("Mozart's House", "Clean Bandit"),
            CatalogEntry::new("Rather Be", "Clean Bandit"),
            CatalogEntry::new("Levitating", "Dua Lipa"),
            CatalogEntry::new("Don't Start Now", "Dua Lipa"),
            CatalogEntry::new("Blinding Lights", "The Weeknd"),
            CatalogEntry::new("Save Your Tears", "The Weeknd"),
        ])
    }

    /// Play today's puzzle on stdin/stdout
    pub fn run() -> Result<(), Box<dyn Error>> {
        let now_ms = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as f64;
        let day = day_number(now_ms);
        let catalog = demo_catalog();
        let answer = pick_track(day, catalog.len())
            .and_then(|i| catalog.get(i))
            .map(|entry| entry.answer.clone())
            .ok_or("song catalog is empty")?;

        let settings = Settings::default();
        let mut app = PuzzleApp::start(
            &PuzzleIdentity::for_day(day),
            &answer,
            &settings,
            catalog.clone(),
            MemoryStore::new(),
            SilentPlayback,
        )?;

        println!("Guess the song! Type a title, /skip to skip, /quit to stop.");
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        while !app.session().is_finished() {
            print!(
                "[{}s unlocked, {} attempts left] > ",
                app.session().unlocked_seconds(),
                app.session().attempts_remaining()
            );
            io::stdout().flush()?;

            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let result = match line.trim() {
                "/quit" => break,
                "/skip" => app.submit_skip(),
                guess => app.submit_guess(&catalog, guess),
            };
            match result {
                Ok(Outcome::Correct) => println!("Correct! Well done."),
                Ok(Outcome::PartialArtist) => println!("Right artist, wrong song!"),
                Ok(Outcome::Incorrect) => println!("Wrong guess!"),
                Ok(Outcome::Skipped) => println!("You skipped!"),
                Err(err) => println!("{err}"),
            }
        }

        for line in app.history_lines() {
            println!("{line}");
        }
        match (app.session().status(), app.session().loss_reason()) {
            (SessionStatus::InProgress, _) => return Ok(()),
            (SessionStatus::Won, _) => {}
            (_, Some(LossReason::LadderExhausted)) => {
                println!("No more slices! The correct answer was \"{answer}\".")
            }
            _ => println!("Out of attempts! The correct answer was \"{answer}\"."),
        }
        println!("\n{}", app.share_text());
        Ok(())
    }
}
