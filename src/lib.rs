//! Heardle-like - a daily song-guessing puzzle
//!
//! Core modules:
//! - `game`: Puzzle logic (session state machine, reveal ladder, scoring)
//! - `persistence`: Versioned save/load keyed by puzzle
//! - `settings`: Ladder preset and rules
//! - `app`: Session, scoring, playback clamp and storage wired together
//! - `platform`: Browser collaborators (wasm32 only)

pub mod app;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;

pub use app::PuzzleApp;
pub use settings::{LadderPreset, Settings};

/// Page configuration constants
pub mod consts {
    /// Server endpoint that judges guesses
    pub const VALIDATION_ENDPOINT: &str = "/guess";
    /// Autocomplete entries shown under the guess box
    pub const SUGGESTION_LIMIT: usize = 8;
}
