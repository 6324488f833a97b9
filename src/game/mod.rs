//! Puzzle logic
//!
//! Pure and platform-free:
//! - No DOM, widget or network access (collaborators come in through traits)
//! - All state lives in an explicit `PuzzleSession`
//! - Deterministic daily track pick

pub mod catalog;
pub mod daily;
pub mod evaluate;
pub mod ladder;
pub mod reveal;
pub mod share;
pub mod state;

pub use catalog::{CatalogEntry, SongCatalog};
pub use daily::{PuzzleIdentity, day_number, pick_track};
pub use evaluate::{
    AttemptEvaluator, EvaluationError, GuessError, GuessValidator, SKIP_TEXT, ValidationRequest,
    ValidationResponse, Verdict, normalize_guess,
};
pub use ladder::{LadderError, StageLadder};
pub use reveal::{Playback, RevealController, SilentPlayback, progress_fraction, unlocked_fraction};
pub use share::{history_line, outcome_glyph, share_text};
pub use state::{
    AttemptRecord, LossReason, Outcome, PuzzleSession, SessionError, SessionSnapshot,
    SessionStatus,
};
