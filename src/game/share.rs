//! Text rendering of a session: history rows and the share block

use super::catalog::SongCatalog;
use super::state::{AttemptRecord, Outcome, SessionSnapshot, SessionStatus};

/// Slot not used (yet)
pub const GLYPH_UNUSED: &str = "⬜";
pub const GLYPH_INCORRECT: &str = "🟥";
pub const GLYPH_PARTIAL: &str = "🟨";
pub const GLYPH_SKIPPED: &str = "⬛";
pub const GLYPH_CORRECT: &str = "🟩";

pub fn outcome_glyph(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => GLYPH_CORRECT,
        Outcome::PartialArtist => GLYPH_PARTIAL,
        Outcome::Incorrect => GLYPH_INCORRECT,
        Outcome::Skipped => GLYPH_SKIPPED,
    }
}

/// Label shown after each history row
pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "correct!",
        Outcome::PartialArtist => "artist",
        Outcome::Incorrect => "wrong",
        Outcome::Skipped => "skipped",
    }
}

/// "2 - Circles - Post Malone (wrong)"
pub fn history_line(record: &AttemptRecord, catalog: &SongCatalog) -> String {
    let guess = match record.outcome {
        Outcome::Skipped => record.guess.clone(),
        _ => catalog.canonical(&record.guess),
    };
    format!(
        "{} - {} ({})",
        record.ordinal,
        guess,
        outcome_label(record.outcome)
    )
}

/// One glyph per attempt slot, padded with unused slots
pub fn result_blocks(history: &[AttemptRecord], max_attempts: u32) -> String {
    let slots = (max_attempts as usize).max(history.len());
    (0..slots)
        .map(|i| history.get(i).map_or(GLYPH_UNUSED, |r| outcome_glyph(r.outcome)))
        .collect()
}

/// Clipboard text for a session
pub fn share_text(snapshot: &SessionSnapshot, max_attempts: u32) -> String {
    let score = match snapshot.status {
        SessionStatus::Won => snapshot.history.len().to_string(),
        SessionStatus::Lost => "X".to_string(),
        SessionStatus::InProgress => "?".to_string(),
    };
    format!(
        "Heardle-like {} {}/{}\n🔊{}",
        snapshot.puzzle_id,
        score,
        max_attempts,
        result_blocks(&snapshot.history, max_attempts)
    )
}
