//! Stored session layout
//!
//! Field names match what earlier versions of the page wrote, so sessions
//! started before an upgrade still resume. Missing fields take defaults.

use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::game::{AttemptRecord, Outcome, SessionSnapshot, SessionStatus};

/// Layout version written by this build
pub const CURRENT_VERSION: u32 = 2;

/// Records without a version field predate versioning
fn legacy_version() -> u32 {
    1
}

/// One row of `guessHistory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistedAttempt {
    pub attempt: i64,
    pub guess: String,
    pub status: String,
}

/// Session as stored under its puzzle key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedRecord {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_id: Option<String>,
    pub stage_index: i64,
    pub unlocked_duration: f64,
    pub game_over: bool,
    pub game_won: bool,
    pub attempt_number: i64,
    pub guess_history: Vec<PersistedAttempt>,
}

/// Status string stored for an outcome
pub fn status_string(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "correct!",
        Outcome::PartialArtist => "artist",
        Outcome::Incorrect => "wrong",
        Outcome::Skipped => "skipped",
    }
}

/// Outcome for a stored status string.
///
/// Version 1 stored skips as `"wrong"` with the text `"Skipped"`; typed
/// guesses were always lower-cased, so the capitalized text identifies a skip.
pub fn parse_status(status: &str, guess: &str, version: u32) -> Outcome {
    match status {
        "correct!" | "correct" => Outcome::Correct,
        "artist" => Outcome::PartialArtist,
        "skipped" => Outcome::Skipped,
        "wrong" if version < 2 && guess == crate::game::SKIP_TEXT => Outcome::Skipped,
        _ => Outcome::Incorrect,
    }
}

impl PersistedRecord {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            version: CURRENT_VERSION,
            puzzle_id: Some(snapshot.puzzle_id.clone()),
            stage_index: snapshot.stage_index as i64,
            unlocked_duration: snapshot.unlocked_seconds,
            game_over: snapshot.status.is_terminal(),
            game_won: snapshot.status == SessionStatus::Won,
            attempt_number: i64::from(snapshot.attempt_count),
            guess_history: snapshot
                .history
                .iter()
                .map(|r| PersistedAttempt {
                    attempt: i64::from(r.ordinal),
                    guess: r.guess.clone(),
                    status: status_string(r.outcome).to_string(),
                })
                .collect(),
        }
    }

    /// Convert back to a snapshot for `puzzle_id`.
    ///
    /// History rows are ordered by attempt number. Rows that are zero,
    /// repeated, past `max_attempts`, out of sequence or after the winning
    /// guess are dropped, and the attempt count is re-derived from what
    /// remains.
    pub fn into_snapshot(
        self,
        puzzle_id: &str,
        max_attempts: u32,
    ) -> Result<SessionSnapshot, PersistenceError> {
        if self.version > CURRENT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(self.version));
        }
        if let Some(stored) = &self.puzzle_id {
            if stored != puzzle_id {
                log::warn!("Stored record for {stored} found under key for {puzzle_id}");
            }
        }

        let version = self.version;
        let mut rows = self.guess_history;
        rows.sort_by_key(|r| r.attempt);

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            let expected = history.len() as i64 + 1;
            if row.attempt != expected || expected > i64::from(max_attempts) {
                log::warn!(
                    "Dropping stored attempt {} for {puzzle_id} (expected {expected})",
                    row.attempt
                );
                continue;
            }
            let outcome = parse_status(&row.status, &row.guess, version);
            history.push(AttemptRecord {
                ordinal: expected as u32,
                guess: row.guess,
                outcome,
            });
            if outcome.is_correct() {
                break;
            }
        }

        let attempt_count = history.len() as u32 + 1;
        if self.attempt_number != i64::from(attempt_count) {
            log::debug!(
                "Stored attempt number {} disagrees with history, using {attempt_count}",
                self.attempt_number
            );
        }

        let status = if self.game_won {
            SessionStatus::Won
        } else if self.game_over {
            SessionStatus::Lost
        } else {
            SessionStatus::InProgress
        };

        Ok(SessionSnapshot {
            puzzle_id: puzzle_id.to_string(),
            stage_index: self.stage_index.max(0) as usize,
            unlocked_seconds: self.unlocked_duration,
            attempt_count,
            status,
            history,
        })
    }
}
