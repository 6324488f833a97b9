//! Puzzle session state and its single transition
//!
//! Everything persisted between page loads lives here. The session is only
//! mutated through [`PuzzleSession::record_attempt`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ladder::StageLadder;

/// How a single attempt was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Title matched the answer
    Correct,
    /// Wrong title, but the guess named the right artist
    PartialArtist,
    /// Wrong title
    Incorrect,
    /// Player skipped to the next stage without guessing
    Skipped,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// One consumed attempt. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub ordinal: u32,
    pub guess: String,
    pub outcome: Outcome,
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

/// Which ceiling ended a lost session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    /// Attempt budget used up
    AttemptsExhausted,
    /// No longer clip left to unlock
    LadderExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("puzzle is already finished")]
    Finished,
}

/// Immutable copy of a session for rendering and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub puzzle_id: String,
    pub stage_index: usize,
    pub unlocked_seconds: f64,
    pub attempt_count: u32,
    pub status: SessionStatus,
    pub history: Vec<AttemptRecord>,
}

/// One player's progress through one daily puzzle
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle_id: String,
    ladder: StageLadder,
    max_attempts: u32,
    stage_index: usize,
    attempt_count: u32,
    history: Vec<AttemptRecord>,
    status: SessionStatus,
}

impl PuzzleSession {
    /// Fresh session at stage zero
    pub fn new(puzzle_id: impl Into<String>, ladder: StageLadder, max_attempts: u32) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            ladder,
            max_attempts: max_attempts.max(1),
            stage_index: 0,
            attempt_count: 1,
            history: Vec::new(),
            status: SessionStatus::InProgress,
        }
    }

    /// Rebuild a session from a stored snapshot.
    ///
    /// The stored history is replayed against `ladder`, so the stage index,
    /// attempt count and terminal status always agree with the rows that
    /// survived loading. Rows after the session ended are dropped.
    pub fn restore(snapshot: SessionSnapshot, ladder: StageLadder, max_attempts: u32) -> Self {
        let mut session = Self::new(snapshot.puzzle_id, ladder, max_attempts);
        let stored = snapshot.history.len();
        for record in snapshot.history {
            if session.record_attempt(record.guess, record.outcome).is_err() {
                break;
            }
        }
        if session.history.len() < stored {
            log::warn!(
                "Dropped {} stored attempts for {} past the end of the session",
                stored - session.history.len(),
                session.puzzle_id
            );
        }
        if snapshot.stage_index != session.stage_index {
            log::debug!(
                "Stored stage {} disagrees with history, using {}",
                snapshot.stage_index,
                session.stage_index
            );
        }

        if !session.is_finished() {
            match snapshot.status {
                SessionStatus::Won => {
                    log::warn!(
                        "Stored session {} claims a win without a correct guess",
                        session.puzzle_id
                    );
                    session.status = SessionStatus::Lost;
                }
                SessionStatus::Lost => session.status = SessionStatus::Lost,
                SessionStatus::InProgress => {}
            }
        }
        session
    }

    /// Append an attempt and advance the state machine.
    ///
    /// Rejected as a no-op once the session is terminal.
    pub fn record_attempt(
        &mut self,
        guess: impl Into<String>,
        outcome: Outcome,
    ) -> Result<SessionSnapshot, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::Finished);
        }

        self.history.push(AttemptRecord {
            ordinal: self.attempt_count,
            guess: guess.into(),
            outcome,
        });
        self.attempt_count += 1;

        if outcome.is_correct() {
            self.status = SessionStatus::Won;
        } else if self.attempt_count > self.max_attempts {
            self.status = SessionStatus::Lost;
        } else if self.stage_index < self.ladder.last_index() {
            self.stage_index += 1;
        } else {
            self.status = SessionStatus::Lost;
        }

        log::debug!(
            "Attempt {} on {}: {:?} -> stage {}, {:?}",
            self.attempt_count - 1,
            self.puzzle_id,
            outcome,
            self.stage_index,
            self.status
        );

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            puzzle_id: self.puzzle_id.clone(),
            stage_index: self.stage_index,
            unlocked_seconds: self.unlocked_seconds(),
            attempt_count: self.attempt_count,
            status: self.status,
            history: self.history.clone(),
        }
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn ladder(&self) -> &StageLadder {
        &self.ladder
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// Seconds of audio the player may currently hear
    pub fn unlocked_seconds(&self) -> f64 {
        self.ladder.seconds_at(self.stage_index)
    }

    /// 1-based number of the next attempt
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn attempts_remaining(&self) -> u32 {
        if self.is_finished() {
            return 0;
        }
        self.max_attempts
            .saturating_add(1)
            .saturating_sub(self.attempt_count)
    }

    /// Why the session was lost, if it was
    pub fn loss_reason(&self) -> Option<LossReason> {
        match self.status {
            SessionStatus::Lost if self.attempt_count > self.max_attempts => {
                Some(LossReason::AttemptsExhausted)
            }
            SessionStatus::Lost => Some(LossReason::LadderExhausted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> StageLadder {
        StageLadder::new(vec![2.0, 3.0, 5.0, 9.0, 13.0]).unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = PuzzleSession::new("day-1", classic(), 6);
        assert_eq!(session.stage_index(), 0);
        assert_eq!(session.unlocked_seconds(), 2.0);
        assert_eq!(session.attempt_count(), 1);
        assert_eq!(session.attempts_remaining(), 6);
        assert!(session.history().is_empty());
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_wrong_guesses_climb_ladder_then_win() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        for _ in 0..4 {
            session.record_attempt("nope", Outcome::Incorrect).unwrap();
        }
        assert_eq!(session.stage_index(), 4);
        assert_eq!(session.unlocked_seconds(), 13.0);

        let snap = session.record_attempt("malone", Outcome::Correct).unwrap();
        assert_eq!(snap.status, SessionStatus::Won);
        assert_eq!(snap.history.len(), 5);
        assert_eq!(snap.history.last().unwrap().outcome, Outcome::Correct);
        assert_eq!(snap.stage_index, 4);
    }

    #[test]
    fn test_win_on_sixth_attempt_with_long_ladder() {
        let ladder = StageLadder::new(vec![1.0, 2.0, 4.0, 7.0, 11.0, 16.0]).unwrap();
        let mut session = PuzzleSession::new("day-1", ladder, 6);
        for _ in 0..5 {
            session.record_attempt("nope", Outcome::Incorrect).unwrap();
        }
        assert_eq!(session.stage_index(), 5);
        let snap = session.record_attempt("malone", Outcome::Correct).unwrap();
        assert_eq!(snap.status, SessionStatus::Won);
        assert_eq!(snap.history.len(), 6);
    }

    #[test]
    fn test_attempt_budget_exhausted() {
        let ladder = StageLadder::new(vec![1.0, 2.0, 4.0, 7.0, 11.0, 16.0]).unwrap();
        let mut session = PuzzleSession::new("day-1", ladder, 6);
        for _ in 0..6 {
            session.record_attempt("nope", Outcome::Incorrect).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(session.loss_reason(), Some(LossReason::AttemptsExhausted));
        assert_eq!(
            session.record_attempt("late", Outcome::Correct),
            Err(SessionError::Finished)
        );
        assert_eq!(session.history().len(), 6);
    }

    #[test]
    fn test_ladder_exhausted_before_attempts() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        for _ in 0..5 {
            session.record_attempt("nope", Outcome::Incorrect).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(session.attempt_count(), 6);
        assert!(session.attempt_count() <= session.max_attempts());
        assert_eq!(session.loss_reason(), Some(LossReason::LadderExhausted));
        assert_eq!(session.stage_index(), 4);
    }

    #[test]
    fn test_attempts_run_out_before_ladder() {
        let ladder = StageLadder::new(vec![2.0, 3.0, 5.0, 11.0, 20.0]).unwrap();
        let mut session = PuzzleSession::new("day-1", ladder, 3);
        for _ in 0..3 {
            session.record_attempt("Skipped", Outcome::Skipped).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(session.loss_reason(), Some(LossReason::AttemptsExhausted));
        assert_eq!(session.stage_index(), 2);
    }

    #[test]
    fn test_terminal_session_is_untouched() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        session.record_attempt("malone", Outcome::Correct).unwrap();
        let before = session.snapshot();
        assert!(session.record_attempt("again", Outcome::Incorrect).is_err());
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.attempts_remaining(), 0);
    }

    #[test]
    fn test_partial_artist_advances_like_wrong() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        let snap = session.record_attempt("circles", Outcome::PartialArtist).unwrap();
        assert_eq!(snap.stage_index, 1);
        assert_eq!(snap.unlocked_seconds, 3.0);
        assert_eq!(snap.status, SessionStatus::InProgress);
    }

    #[test]
    fn test_restore_rederives_from_history() {
        let snapshot = SessionSnapshot {
            puzzle_id: "day-1".into(),
            stage_index: 42,
            unlocked_seconds: 99.0,
            attempt_count: 17,
            status: SessionStatus::InProgress,
            history: vec![
                AttemptRecord {
                    ordinal: 1,
                    guess: "nope".into(),
                    outcome: Outcome::Incorrect,
                },
                AttemptRecord {
                    ordinal: 2,
                    guess: "malone".into(),
                    outcome: Outcome::Correct,
                },
            ],
        };
        let session = PuzzleSession::restore(snapshot, classic(), 6);
        assert_eq!(session.stage_index(), 1);
        assert_eq!(session.unlocked_seconds(), 3.0);
        assert_eq!(session.attempt_count(), 3);
        assert_eq!(session.status(), SessionStatus::Won);
    }

    #[test]
    fn test_restore_ignores_stored_stage_ahead_of_history() {
        let snapshot = SessionSnapshot {
            puzzle_id: "day-1".into(),
            stage_index: 4,
            unlocked_seconds: 13.0,
            attempt_count: 2,
            status: SessionStatus::InProgress,
            history: vec![AttemptRecord {
                ordinal: 1,
                guess: "nope".into(),
                outcome: Outcome::Incorrect,
            }],
        };
        let mut session = PuzzleSession::restore(snapshot, classic(), 6);
        assert_eq!(session.stage_index(), 1);
        assert_eq!(session.unlocked_seconds(), 3.0);

        session.record_attempt("Skipped", Outcome::Skipped).unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.stage_index(), 2);
        assert_eq!(session.attempts_remaining(), 4);
    }

    #[test]
    fn test_restore_drops_rows_after_win() {
        let row = |ordinal, guess: &str, outcome| AttemptRecord {
            ordinal,
            guess: guess.into(),
            outcome,
        };
        let snapshot = SessionSnapshot {
            puzzle_id: "day-1".into(),
            stage_index: 2,
            unlocked_seconds: 5.0,
            attempt_count: 4,
            status: SessionStatus::Lost,
            history: vec![
                row(1, "malone", Outcome::Correct),
                row(2, "nope", Outcome::Incorrect),
                row(3, "nope", Outcome::Incorrect),
            ],
        };
        let session = PuzzleSession::restore(snapshot, classic(), 6);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(session.stage_index(), 0);
    }

    #[test]
    fn test_stored_loss_survives_restore() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        session.record_attempt("nope", Outcome::Incorrect).unwrap();
        let mut snap = session.snapshot();
        snap.status = SessionStatus::Lost;
        let restored = PuzzleSession::restore(snap, classic(), 6);
        assert_eq!(restored.status(), SessionStatus::Lost);
        assert_eq!(restored.stage_index(), 1);
    }

    #[test]
    fn test_huge_budget_does_not_overflow() {
        let session = PuzzleSession::new("day-1", classic(), u32::MAX);
        assert_eq!(session.attempts_remaining(), u32::MAX - 1);
    }

    #[test]
    fn test_restore_round_trips_snapshot() {
        let mut session = PuzzleSession::new("day-1", classic(), 6);
        session.record_attempt("Skipped", Outcome::Skipped).unwrap();
        session.record_attempt("nope", Outcome::Incorrect).unwrap();
        let snap = session.snapshot();
        let restored = PuzzleSession::restore(snap.clone(), classic(), 6);
        assert_eq!(restored.snapshot(), snap);
    }
}
