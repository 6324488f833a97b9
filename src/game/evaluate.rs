//! Guess scoring
//!
//! A guess goes through two steps: [`AttemptEvaluator::begin_guess`] checks
//! the input and builds the validation request, then
//! [`AttemptEvaluator::resolve_guess`] applies the validator's verdict. Between
//! the two the evaluator is awaiting evaluation and refuses new submissions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::SongCatalog;
use super::state::{Outcome, PuzzleSession, SessionError};

/// History text recorded for a skip
pub const SKIP_TEXT: &str = "Skipped";

/// Failures talking to the guess-validation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("validation request failed: {0}")]
    Transport(String),
    #[error("validation response unreadable: {0}")]
    Malformed(String),
}

/// Why a guess was not recorded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("please enter a guess")]
    EmptyInput,
    #[error("\"{0}\" is not a song in the catalog")]
    UnknownSong(String),
    #[error("error checking guess: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("still checking the previous guess")]
    AwaitingEvaluation,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Body of a validation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub guess: String,
    pub answer: String,
}

/// Body of a validation response
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub result: String,
}

/// Validator's judgement of one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Artist,
    Incorrect,
}

impl Verdict {
    /// Map the service's `result` field; anything unrecognized is incorrect
    pub fn from_result(result: &str) -> Self {
        match result {
            "correct" => Verdict::Correct,
            "artist" => Verdict::Artist,
            _ => Verdict::Incorrect,
        }
    }

    pub fn outcome(self) -> Outcome {
        match self {
            Verdict::Correct => Outcome::Correct,
            Verdict::Artist => Outcome::PartialArtist,
            Verdict::Incorrect => Outcome::Incorrect,
        }
    }
}

impl From<ValidationResponse> for Verdict {
    fn from(response: ValidationResponse) -> Self {
        Verdict::from_result(&response.result)
    }
}

/// The remote oracle that decides whether a guess matches the answer
pub trait GuessValidator {
    fn validate(&self, request: &ValidationRequest) -> Result<Verdict, EvaluationError>;
}

/// Trim and case-fold player input
pub fn normalize_guess(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Turns raw input into recorded attempts
#[derive(Debug, Clone)]
pub struct AttemptEvaluator {
    answer: String,
    known_titles: Option<SongCatalog>,
    awaiting: bool,
}

impl AttemptEvaluator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: normalize_guess(answer),
            known_titles: None,
            awaiting: false,
        }
    }

    /// Only accept guesses that name a catalog title
    pub fn with_known_titles(mut self, catalog: SongCatalog) -> Self {
        self.known_titles = Some(catalog);
        self
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Validate input and enter the awaiting-evaluation state.
    ///
    /// Nothing is recorded on error; the player may simply try again.
    pub fn begin_guess(
        &mut self,
        session: &PuzzleSession,
        raw: &str,
    ) -> Result<ValidationRequest, GuessError> {
        if session.is_finished() {
            return Err(SessionError::Finished.into());
        }
        if self.awaiting {
            return Err(GuessError::AwaitingEvaluation);
        }

        let guess = normalize_guess(raw);
        if guess.is_empty() {
            return Err(GuessError::EmptyInput);
        }
        if let Some(catalog) = &self.known_titles {
            if !catalog.contains(&guess) {
                return Err(GuessError::UnknownSong(guess));
            }
        }

        self.awaiting = true;
        Ok(ValidationRequest {
            guess,
            answer: self.answer.clone(),
        })
    }

    /// Apply the validator's answer to a request from [`Self::begin_guess`].
    ///
    /// A response arriving after the session ended is discarded.
    pub fn resolve_guess(
        &mut self,
        session: &mut PuzzleSession,
        request: ValidationRequest,
        verdict: Result<Verdict, EvaluationError>,
    ) -> Result<Outcome, GuessError> {
        self.awaiting = false;

        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(err) => {
                log::warn!("Guess validation failed: {err}");
                return Err(err.into());
            }
        };

        if session.is_finished() {
            log::warn!(
                "Discarding verdict for \"{}\": puzzle {} already finished",
                request.guess,
                session.puzzle_id()
            );
            return Err(SessionError::Finished.into());
        }

        let outcome = verdict.outcome();
        session.record_attempt(request.guess, outcome)?;
        Ok(outcome)
    }

    /// Score a guess with a validator that answers immediately
    pub fn submit_guess(
        &mut self,
        session: &mut PuzzleSession,
        validator: &dyn GuessValidator,
        raw: &str,
    ) -> Result<Outcome, GuessError> {
        let request = self.begin_guess(session, raw)?;
        let verdict = validator.validate(&request);
        self.resolve_guess(session, request, verdict)
    }

    /// Give up on the current stage. Always scored as a losing attempt.
    pub fn submit_skip(&mut self, session: &mut PuzzleSession) -> Result<Outcome, GuessError> {
        if self.awaiting {
            return Err(GuessError::AwaitingEvaluation);
        }
        session.record_attempt(SKIP_TEXT, Outcome::Skipped)?;
        Ok(Outcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::game::catalog::CatalogEntry;
    use crate::game::ladder::StageLadder;
    use crate::game::state::SessionStatus;

    /// Returns a fixed verdict and counts calls
    struct FixedValidator {
        verdict: Result<Verdict, EvaluationError>,
        calls: Cell<u32>,
    }

    impl FixedValidator {
        fn new(verdict: Result<Verdict, EvaluationError>) -> Self {
            Self {
                verdict,
                calls: Cell::new(0),
            }
        }
    }

    impl GuessValidator for FixedValidator {
        fn validate(&self, _request: &ValidationRequest) -> Result<Verdict, EvaluationError> {
            self.calls.set(self.calls.get() + 1);
            self.verdict.clone()
        }
    }

    fn session() -> PuzzleSession {
        let ladder = StageLadder::new(vec![2.0, 3.0, 5.0, 9.0, 13.0]).unwrap();
        PuzzleSession::new("day-1", ladder, 6)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_guess("  Circles \n"), "circles");
        assert_eq!(normalize_guess("   "), "");
    }

    #[test]
    fn test_verdict_mapping() {
        assert_eq!(Verdict::from_result("correct"), Verdict::Correct);
        assert_eq!(Verdict::from_result("artist"), Verdict::Artist);
        assert_eq!(Verdict::from_result("incorrect"), Verdict::Incorrect);
        assert_eq!(Verdict::from_result("Correct"), Verdict::Incorrect);
        let response: ValidationResponse = serde_json::from_str(r#"{"result":"artist"}"#).unwrap();
        assert_eq!(Verdict::from(response).outcome(), Outcome::PartialArtist);
    }

    #[test]
    fn test_empty_guess_consumes_nothing() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        let validator = FixedValidator::new(Ok(Verdict::Correct));
        assert_eq!(
            evaluator.submit_guess(&mut session, &validator, "   "),
            Err(GuessError::EmptyInput)
        );
        assert_eq!(validator.calls.get(), 0);
        assert_eq!(session.attempt_count(), 1);
        assert!(!evaluator.is_awaiting());
    }

    #[test]
    fn test_correct_guess_wins() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        let validator = FixedValidator::new(Ok(Verdict::Correct));
        let outcome = evaluator.submit_guess(&mut session, &validator, " CIRCLES ");
        assert_eq!(outcome, Ok(Outcome::Correct));
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(session.history()[0].guess, "circles");
    }

    #[test]
    fn test_request_carries_normalized_answer() {
        let session = session();
        let mut evaluator = AttemptEvaluator::new(" Circles ");
        let request = evaluator.begin_guess(&session, "Sunflower").unwrap();
        assert_eq!(
            request,
            ValidationRequest {
                guess: "sunflower".into(),
                answer: "circles".into(),
            }
        );
    }

    #[test]
    fn test_evaluation_error_consumes_nothing() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        let validator = FixedValidator::new(Err(EvaluationError::Transport("offline".into())));
        let result = evaluator.submit_guess(&mut session, &validator, "circles");
        assert!(matches!(result, Err(GuessError::Evaluation(_))));
        assert_eq!(session.attempt_count(), 1);
        assert!(!evaluator.is_awaiting());

        // Resubmission is allowed
        let validator = FixedValidator::new(Ok(Verdict::Correct));
        assert_eq!(
            evaluator.submit_guess(&mut session, &validator, "circles"),
            Ok(Outcome::Correct)
        );
    }

    #[test]
    fn test_second_submission_blocked_while_awaiting() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        let request = evaluator.begin_guess(&session, "sunflower").unwrap();
        assert_eq!(
            evaluator.begin_guess(&session, "circles"),
            Err(GuessError::AwaitingEvaluation)
        );
        assert_eq!(
            evaluator.submit_skip(&mut session),
            Err(GuessError::AwaitingEvaluation)
        );
        let outcome = evaluator.resolve_guess(&mut session, request, Ok(Verdict::Incorrect));
        assert_eq!(outcome, Ok(Outcome::Incorrect));
        assert!(evaluator.begin_guess(&session, "circles").is_ok());
    }

    #[test]
    fn test_late_verdict_discarded_after_finish() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        let request = evaluator.begin_guess(&session, "circles").unwrap();

        // Another tab or a stale UI finished the puzzle meanwhile
        session.record_attempt("circles", Outcome::Correct).unwrap();

        let result = evaluator.resolve_guess(&mut session, request, Ok(Verdict::Incorrect));
        assert_eq!(result, Err(GuessError::Session(SessionError::Finished)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_skip_is_distinct_from_typed_skipped() {
        let mut skipped = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        assert_eq!(evaluator.submit_skip(&mut skipped), Ok(Outcome::Skipped));
        assert_eq!(skipped.history()[0].guess, SKIP_TEXT);
        assert_eq!(skipped.history()[0].outcome, Outcome::Skipped);

        let mut typed = session();
        let validator = FixedValidator::new(Ok(Verdict::Incorrect));
        let outcome = evaluator.submit_guess(&mut typed, &validator, "Skipped");
        assert_eq!(outcome, Ok(Outcome::Incorrect));
        assert_eq!(typed.history()[0].guess, "skipped");
        assert_eq!(typed.history()[0].outcome, Outcome::Incorrect);
        assert_eq!(validator.calls.get(), 1);
    }

    #[test]
    fn test_unknown_song_rejected_when_catalog_required() {
        let catalog = SongCatalog::new(vec![CatalogEntry::new("Circles", "Post Malone")]);
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles").with_known_titles(catalog);
        let validator = FixedValidator::new(Ok(Verdict::Incorrect));
        assert_eq!(
            evaluator.submit_guess(&mut session, &validator, "not a song"),
            Err(GuessError::UnknownSong("not a song".into()))
        );
        assert_eq!(validator.calls.get(), 0);
        assert_eq!(session.attempt_count(), 1);
        assert!(!evaluator.is_awaiting());
    }

    #[test]
    fn test_finished_session_rejects_everything() {
        let mut session = session();
        let mut evaluator = AttemptEvaluator::new("Circles");
        evaluator.submit_skip(&mut session).unwrap();
        session.record_attempt("circles", Outcome::Correct).unwrap();
        assert_eq!(
            evaluator.begin_guess(&session, "circles"),
            Err(GuessError::Session(SessionError::Finished))
        );
        assert_eq!(
            evaluator.submit_skip(&mut session),
            Err(GuessError::Session(SessionError::Finished))
        );
    }
}
