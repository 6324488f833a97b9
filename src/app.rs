//! One page's worth of puzzle: session, evaluator, reveal clamp and storage
//!
//! Every successful transition is saved immediately, so a reload resumes
//! exactly where the player left off.

use crate::game::{
    AttemptEvaluator, EvaluationError, GuessError, GuessValidator, LadderError, Outcome, Playback,
    PuzzleIdentity, PuzzleSession, RevealController, SessionSnapshot, SongCatalog,
    ValidationRequest, Verdict, history_line, share_text, unlocked_fraction,
};
use crate::persistence::{KeyValueStore, SessionStore};
use crate::settings::Settings;

/// Running puzzle for one daily identity
pub struct PuzzleApp<S: KeyValueStore, P: Playback> {
    session: PuzzleSession,
    evaluator: AttemptEvaluator,
    reveal: RevealController<P>,
    sessions: SessionStore<S>,
    catalog: SongCatalog,
}

impl<S: KeyValueStore, P: Playback> PuzzleApp<S, P> {
    /// Restore the saved session for `puzzle` or start a fresh one
    pub fn start(
        puzzle: &PuzzleIdentity,
        answer: &str,
        settings: &Settings,
        catalog: SongCatalog,
        store: S,
        playback: P,
    ) -> Result<Self, LadderError> {
        let ladder = settings.ladder()?;
        let max_attempts = settings.effective_max_attempts();
        let sessions = SessionStore::new(store, settings.storage_prefix.clone());

        let session = match sessions.load(puzzle.as_str(), max_attempts) {
            Some(snapshot) => PuzzleSession::restore(snapshot, ladder, max_attempts),
            None => PuzzleSession::new(puzzle.as_str(), ladder, max_attempts),
        };
        if session.is_finished() {
            log::info!("Puzzle {} already finished: {:?}", puzzle, session.status());
        }

        let mut evaluator = AttemptEvaluator::new(answer);
        if settings.require_known_title {
            evaluator = evaluator.with_known_titles(catalog.clone());
        }

        Ok(Self {
            session,
            evaluator,
            reveal: RevealController::new(playback),
            sessions,
            catalog,
        })
    }

    pub fn session(&self) -> &PuzzleSession {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn catalog(&self) -> &SongCatalog {
        &self.catalog
    }

    pub fn reveal(&self) -> &RevealController<P> {
        &self.reveal
    }

    /// A guess is out for validation; submission should be disabled
    pub fn is_awaiting(&self) -> bool {
        self.evaluator.is_awaiting()
    }

    pub fn load_track(&mut self, track: &str) {
        self.reveal.load(track);
    }

    /// Play the unlocked clip from the start
    pub fn play(&mut self) {
        self.reveal.play_from_start();
    }

    /// Forward a position tick; returns true if the clip was cut off
    pub fn on_playback_position(&mut self, elapsed_ms: f64) -> bool {
        self.reveal.on_playback_position(&self.session, elapsed_ms)
    }

    pub fn unlocked_fraction(&self) -> f64 {
        unlocked_fraction(&self.session)
    }

    /// Start validating a guess (see [`AttemptEvaluator::begin_guess`])
    pub fn begin_guess(&mut self, raw: &str) -> Result<ValidationRequest, GuessError> {
        self.evaluator.begin_guess(&self.session, raw)
    }

    /// Apply the verdict for a pending guess and save
    pub fn resolve_guess(
        &mut self,
        request: ValidationRequest,
        verdict: Result<Verdict, EvaluationError>,
    ) -> Result<Outcome, GuessError> {
        let outcome = self
            .evaluator
            .resolve_guess(&mut self.session, request, verdict)?;
        self.persist();
        Ok(outcome)
    }

    /// Score a guess with a synchronous validator and save
    pub fn submit_guess(
        &mut self,
        validator: &dyn GuessValidator,
        raw: &str,
    ) -> Result<Outcome, GuessError> {
        let outcome = self
            .evaluator
            .submit_guess(&mut self.session, validator, raw)?;
        self.persist();
        Ok(outcome)
    }

    /// Skip the current stage and save
    pub fn submit_skip(&mut self) -> Result<Outcome, GuessError> {
        let outcome = self.evaluator.submit_skip(&mut self.session)?;
        self.persist();
        Ok(outcome)
    }

    /// Rows for the guess history list
    pub fn history_lines(&self) -> Vec<String> {
        self.session
            .history()
            .iter()
            .map(|r| history_line(r, &self.catalog))
            .collect()
    }

    pub fn share_text(&self) -> String {
        share_text(&self.session.snapshot(), self.session.max_attempts())
    }

    /// Hand back the underlying store
    pub fn into_store(self) -> S {
        self.sessions.into_inner()
    }

    fn persist(&mut self) {
        let snapshot = self.session.snapshot();
        if let Err(err) = self.sessions.save(&snapshot) {
            log::warn!("Failed to save session {}: {err}", snapshot.puzzle_id);
        }
        if snapshot.status.is_terminal() {
            log::info!(
                "Puzzle {} finished: {:?} after {} attempts",
                snapshot.puzzle_id,
                snapshot.status,
                snapshot.history.len()
            );
        }
    }
}
