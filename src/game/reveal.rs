//! Listen-limit enforcement on top of the playback widget

use super::ladder::StageLadder;
use super::state::PuzzleSession;

/// Commands the game issues to the audio player.
///
/// Implemented by the embedded widget on the web and by test doubles.
pub trait Playback {
    /// Load a track by URL or identifier
    fn load(&mut self, track: &str);
    fn seek_to(&mut self, position_ms: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Player that ignores every command (native builds have no audio)
#[derive(Debug, Default)]
pub struct SilentPlayback;

impl Playback for SilentPlayback {
    fn load(&mut self, _track: &str) {}
    fn seek_to(&mut self, _position_ms: f64) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
}

/// Keeps playback inside the unlocked prefix of the track
#[derive(Debug)]
pub struct RevealController<P: Playback> {
    playback: P,
    playing: bool,
}

impl<P: Playback> RevealController<P> {
    pub fn new(playback: P) -> Self {
        Self {
            playback,
            playing: false,
        }
    }

    pub fn load(&mut self, track: &str) {
        self.playing = false;
        self.playback.load(track);
    }

    /// Seconds currently unlocked for this session
    pub fn current_unlocked_seconds(&self, session: &PuzzleSession) -> f64 {
        session.unlocked_seconds()
    }

    /// Restart the clip from the beginning
    pub fn play_from_start(&mut self) {
        self.playback.seek_to(0.0);
        self.playback.play();
        self.playing = true;
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.playback.pause();
            self.playing = false;
        }
    }

    /// Position callback from the player.
    ///
    /// Pauses on every tick at or past the unlocked limit. Finished sessions
    /// may hear the whole track. Returns true if a pause was issued.
    pub fn on_playback_position(&mut self, session: &PuzzleSession, elapsed_ms: f64) -> bool {
        if session.is_finished() {
            return false;
        }
        let elapsed_secs = elapsed_ms / 1000.0;
        if elapsed_secs >= self.current_unlocked_seconds(session) {
            self.playback.pause();
            self.playing = false;
            return true;
        }
        false
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }
}

/// Playback position as a fraction of the full-reveal ceiling, clamped to [0, 1]
pub fn progress_fraction(ladder: &StageLadder, elapsed_ms: f64) -> f64 {
    let elapsed_secs = elapsed_ms / 1000.0;
    (elapsed_secs / ladder.ceiling()).clamp(0.0, 1.0)
}

/// Unlocked prefix as a fraction of the full-reveal ceiling
pub fn unlocked_fraction(session: &PuzzleSession) -> f64 {
    session.unlocked_seconds() / session.ladder().ceiling()
}
