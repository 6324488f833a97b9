//! Song catalog: autocomplete, display names and local validation

use serde::{Deserialize, Serialize};

use super::evaluate::{EvaluationError, GuessValidator, ValidationRequest, Verdict, normalize_guess};

/// A guessable song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Song title, the thing players guess
    pub answer: String,
    pub artist: String,
}

impl CatalogEntry {
    pub fn new(answer: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            artist: artist.into(),
        }
    }

    /// "Title - Artist"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.answer, self.artist)
    }
}

/// All songs a puzzle may draw from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongCatalog {
    entries: Vec<CatalogEntry>,
}

impl SongCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Entry whose title matches, ignoring case and surrounding whitespace
    pub fn find(&self, title: &str) -> Option<&CatalogEntry> {
        let wanted = normalize_guess(title);
        self.entries
            .iter()
            .find(|e| normalize_guess(&e.answer) == wanted)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.find(title).is_some()
    }

    /// Autocomplete: entries whose title or artist contains `partial`
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<&CatalogEntry> {
        let needle = normalize_guess(partial);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| {
                e.answer.to_lowercase().contains(&needle) || e.artist.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Display form of a guess for history rows; unknown text is shown as typed
    pub fn canonical(&self, title: &str) -> String {
        self.find(title)
            .map(CatalogEntry::display_name)
            .unwrap_or_else(|| title.to_string())
    }
}

/// Offline validation: exact title wins, naming the answer's artist (or another
/// of their songs) is a partial match.
impl GuessValidator for SongCatalog {
    fn validate(&self, request: &ValidationRequest) -> Result<Verdict, EvaluationError> {
        let guess = normalize_guess(&request.guess);
        let answer = normalize_guess(&request.answer);
        if guess == answer {
            return Ok(Verdict::Correct);
        }

        let Some(artist) = self.find(&answer).map(|e| normalize_guess(&e.artist)) else {
            return Ok(Verdict::Incorrect);
        };
        let guessed_artist = self.find(&guess).map(|e| normalize_guess(&e.artist));
        if guess == artist || guessed_artist.as_deref() == Some(artist.as_str()) {
            Ok(Verdict::Artist)
        } else {
            Ok(Verdict::Incorrect)
        }
    }
}
