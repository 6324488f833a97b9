//! Game settings
//!
//! Persisted separately from puzzle sessions, under its own key.

use serde::{Deserialize, Serialize};

use crate::game::{LadderError, StageLadder};
use crate::persistence::KeyValueStore;

/// Built-in reveal ladders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LadderPreset {
    /// 2, 3, 5, 9, 13 seconds
    #[default]
    Classic,
    /// 2, 3, 5, 11, 20 seconds
    Extended,
}

impl LadderPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            LadderPreset::Classic => "Classic",
            LadderPreset::Extended => "Extended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(LadderPreset::Classic),
            "extended" | "long" => Some(LadderPreset::Extended),
            _ => None,
        }
    }

    /// Unlock durations in seconds
    pub fn stages(&self) -> &'static [f64] {
        match self {
            LadderPreset::Classic => &[2.0, 3.0, 5.0, 9.0, 13.0],
            LadderPreset::Extended => &[2.0, 3.0, 5.0, 11.0, 20.0],
        }
    }

    /// Attempt budget the preset was designed for
    pub fn max_attempts(&self) -> u32 {
        match self {
            LadderPreset::Classic => 6,
            LadderPreset::Extended => 5,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reveal ladder preset
    pub preset: LadderPreset,
    /// Overrides the preset's ladder when set
    pub custom_ladder: Option<Vec<f64>>,
    /// Attempt budget, independent of ladder length
    pub max_attempts: u32,
    /// Reject guesses that are not catalog titles
    pub require_known_title: bool,
    /// Prefix of per-puzzle storage keys
    pub storage_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: LadderPreset::Classic,
            custom_ladder: None,
            max_attempts: LadderPreset::Classic.max_attempts(),
            require_known_title: false,
            storage_prefix: "heardle_state".to_string(),
        }
    }
}

impl Settings {
    /// Create settings from a ladder preset (applies preset defaults)
    pub fn from_preset(preset: LadderPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Switch preset, resetting the ladder override and attempt budget
    pub fn apply_preset(&mut self, preset: LadderPreset) {
        self.preset = preset;
        self.custom_ladder = None;
        self.max_attempts = preset.max_attempts();
    }

    /// Ladder in effect
    pub fn ladder(&self) -> Result<StageLadder, LadderError> {
        match &self.custom_ladder {
            Some(stages) => StageLadder::new(stages.clone()),
            None => StageLadder::new(self.preset.stages().to_vec()),
        }
    }

    /// Largest attempt budget honoured from stored settings
    pub const MAX_ATTEMPTS_CEILING: u32 = 10;

    /// Attempt budget, between one and [`Self::MAX_ATTEMPTS_CEILING`]
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.clamp(1, Self::MAX_ATTEMPTS_CEILING)
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "heardle_settings";

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(err) => log::warn!("Ignoring stored settings: {err}"),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Failed to read settings: {err}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(err) => log::warn!("Failed to save settings: {err}"),
            },
            Err(err) => log::warn!("Failed to encode settings: {err}"),
        }
    }
}
