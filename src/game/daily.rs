//! Daily puzzle identity and track selection
//!
//! Every player sees the same track on the same UTC day: the day number
//! seeds the RNG that picks from the catalog.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Milliseconds in a day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Mixed into the day number so the pick is not just `day % len`
const PICK_SALT: u64 = 0x6865_6172_646c_6531;

/// Identity of one daily puzzle; also the persistence key suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleIdentity(String);

impl PuzzleIdentity {
    /// Puzzle for a day counted from the Unix epoch
    pub fn for_day(day: u64) -> Self {
        Self(format!("heardle-{day}"))
    }

    /// Puzzle for the UTC day containing `unix_ms`
    pub fn from_unix_ms(unix_ms: f64) -> Self {
        Self::for_day(day_number(unix_ms))
    }

    /// Identity supplied by the page (e.g. a server-chosen puzzle)
    pub fn custom(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PuzzleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UTC day number for a Unix timestamp in milliseconds
pub fn day_number(unix_ms: f64) -> u64 {
    if unix_ms.is_finite() && unix_ms > 0.0 {
        (unix_ms / MS_PER_DAY).floor() as u64
    } else {
        0
    }
}

/// Catalog index of the track for `day`, or None for an empty catalog
pub fn pick_track(day: u64, catalog_len: usize) -> Option<usize> {
    if catalog_len == 0 {
        return None;
    }
    let mut rng = Pcg32::seed_from_u64(day ^ PICK_SALT);
    Some(rng.random_range(0..catalog_len))
}
