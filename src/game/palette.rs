//! The fixed set of colors a round can assign.

use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};

pub const PALETTE: [Color; 6] = [
    Color("#FF5733"),
    Color("#33FF57"),
    Color("#3357FF"),
    Color("#FF33F5"),
    Color("#33FFF5"),
    Color("#F5FF33"),
];

/// A palette entry, as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Case-insensitive comparison against a player's guess.
    pub fn matches(&self, guess: &str) -> bool {
        self.0.eq_ignore_ascii_case(guess.trim())
    }

    /// Looks a hex string up in the palette, ignoring case.
    pub fn parse(raw: &str) -> Option<Color> {
        PALETTE.iter().copied().find(|c| c.matches(raw))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Uniform draw from the palette; draws for different players are independent.
pub fn random_color<R: Rng>(rng: &mut R) -> Color {
    // PALETTE is non-empty
    *PALETTE.choose(rng).unwrap_or(&PALETTE[0])
}
