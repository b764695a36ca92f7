//! # Key Circle and Key Normalizer
//!
//! The 12 chromatic pitch classes, in circle order starting at C, are the only
//! source of truth for interval arithmetic. Flat spellings are accepted on input
//! and folded into the sharp-based [`PitchClass`] before any computation.
//!
//! ## Key Concepts
//!
//! ### Spelling
//! A pitch class has one sharp name and, for the five black keys, one flat name.
//! Which one is rendered is a [`Spelling`] decision made per target key:
//! - a key written with a flat (`Bb`, `Ebm`) spells flats
//! - a key written with a sharp (`F#`, `C#m`) spells sharps
//! - a natural key follows its key signature: `F` major and the `D`, `G`, `C`, `F`
//!   minor keys carry flats, every other natural key spells sharps
//!
//! ### Distance
//! - [`key_distance`] is the shortest arc, in `-5..=6` (the tritone resolves upward)
//! - [`directed_key_distance`] always rotates upward, in `0..=11`

use crate::chord::is_quality;
use crate::error::CifraError;
use serde::Serialize;

/// One of the 12 canonical pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PitchClass {
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

/// The chromatic circle, index 0 through 11.
pub const KEY_CIRCLE: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Accidental written after a root letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// Which enharmonic name to render for the black keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}

impl PitchClass {
    /// Position on the circle, `0..=11`.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class at `index`, wrapping around the circle in both directions.
    pub fn from_index(index: i32) -> Self {
        KEY_CIRCLE[index.rem_euclid(12) as usize]
    }

    /// Move `semitones` along the circle (any sign, any magnitude).
    pub fn shift(self, semitones: i32) -> Self {
        Self::from_index(self.index() as i32 + semitones)
    }

    pub fn symbol(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharps => SHARP_NAMES[self.index() as usize],
            Spelling::Flats => FLAT_NAMES[self.index() as usize],
        }
    }

    /// Spelling conventionally used for a major key on this pitch class:
    /// Db, Eb, F, Ab and Bb take flats, the rest take sharps.
    pub fn key_spelling(self) -> Spelling {
        match self {
            PitchClass::CSharp
            | PitchClass::DSharp
            | PitchClass::F
            | PitchClass::GSharp
            | PitchClass::ASharp => Spelling::Flats,
            _ => Spelling::Sharps,
        }
    }

    /// Parse a root (`[A-G]` plus an optional `#` or `b`) at the start of `s`.
    ///
    /// Returns the pitch class, the accidental as written and the number of
    /// bytes consumed. `E#`, `B#`, `Cb` and `Fb` are not canonical spellings
    /// and yield `None`.
    pub fn parse_root(s: &str) -> Option<(PitchClass, Accidental, usize)> {
        let mut chars = s.chars();
        let base: i32 = match chars.next()? {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let accidental = match chars.next() {
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            _ => Accidental::Natural,
        };

        match (base, accidental) {
            (4, Accidental::Sharp) | (11, Accidental::Sharp) => None,
            (0, Accidental::Flat) | (5, Accidental::Flat) => None,
            (_, Accidental::Natural) => Some((Self::from_index(base), accidental, 1)),
            (_, Accidental::Sharp) => Some((Self::from_index(base + 1), accidental, 2)),
            (_, Accidental::Flat) => Some((Self::from_index(base - 1), accidental, 2)),
        }
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol(Spelling::Sharps))
    }
}

/// A key as the caller wrote it: its root, how the root was spelled, and
/// whether it names a minor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub root: PitchClass,
    pub accidental: Accidental,
    pub minor: bool,
}

impl Key {
    /// Parse a key string like `G`, `Bb`, `C#m`, `Ebmaj7` or `d minor`.
    ///
    /// Only the root identifies the key. The trailing qualifier must still be
    /// a recognizable mode word or chord quality, so `Hm` or `Cxyz` fail.
    pub fn parse(raw: &str) -> Result<Self, CifraError> {
        let trimmed = raw.trim();
        let invalid = || CifraError::InvalidKey(raw.to_string());

        // Keys are often typed lowercase ("g", "f#m"); only the letter is case-folded
        let mut chars = trimmed.chars();
        let first = chars.next().ok_or_else(invalid)?;
        let folded = format!("{}{}", first.to_ascii_uppercase(), chars.as_str());

        let (root, accidental, consumed) = PitchClass::parse_root(&folded).ok_or_else(invalid)?;
        let rest = folded[consumed..].trim();

        let minor = match rest {
            "" | "major" | "maior" => false,
            "minor" | "menor" => true,
            _ if is_quality(rest) => {
                rest.starts_with('-') || (rest.starts_with('m') && !rest.starts_with("maj"))
            }
            _ => return Err(invalid()),
        };

        Ok(Self {
            root,
            accidental,
            minor,
        })
    }

    /// Major key on `root`, spelled the conventional way.
    pub fn major(root: PitchClass) -> Self {
        let accidental = match (root.symbol(Spelling::Sharps).len(), root.key_spelling()) {
            (1, _) => Accidental::Natural,
            (_, Spelling::Flats) => Accidental::Flat,
            (_, Spelling::Sharps) => Accidental::Sharp,
        };
        Self {
            root,
            accidental,
            minor: false,
        }
    }

    /// Accidental preference of this key, following its key signature.
    pub fn spelling(&self) -> Spelling {
        match self.accidental {
            Accidental::Flat => Spelling::Flats,
            Accidental::Sharp => Spelling::Sharps,
            Accidental::Natural => {
                let flat_naturals: &[PitchClass] = if self.minor {
                    &[PitchClass::D, PitchClass::G, PitchClass::C, PitchClass::F]
                } else {
                    &[PitchClass::F]
                };
                if flat_naturals.contains(&self.root) {
                    Spelling::Flats
                } else {
                    Spelling::Sharps
                }
            }
        }
    }
}

/// Normalize a key string to its root pitch class.
pub fn normalize_key(raw: &str) -> Result<PitchClass, CifraError> {
    Key::parse(raw).map(|key| key.root)
}

/// Signed shortest-arc distance from `from` to `to`, in `-5..=6`.
///
/// Both directions are equidistant at the tritone; it resolves to `+6`.
pub fn key_distance(from: PitchClass, to: PitchClass) -> i32 {
    let up = directed_key_distance(from, to);
    if up > 6 {
        up - 12
    } else {
        up
    }
}

/// Upward rotation from `from` to `to`, in `0..=11`.
pub fn directed_key_distance(from: PitchClass, to: PitchClass) -> i32 {
    (to.index() as i32 - from.index() as i32).rem_euclid(12)
}

/// Canonical symbols of all 12 keys in circle order.
pub fn available_keys() -> Vec<&'static str> {
    SHARP_NAMES.to_vec()
}
