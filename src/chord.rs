//! Chord symbols: `Root Quality [/Bass]`
//!
//! ```text
//! Root    ::= [A-G] ('#' | 'b')?
//! Quality ::= (maj | min | m | dim | aug | sus | add | ° | + | [0-9] | ...)*
//! Bass    ::= '/' Root
//! ```
//!
//! The quality is validated but never interpreted. Besides the base markers it
//! accepts `M`, `-`, `º`, `ø`, `Δ`, parentheses, commas, alterations (`b` or `#`
//! directly before a digit, as in `m7b5` or `7#9`) and `/` directly before a digit
//! (`7/9`). Transposition only ever touches the root and the bass.

use crate::pitch::{PitchClass, Spelling};
use serde::Serialize;

/// Quality markers, longest first so `maj` wins over `m`.
const QUALITY_MARKERS: [&str; 17] = [
    "maj", "min", "dim", "aug", "sus", "add", "m", "M", "°", "º", "ø", "Δ", "+", "-", "(", ")",
    ",",
];

/// A parsed chord symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<PitchClass>,
}

impl Chord {
    /// Parse a complete chord symbol. Returns `None` if any part of `token`
    /// falls outside the grammar.
    ///
    /// # Examples
    /// ```
    /// use cifra::{Chord, PitchClass};
    ///
    /// let chord = Chord::parse("Bbm7/Ab").unwrap();
    /// assert_eq!(chord.root, PitchClass::ASharp);
    /// assert_eq!(chord.quality, "m7");
    /// assert_eq!(chord.bass, Some(PitchClass::GSharp));
    ///
    /// assert!(Chord::parse("Amazing").is_none());
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        let (root, _, root_len) = PitchClass::parse_root(token)?;
        let rest = &token[root_len..];
        let quality_len = quality_len(rest);
        let (quality, tail) = rest.split_at(quality_len);

        let bass = match tail {
            "" => None,
            _ => {
                let bass_text = tail.strip_prefix('/')?;
                let (bass, _, bass_len) = PitchClass::parse_root(bass_text)?;
                if bass_len != bass_text.len() {
                    return None;
                }
                Some(bass)
            }
        };

        Some(Self {
            root,
            quality: quality.to_string(),
            bass,
        })
    }

    /// Shift root and bass by the same number of semitones. The bass moves
    /// from its own position, not relative to the new root.
    pub fn transposed(&self, semitones: i32) -> Self {
        Self {
            root: self.root.shift(semitones),
            quality: self.quality.clone(),
            bass: self.bass.map(|bass| bass.shift(semitones)),
        }
    }

    pub fn render(&self, spelling: Spelling) -> String {
        let mut out = String::with_capacity(self.quality.len() + 5);
        out.push_str(self.root.symbol(spelling));
        out.push_str(&self.quality);
        if let Some(bass) = self.bass {
            out.push('/');
            out.push_str(bass.symbol(spelling));
        }
        out
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(Spelling::Sharps))
    }
}

/// Length in bytes of the longest prefix of `s` made of quality markers.
fn quality_len(s: &str) -> usize {
    let mut pos = 0;
    while pos < s.len() {
        let rest = &s[pos..];
        let mut chars = rest.chars();
        let c = match chars.next() {
            Some(c) => c,
            None => break,
        };

        if c.is_ascii_digit() {
            pos += 1;
            continue;
        }

        // Alterations and slash extensions only count when a digit follows
        if matches!(c, 'b' | '#' | '/') && chars.next().is_some_and(|n| n.is_ascii_digit()) {
            pos += 1;
            continue;
        }

        match QUALITY_MARKERS.iter().find(|m| rest.starts_with(**m)) {
            Some(marker) => pos += marker.len(),
            None => break,
        }
    }
    pos
}

/// Whether all of `s` is a valid chord quality (the empty string is).
pub fn is_quality(s: &str) -> bool {
    quality_len(s) == s.len()
}
