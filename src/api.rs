//! # Public API
//!
//! Entry points for callers that hold chord-chart text and key names.
//!
//! ## Transposition
//! - [`transpose_chart()`] - Bracketed chart from one key to another
//! - [`transpose_chord_list()`] - List of chord symbols from one key to another
//! - [`transpose_chart_by()`] - Bracketed chart by a raw number of semitones
//!
//! ## Interactive state
//! - [`up()`], [`down()`], [`reset()`], [`get_current_key()`]
//!
//! ## Typical Usage
//!
//! ```rust
//! use cifra::transpose_chart;
//!
//! let chart = "[C]Amazing [Am]grace [F]how [G]sweet";
//! let transposed = transpose_chart(chart, "C", "D")?;
//! assert_eq!(transposed, "[D]Amazing [Bm]grace [G]how [A]sweet");
//! # Ok::<(), cifra::CifraError>(())
//! ```
//!
//! Key names and chord distances come from the [`pitch`](crate::pitch) module
//! ([`normalize_key`](crate::normalize_key), [`key_distance`](crate::key_distance),
//! [`directed_key_distance`](crate::directed_key_distance)); chord extraction from
//! [`parser`](crate::parser) ([`parse_chords`](crate::parse_chords)).

use crate::{
    shift_chart, transpose_chart_with, transpose_chords_with, CifraError, KeyContext, Notation,
    PitchClass, Spelling, StateStep, TransposeOptions,
};

/// Transpose a bracketed chord chart from `from` to `to`.
///
/// Only chord tokens change; lyrics, whitespace and brackets are copied
/// through. Bracket bodies that are not chords are left as they are.
///
/// # Example
/// ```rust
/// use cifra::transpose_chart;
///
/// assert_eq!(transpose_chart("[C/E]Santo", "C", "D")?, "[D/F#]Santo");
/// assert_eq!(transpose_chart("[C]Santo", "C", "Db")?, "[Db]Santo");
/// # Ok::<(), cifra::CifraError>(())
/// ```
///
/// # Errors
/// Returns [`CifraError::InvalidKey`] if either key is not a valid key name.
pub fn transpose_chart(chart: &str, from: &str, to: &str) -> Result<String, CifraError> {
    transpose_chart_with(chart, from, to, &TransposeOptions::default()).map(|report| report.chart)
}

/// Transpose each chord symbol in `chords` from `from` to `to`.
///
/// # Example
/// ```rust
/// use cifra::transpose_chord_list;
///
/// let chords = transpose_chord_list(&["Cmaj7", "Dm7", "G7"], "C", "F")?;
/// assert_eq!(chords, vec!["Fmaj7", "Gm7", "C7"]);
/// # Ok::<(), cifra::CifraError>(())
/// ```
pub fn transpose_chord_list<S: AsRef<str>>(
    chords: &[S],
    from: &str,
    to: &str,
) -> Result<Vec<String>, CifraError> {
    transpose_chords_with(chords, from, to, None)
}

/// Shift a bracketed chart by `semitones` (any sign), rendering accidentals
/// with `spelling`.
///
/// # Example
/// ```rust
/// use cifra::{transpose_chart_by, Spelling};
///
/// assert_eq!(transpose_chart_by("[G]Te louvo", -2, Spelling::Sharps), "[F]Te louvo");
/// assert_eq!(transpose_chart_by("[G]Te louvo", 3, Spelling::Sharps), "[A#]Te louvo");
/// assert_eq!(transpose_chart_by("[G]Te louvo", 3, Spelling::Flats), "[Bb]Te louvo");
/// ```
pub fn transpose_chart_by(chart: &str, semitones: i32, spelling: Spelling) -> String {
    shift_chart(chart, semitones, spelling, Notation::Bracketed).chart
}

/// One semitone up from `state`, with `chart` rendered in the new key.
pub fn up(state: &KeyContext, chart: &str) -> StateStep {
    state.up(chart, Notation::Bracketed)
}

/// One semitone down from `state`, with `chart` rendered in the new key.
pub fn down(state: &KeyContext, chart: &str) -> StateStep {
    state.down(chart, Notation::Bracketed)
}

/// Back to the original key; `chart` is returned as given.
///
/// # Example
/// ```rust
/// use cifra::{reset, up, KeyContext, PitchClass};
///
/// let chart = "[C]Aleluia";
/// let state = KeyContext::new(PitchClass::C);
/// let two_up = up(&up(&state, chart).context, chart);
/// let back = reset(&two_up.context, chart);
/// assert_eq!(back.context.semitone_offset, 0);
/// assert_eq!(back.chart, chart);
/// ```
pub fn reset(state: &KeyContext, chart: &str) -> StateStep {
    state.reset(chart)
}

pub fn get_current_key(state: &KeyContext) -> PitchClass {
    state.current_key()
}
