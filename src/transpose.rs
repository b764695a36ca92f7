use crate::chord::Chord;
use crate::error::{ChordWarning, CifraError};
use crate::parser::{parse_chart, Notation};
use crate::pitch::{directed_key_distance, Key, Spelling};
use log::{debug, warn};
use serde::Serialize;

/// Options for a chart transposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransposeOptions {
    pub notation: Notation,
    /// Force sharp or flat names. `None` follows the target key's signature.
    pub spelling: Option<Spelling>,
}

/// Result of transposing a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransposeReport {
    pub chart: String,
    /// Upward shift applied, `0..=11`
    pub offset: i32,
    pub spelling: Spelling,
    pub warnings: Vec<ChordWarning>,
}

/// Semitones to move and the spelling to render with, for `from` -> `to`.
///
/// The offset is always the upward rotation: going from C to A is +9, not -3.
pub fn plan_transposition(
    from: &str,
    to: &str,
    spelling: Option<Spelling>,
) -> Result<(i32, Spelling), CifraError> {
    let from_key = Key::parse(from)?;
    let to_key = Key::parse(to)?;
    let offset = directed_key_distance(from_key.root, to_key.root);
    Ok((offset, spelling.unwrap_or_else(|| to_key.spelling())))
}

/// Transpose a chart from one key to another.
pub fn transpose_chart_with(
    chart: &str,
    from: &str,
    to: &str,
    options: &TransposeOptions,
) -> Result<TransposeReport, CifraError> {
    let (offset, spelling) = plan_transposition(from, to, options.spelling)?;
    debug!(
        "Transposing chart {} -> {} (+{} semitones, {:?})",
        from, to, offset, spelling
    );

    // Same key and nothing to respell: hand the text back as is
    if offset == 0 && options.spelling.is_none() {
        let warnings = parse_chart(chart, options.notation).warnings;
        return Ok(TransposeReport {
            chart: chart.to_string(),
            offset,
            spelling,
            warnings,
        });
    }

    Ok(shift_chart(chart, offset, spelling, options.notation))
}

/// Move every chord in `chart` by `semitones` (any integer, reduced mod 12).
///
/// Text outside the chord spans is copied through byte for byte.
pub fn shift_chart(
    chart: &str,
    semitones: i32,
    spelling: Spelling,
    notation: Notation,
) -> TransposeReport {
    let offset = semitones.rem_euclid(12);
    let report = parse_chart(chart, notation);

    let mut out = String::with_capacity(chart.len() + report.tokens.len());
    let mut last = 0;
    for token in &report.tokens {
        out.push_str(&chart[last..token.span.start]);
        out.push_str(&token.chord.transposed(offset).render(spelling));
        last = token.span.end;
    }
    out.push_str(&chart[last..]);

    TransposeReport {
        chart: out,
        offset,
        spelling,
        warnings: report.warnings,
    }
}

/// Transpose a list of chord symbols. Entries that are not chords are
/// returned unchanged; whitespace around an entry is kept.
pub fn shift_chords<S: AsRef<str>>(chords: &[S], semitones: i32, spelling: Spelling) -> Vec<String> {
    let offset = semitones.rem_euclid(12);
    chords
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let trimmed = symbol.trim();
            match Chord::parse(trimmed) {
                Some(chord) => {
                    let lead = symbol.len() - symbol.trim_start().len();
                    let tail = &symbol[lead + trimmed.len()..];
                    let rendered = chord.transposed(offset).render(spelling);
                    format!("{}{}{}", &symbol[..lead], rendered, tail)
                }
                None => {
                    warn!("Skipping unparseable chord '{}'", symbol);
                    symbol.to_string()
                }
            }
        })
        .collect()
}

/// Transpose a list of chord symbols from one key to another.
pub fn transpose_chords_with<S: AsRef<str>>(
    chords: &[S],
    from: &str,
    to: &str,
    spelling: Option<Spelling>,
) -> Result<Vec<String>, CifraError> {
    let (offset, spelling_used) = plan_transposition(from, to, spelling)?;
    debug!(
        "Transposing {} chords {} -> {} (+{} semitones)",
        chords.len(),
        from,
        to,
        offset
    );

    if offset == 0 && spelling.is_none() {
        return Ok(chords.iter().map(|c| c.as_ref().to_string()).collect());
    }
    Ok(shift_chords(chords, offset, spelling_used))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(text: &str, from: &str, to: &str) -> String {
        transpose_chart_with(text, from, to, &TransposeOptions::default())
            .unwrap()
            .chart
    }

    #[test]
    fn test_transpose_bracketed_chart() {
        assert_eq!(
            chart("[C]Amazing [Am]grace [F]how [G]sweet", "C", "D"),
            "[D]Amazing [Bm]grace [G]how [A]sweet"
        );
    }

    #[test]
    fn test_offset_is_upward_rotation() {
        let report =
            transpose_chart_with("[C]", "C", "A", &TransposeOptions::default()).unwrap();
        assert_eq!(report.offset, 9);
        assert_eq!(report.chart, "[A]");

        let report =
            transpose_chart_with("[G]", "G", "F", &TransposeOptions::default()).unwrap();
        assert_eq!(report.offset, 10);
    }

    #[test]
    fn test_flat_target_spells_flats() {
        assert_eq!(chart("[C] [F] [G7] [Am]", "C", "Db"), "[Db] [Gb] [Ab7] [Bbm]");
        assert_eq!(chart("[C] [F] [G7] [Am]", "C", "C#"), "[C#] [F#] [G#7] [A#m]");
        // F major has a flat in its signature
        assert_eq!(chart("[C] [G] [D]", "G", "F"), "[Bb] [F] [C]");
    }

    #[test]
    fn test_spelling_override() {
        let options = TransposeOptions {
            spelling: Some(Spelling::Sharps),
            ..TransposeOptions::default()
        };
        let report = transpose_chart_with("[C] [F]", "C", "Bb", &options).unwrap();
        assert_eq!(report.chart, "[A#] [D#]");
    }

    #[test]
    fn test_same_key_returns_input_verbatim() {
        let text = "[Bb]Santo, [A#m]santo [Intro]";
        let report = transpose_chart_with(text, "Bb", "A#", &TransposeOptions::default()).unwrap();
        assert_eq!(report.chart, text);
        assert_eq!(report.offset, 0);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_tokens_are_left_in_place() {
        let report = transpose_chart_with(
            "[Intro] [C] [H7] [G/B]",
            "C",
            "E",
            &TransposeOptions::default(),
        )
        .unwrap();
        assert_eq!(report.chart, "[Intro] [E] [H7] [B/D#]");
        let skipped: Vec<&str> = report.warnings.iter().map(|w| w.token.as_str()).collect();
        assert_eq!(skipped, vec!["Intro", "H7"]);
    }

    #[test]
    fn test_invalid_key_is_fatal() {
        let result = transpose_chart_with("[C]", "C", "X", &TransposeOptions::default());
        assert_eq!(result, Err(CifraError::InvalidKey("X".to_string())));
        let result = transpose_chords_with(&["C"], "Q", "C", None);
        assert_eq!(result, Err(CifraError::InvalidKey("Q".to_string())));
    }

    #[test]
    fn test_shift_chart_negative_semitones() {
        let report = shift_chart("[D]Te [A/C#]louvo", -2, Spelling::Sharps, Notation::Bracketed);
        assert_eq!(report.chart, "[C]Te [G/B]louvo");
        assert_eq!(report.offset, 10);
    }

    #[test]
    fn test_shift_chart_chord_lines() {
        let text = "G        D/F#\nQuão grande és tu\n";
        let report = shift_chart(text, 2, Spelling::Sharps, Notation::ChordLines);
        assert_eq!(report.chart, "A        E/G#\nQuão grande és tu\n");
    }

    #[test]
    fn test_shift_chart_plain_punctuation() {
        let report = transpose_chart_with(
            "C, G, Am. (F)",
            "C",
            "D",
            &TransposeOptions {
                notation: Notation::Plain,
                spelling: None,
            },
        )
        .unwrap();
        assert_eq!(report.chart, "D, A, Bm. (G)");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_shift_chords_keeps_padding() {
        let out = shift_chords(&[" C", "G/B  ", "\tAm "], 2, Spelling::Sharps);
        assert_eq!(out, vec![" D", "A/C#  ", "\tBm "]);
    }

    #[test]
    fn test_shift_chords_keeps_non_chords() {
        let out = shift_chords(&["C", "N.C.", "G/B"], 7, Spelling::Sharps);
        assert_eq!(out, vec!["G", "N.C.", "D/F#"]);
    }
}
