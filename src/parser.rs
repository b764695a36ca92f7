//! # Chord Token Parser
//!
//! Finds chord tokens in a chart and records where each one sits, so the
//! transposer can put rewritten chords back into exactly the same byte range.
//!
//! ## Notations
//! - [`Notation::Bracketed`]: `[G]Amazing [D/F#]grace`. Every bracket body is a
//!   chord candidate; a body that is not a chord (`[Intro]`) produces a warning.
//! - [`Notation::Plain`]: the whole text is a chord list separated by whitespace
//!   or bar lines (`C | G/B | Am`). Every token is a chord candidate once the
//!   punctuation around it is set aside: `C,` `Am.` and `(F)` are chords, while
//!   the parentheses in `A7(9)` stay part of the quality.
//! - [`Notation::ChordLines`]: chords on their own line above the lyrics. A line
//!   counts as a chord line only if all of its tokens are chords; other lines are
//!   lyrics and are never inspected further.

use crate::chord::Chord;
use crate::error::ChordWarning;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// How chords are marked up in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notation {
    #[default]
    Bracketed,
    Plain,
    ChordLines,
}

/// A chord and the byte range of its text in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordToken {
    pub chord: Chord,
    pub span: Range<usize>,
}

/// Chord tokens in document order, plus every candidate that failed to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub tokens: Vec<ChordToken>,
    pub warnings: Vec<ChordWarning>,
}

impl ParseReport {
    fn classify(&mut self, text: &str, span: Range<usize>) {
        let token = &text[span.clone()];
        match Chord::parse(token) {
            Some(chord) => self.tokens.push(ChordToken { chord, span }),
            None => {
                warn!("Skipping unparseable chord '{}' at byte {}", token, span.start);
                self.warnings.push(ChordWarning {
                    token: token.to_string(),
                    span,
                });
            }
        }
    }
}

/// Parse every chord token in `text` using the given notation.
pub fn parse_chart(text: &str, notation: Notation) -> ParseReport {
    match notation {
        Notation::Bracketed => parse_bracketed(text),
        Notation::Plain => parse_plain(text),
        Notation::ChordLines => parse_chord_lines(text),
    }
}

fn parse_bracketed(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut pos = 0;

    while let Some(open_rel) = text[pos..].find('[') {
        let body_start = pos + open_rel + 1;
        let Some(close_rel) = text[body_start..].find(']') else {
            break;
        };
        let close = body_start + close_rel;
        let body = &text[body_start..close];

        // "[[C]" -> the innermost bracket owns the chord
        if let Some(nested) = body.rfind('[') {
            pos = body_start + nested;
            continue;
        }

        let start = body_start + (body.len() - body.trim_start().len());
        let end = body_start + body.trim_end().len();
        if start < end {
            report.classify(text, start..end);
        }
        pos = close + 1;
    }

    report
}

/// Punctuation that may surround a token without being part of it
const EDGE_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '(', ')'];

/// Shrink `span` past leading and trailing punctuation. A closing parenthesis
/// is only dropped when it has no opening partner inside the token.
fn trim_punctuation(text: &str, span: Range<usize>) -> Range<usize> {
    let token = &text[span.clone()];
    let lead = token.len() - token.trim_start_matches(&EDGE_PUNCTUATION[..]).len();
    let mut token = &token[lead..];

    loop {
        let Some(last) = token.chars().last() else {
            break;
        };
        let unbalanced = last == ')' && token.matches(')').count() > token.matches('(').count();
        if matches!(last, '.' | ',' | ';' | ':' | '(') || unbalanced {
            token = &token[..token.len() - 1];
        } else {
            break;
        }
    }

    let start = span.start + lead;
    start..start + token.len()
}

/// Spans of the tokens in `line`, offset to positions in the whole text.
/// Empty tokens left after trimming punctuation are dropped.
fn plain_spans(line: &str, offset: usize) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in line.char_indices() {
        let delimiter = c.is_whitespace() || c == '|';
        match (start, delimiter) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                spans.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..line.len());
    }

    spans
        .into_iter()
        .map(|span| trim_punctuation(line, span))
        .filter(|span| !span.is_empty())
        .map(|span| offset + span.start..offset + span.end)
        .collect()
}

fn parse_plain(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for span in plain_spans(text, 0) {
        report.classify(text, span);
    }
    report
}

fn parse_chord_lines(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let spans = plain_spans(line, offset);
        let chords: Option<Vec<ChordToken>> = spans
            .into_iter()
            .map(|span| {
                Chord::parse(&text[span.clone()]).map(|chord| ChordToken { chord, span })
            })
            .collect();

        if let Some(chords) = chords {
            report.tokens.extend(chords);
        }
        offset += line.len();
    }

    report
}

/// Chords of a bracketed chart, in document order.
pub fn parse_chords(text: &str) -> Vec<Chord> {
    parse_chart(text, Notation::Bracketed)
        .tokens
        .into_iter()
        .map(|token| token.chord)
        .collect()
}

/// Distinct chords of a chart in first-seen order.
pub fn chord_vocabulary(text: &str, notation: Notation) -> Vec<Chord> {
    let mut seen = HashSet::new();
    parse_chart(text, notation)
        .tokens
        .into_iter()
        .map(|token| token.chord)
        .filter(|chord| seen.insert(chord.clone()))
        .collect()
}
