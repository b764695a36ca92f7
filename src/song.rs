//! Song files: a chart plus optional YAML frontmatter.
//!
//! ```text
//! ---
//! title: Grande é o Senhor
//! artist: Adhemar de Campos
//! key: G
//! notation: chord-lines
//! ministers:
//!   Ana: Bb
//!   Pedro: E
//! ---
//! G        D/F#
//! Grande é o Senhor
//! ```
//!
//! The frontmatter block may sit at the top or the bottom of the file. Every
//! field is optional; `key` is required only by the operations that need to
//! know where the chart starts from.

use crate::error::CifraError;
use crate::parser::Notation;
use crate::pitch::{Key, PitchClass};
use crate::state::KeyContext;
use crate::transpose::{transpose_chart_with, TransposeOptions, TransposeReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw frontmatter for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    title: Option<String>,
    artist: Option<String>,
    key: Option<String>,
    notation: Option<Notation>,
    #[serde(default)]
    ministers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Key the chart is written in, as spelled in the file
    pub key: Option<String>,
    pub notation: Notation,
    /// Minister name -> preferred key
    pub ministers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    pub metadata: SongMetadata,
    pub chart: String,
}

impl Song {
    pub fn parse(source: &str) -> Result<Self, CifraError> {
        let (frontmatter, chart) = split_frontmatter(source);
        let metadata = match frontmatter {
            Some(content) => parse_metadata(content)?,
            None => SongMetadata::default(),
        };
        Ok(Self { metadata, chart })
    }

    /// The chart's own key.
    pub fn key(&self) -> Result<&str, CifraError> {
        self.metadata
            .key
            .as_deref()
            .ok_or_else(|| CifraError::MetadataError("song has no key".to_string()))
    }

    pub fn options(&self) -> TransposeOptions {
        TransposeOptions {
            notation: self.metadata.notation,
            spelling: None,
        }
    }

    /// Transpose the chart from the song's key to `to`.
    pub fn transpose_to(&self, to: &str) -> Result<TransposeReport, CifraError> {
        transpose_chart_with(&self.chart, self.key()?, to, &self.options())
    }

    /// Transpose the chart to a minister's preferred key.
    pub fn transpose_for(&self, minister: &str) -> Result<TransposeReport, CifraError> {
        let key = self.preferred_key(minister)?;
        self.transpose_to(key)
    }

    pub fn preferred_key(&self, minister: &str) -> Result<&str, CifraError> {
        self.metadata
            .ministers
            .get(minister)
            .map(String::as_str)
            .ok_or_else(|| CifraError::MetadataError(format!("Unknown minister: {}", minister)))
    }

    /// Untransposed interactive state for this song.
    pub fn context(&self) -> Result<KeyContext, CifraError> {
        let root: PitchClass = Key::parse(self.key()?)?.root;
        Ok(KeyContext::new(root))
    }
}

fn parse_metadata(content: &str) -> Result<SongMetadata, CifraError> {
    let raw: RawMetadata = if content.trim().is_empty() {
        RawMetadata::default()
    } else {
        serde_yaml::from_str(content).map_err(|e| CifraError::MetadataError(e.to_string()))?
    };

    if let Some(key) = &raw.key {
        Key::parse(key)
            .map_err(|_| CifraError::MetadataError(format!("Invalid key: {}", key)))?;
    }
    for (name, key) in &raw.ministers {
        Key::parse(key).map_err(|_| {
            CifraError::MetadataError(format!("Invalid key for minister {}: {}", name, key))
        })?;
    }

    Ok(SongMetadata {
        title: raw.title,
        artist: raw.artist,
        key: raw.key,
        notation: raw.notation.unwrap_or_default(),
        ministers: raw.ministers,
    })
}

/// Split the first `---` delimited block off the source.
/// Returns (frontmatter_content, chart), leaving the chart bytes untouched.
fn split_frontmatter(source: &str) -> (Option<&str>, String) {
    let mut offset = 0;
    let mut open: Option<(usize, usize)> = None;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if line.trim() != "---" {
            continue;
        }
        match open {
            None => open = Some((start, offset)),
            Some((block_start, content_start)) => {
                let content = &source[content_start..start];
                let mut chart = String::with_capacity(source.len());
                chart.push_str(&source[..block_start]);
                chart.push_str(&source[offset..]);
                return (Some(content), chart);
            }
        }
    }

    (None, source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG: &str = "---
title: Grande é o Senhor
key: G
ministers:
  Ana: Bb
  Pedro: E
---
[G]Grande é o [D/F#]Senhor
";

    #[test]
    fn test_parse_frontmatter() {
        let song = Song::parse(SONG).unwrap();
        assert_eq!(song.metadata.title.as_deref(), Some("Grande é o Senhor"));
        assert_eq!(song.metadata.key.as_deref(), Some("G"));
        assert_eq!(song.metadata.notation, Notation::Bracketed);
        assert_eq!(song.metadata.ministers.len(), 2);
        assert_eq!(song.chart, "[G]Grande é o [D/F#]Senhor\n");
    }

    #[test]
    fn test_frontmatter_at_bottom() {
        let song = Song::parse("C  G\nLinha\n---\nkey: C\nnotation: chord-lines\n---\n").unwrap();
        assert_eq!(song.chart, "C  G\nLinha\n");
        assert_eq!(song.metadata.notation, Notation::ChordLines);
        assert_eq!(song.transpose_to("D").unwrap().chart, "D  A\nLinha\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let song = Song::parse("[C]Aleluia").unwrap();
        assert_eq!(song.metadata, SongMetadata::default());
        assert_eq!(song.chart, "[C]Aleluia");
        assert!(matches!(song.transpose_to("D"), Err(CifraError::MetadataError(_))));
    }

    #[test]
    fn test_transpose_for_minister() {
        let song = Song::parse(SONG).unwrap();
        assert_eq!(
            song.transpose_for("Ana").unwrap().chart,
            "[Bb]Grande é o [F/A]Senhor\n"
        );
        assert_eq!(
            song.transpose_for("Pedro").unwrap().chart,
            "[E]Grande é o [B/D#]Senhor\n"
        );
        assert_eq!(
            song.transpose_for("Maria"),
            Err(CifraError::MetadataError("Unknown minister: Maria".to_string()))
        );
    }

    #[test]
    fn test_invalid_metadata() {
        assert!(matches!(
            Song::parse("---\nkey: H\n---\n[C]"),
            Err(CifraError::MetadataError(_))
        ));
        assert!(matches!(
            Song::parse("---\nministers:\n  Ana: Z\n---\n"),
            Err(CifraError::MetadataError(_))
        ));
        assert!(matches!(
            Song::parse("---\ntitle: [unclosed\n---\n"),
            Err(CifraError::MetadataError(_))
        ));
    }

    #[test]
    fn test_song_context() {
        let song = Song::parse(SONG).unwrap();
        let context = song.context().unwrap();
        assert_eq!(context.current_key(), PitchClass::G);
    }
}
