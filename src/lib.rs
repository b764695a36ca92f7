pub mod api;
pub mod chord;
pub mod error;
pub mod parser;
pub mod pitch;
pub mod song;
pub mod state;
pub mod transpose;

pub use api::*;
pub use chord::Chord;
pub use error::*;
pub use parser::{chord_vocabulary, parse_chart, parse_chords, ChordToken, Notation, ParseReport};
pub use pitch::{
    available_keys, directed_key_distance, key_distance, normalize_key, Key, PitchClass,
    Spelling, KEY_CIRCLE,
};
pub use song::{Song, SongMetadata};
pub use state::{KeyContext, StateStep};
pub use transpose::{
    plan_transposition, shift_chart, shift_chords, transpose_chart_with, transpose_chords_with,
    TransposeOptions, TransposeReport,
};
