//! # Error Types
//!
//! Fatal errors are [`CifraError`]. They abort the whole call, since a chart
//! transposed toward a meaningless key is itself meaningless.
//!
//! Chord tokens that fail the chord grammar are not errors. They come back as
//! [`ChordWarning`]s next to the result and the token is left verbatim.
//!
//! ## Usage
//! ```rust
//! use cifra::{transpose_chart, CifraError};
//!
//! match transpose_chart("[C]Amazing grace", "C", "H") {
//!     Ok(chart) => println!("{}", chart),
//!     Err(CifraError::InvalidKey(key)) => eprintln!("Unknown key {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CifraError {
    /// A key that does not resolve to one of the 12 pitch classes.
    ///
    /// # Example
    /// ```
    /// # use cifra::CifraError;
    /// let err = CifraError::InvalidKey("H".to_string());
    /// assert_eq!(err.to_string(), "Invalid key: H");
    /// ```
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A semitone offset outside `-11..=11`.
    #[error("Invalid semitone offset {0}: expected a value between -11 and 11")]
    InvalidOffset(i32),

    /// Invalid song frontmatter, or a lookup into it that failed.
    ///
    /// # Example
    /// ```
    /// # use cifra::CifraError;
    /// let err = CifraError::MetadataError("missing key".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: missing key");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
}

/// A token in chord position that is not a chord.
///
/// `span` is the byte range of the token in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordWarning {
    pub token: String,
    pub span: Range<usize>,
}

impl std::fmt::Display for ChordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unparseable chord '{}' at {}..{}",
            self.token, self.span.start, self.span.end
        )
    }
}
