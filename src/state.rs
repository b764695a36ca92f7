//! Interactive transposition state.
//!
//! The caller owns a [`KeyContext`] and the chart as stored in its original
//! key. Each step returns the new context together with the chart rendered in
//! the key the context now points at; the chart passed in is never modified.
//!
//! Offsets cycle through `0..=11`: there is no terminal state, and any
//! sequence of `up`/`down` steps with the same net count lands on the same
//! context and the same text.

use crate::error::CifraError;
use crate::parser::Notation;
use crate::pitch::{Key, PitchClass, Spelling};
use crate::transpose::shift_chart;
use serde::Serialize;

/// Transposition applied to a chart relative to its stored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyContext {
    pub original_key: PitchClass,
    pub semitone_offset: i8,
}

/// A context and the chart rendered for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateStep {
    pub context: KeyContext,
    pub chart: String,
}

impl KeyContext {
    /// Untransposed context for a chart stored in `original_key`.
    pub fn new(original_key: PitchClass) -> Self {
        Self {
            original_key,
            semitone_offset: 0,
        }
    }

    /// Context with an explicit offset in `-11..=11`, stored as the
    /// equivalent upward offset in `0..=11`.
    pub fn with_offset(original_key: PitchClass, semitone_offset: i32) -> Result<Self, CifraError> {
        if !(-11..=11).contains(&semitone_offset) {
            return Err(CifraError::InvalidOffset(semitone_offset));
        }
        Ok(Self {
            original_key,
            semitone_offset: semitone_offset.rem_euclid(12) as i8,
        })
    }

    /// The key currently displayed.
    pub fn current_key(&self) -> PitchClass {
        self.original_key.shift(self.semitone_offset as i32)
    }

    /// Spelling for the displayed key, using its conventional major-key name.
    pub fn spelling(&self) -> Spelling {
        Key::major(self.current_key()).spelling()
    }

    fn moved(&self, semitones: i32) -> Self {
        Self {
            original_key: self.original_key,
            semitone_offset: (self.semitone_offset as i32 + semitones).rem_euclid(12) as i8,
        }
    }

    /// Render `chart` (stored in the original key) for this context.
    pub fn render(&self, chart: &str, notation: Notation) -> String {
        if self.semitone_offset.rem_euclid(12) == 0 {
            return chart.to_string();
        }
        shift_chart(chart, self.semitone_offset as i32, self.spelling(), notation).chart
    }

    pub fn up(&self, chart: &str, notation: Notation) -> StateStep {
        let context = self.moved(1);
        StateStep {
            chart: context.render(chart, notation),
            context,
        }
    }

    pub fn down(&self, chart: &str, notation: Notation) -> StateStep {
        let context = self.moved(-1);
        StateStep {
            chart: context.render(chart, notation),
            context,
        }
    }

    /// Back to the original key. The chart comes back untouched.
    pub fn reset(&self, chart: &str) -> StateStep {
        StateStep {
            context: Self::new(self.original_key),
            chart: chart.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = "[G]Grande é o [D/F#]Senhor [Em]";

    #[test]
    fn test_initial_state() {
        let state = KeyContext::new(PitchClass::G);
        assert_eq!(state.semitone_offset, 0);
        assert_eq!(state.current_key(), PitchClass::G);
        assert_eq!(state.render(CHART, Notation::Bracketed), CHART);
    }

    #[test]
    fn test_up_and_down() {
        let state = KeyContext::new(PitchClass::G);
        let up = state.up(CHART, Notation::Bracketed);
        assert_eq!(up.context.semitone_offset, 1);
        assert_eq!(up.context.current_key(), PitchClass::GSharp);
        // G# is displayed as Ab
        assert_eq!(up.chart, "[Ab]Grande é o [Eb/G]Senhor [Fm]");

        let down = up.context.down(CHART, Notation::Bracketed);
        assert_eq!(down.context, state);
        assert_eq!(down.chart, CHART);
    }

    #[test]
    fn test_down_wraps_around() {
        let state = KeyContext::new(PitchClass::C);
        let step = state.down("[C]", Notation::Bracketed);
        assert_eq!(step.context.semitone_offset, 11);
        assert_eq!(step.context.current_key(), PitchClass::B);
        assert_eq!(step.chart, "[B]");
    }

    #[test]
    fn test_twelve_ups_cycle_home() {
        let mut state = KeyContext::new(PitchClass::E);
        for _ in 0..12 {
            state = state.up(CHART, Notation::Bracketed).context;
        }
        assert_eq!(state, KeyContext::new(PitchClass::E));
    }

    #[test]
    fn test_net_offset_decides_result() {
        let state = KeyContext::new(PitchClass::G);
        let a = state.up(CHART, Notation::Bracketed);
        let b = state
            .up(CHART, Notation::Bracketed)
            .context
            .up(CHART, Notation::Bracketed)
            .context
            .down(CHART, Notation::Bracketed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_returns_original_chart() {
        let state = KeyContext::with_offset(PitchClass::G, 5).unwrap();
        let step = state.reset(CHART);
        assert_eq!(step.context.semitone_offset, 0);
        assert_eq!(step.chart, CHART);
    }

    #[test]
    fn test_negative_offset_renders() {
        let state = KeyContext::with_offset(PitchClass::D, -2).unwrap();
        assert_eq!(state.current_key(), PitchClass::C);
        assert_eq!(state.render("[D] [A]", Notation::Bracketed), "[C] [G]");
    }

    #[test]
    fn test_negative_offset_is_stored_upward() {
        let state = KeyContext::with_offset(PitchClass::C, -3).unwrap();
        assert_eq!(state.semitone_offset, 9);
        assert_eq!(state, KeyContext::with_offset(PitchClass::C, 9).unwrap());

        let back = state.up("[C]", Notation::Bracketed).context.down("[C]", Notation::Bracketed);
        assert_eq!(back.context, state);
        assert_eq!(back.chart, "[A]");
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(
            KeyContext::with_offset(PitchClass::C, 12),
            Err(CifraError::InvalidOffset(12))
        );
        assert!(KeyContext::with_offset(PitchClass::C, -11).is_ok());
    }
}
