//! Answer-equivalence grading.
//!
//! Answer sets are compared as indicator vectors over [`LABEL_UNIVERSE`]:
//! order and duplicates do not matter, and labels outside the universe are
//! ignored. There is no partial credit.

use crate::model::LABEL_UNIVERSE;

/// Presence of each universe label in an answer set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IndicatorVector([bool; LABEL_UNIVERSE.len()]);

impl IndicatorVector {
    /// Project a label sequence onto the universe.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut bits = [false; LABEL_UNIVERSE.len()];
        for label in labels {
            if let Some(idx) = universe_index(label.as_ref()) {
                bits[idx] = true;
            }
        }
        Self(bits)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|bit| !bit)
    }

    pub fn bits(&self) -> [bool; LABEL_UNIVERSE.len()] {
        self.0
    }
}

fn universe_index(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => LABEL_UNIVERSE.iter().position(|&u| u == c),
        _ => None,
    }
}

/// Whether `label` has a bit in the indicator vector.
pub fn is_in_universe(label: &str) -> bool {
    universe_index(label).is_some()
}

/// Grade `proposed` against `correct`: `true` iff both select exactly the
/// same labels of the universe.
pub fn validate<C, P>(correct: &[C], proposed: &[P]) -> bool
where
    C: AsRef<str>,
    P: AsRef<str>,
{
    IndicatorVector::from_labels(correct) == IndicatorVector::from_labels(proposed)
}
