use serde::{Deserialize, Serialize};

use crate::domain::case::Case;

/// A case annotated with its relevance score and display labels.
///
/// Ephemeral: recomputed on every matching pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedCase {
    pub case: Case,
    /// Relevance score in `0..=100`.
    pub matching_score: u8,
    /// Display grouping label derived from the case name.
    pub concern: String,
    /// Procedure label derived from the case name.
    pub treatment: String,
}

/// Cases sharing one extracted concern label, ready for presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreatmentGroup {
    pub concern: String,
    /// Distinct treatment labels seen among members, first-seen order.
    pub treatments: Vec<String>,
    /// Members sorted by `matching_score` descending, ties in input order.
    pub cases: Vec<MatchedCase>,
}

impl TreatmentGroup {
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn top_score(&self) -> Option<u8> {
        self.cases.first().map(|matched| matched.matching_score)
    }
}
