//! Case-matching and scoring engine.
//!
//! Pure, synchronous functions over in-memory values: keyword patterns,
//! category/area predicates, the 0-100 relevance score, concern/treatment
//! label extraction, and grouping for presentation. No component here holds
//! state between calls or performs I/O.

pub mod engine;
pub mod extract;
pub mod grouper;
pub mod matcher;
pub mod pattern;
pub mod scoring;

pub use engine::MatchEngine;
pub use extract::ConcernExtractor;
pub use grouper::group;
pub use matcher::{matched_areas, matches_area, matches_category};
pub use pattern::KeywordPattern;
pub use scoring::{score, ScoreBreakdown};

/// Maximum points the age-proximity component can award.
pub const MAX_AGE_POINTS: u8 = 30;
/// Partial credit when either the user's or the case's age is unknown.
pub const UNKNOWN_AGE_POINTS: u8 = 15;
/// Maximum points the category-match component can award.
pub const MAX_CATEGORY_POINTS: u8 = 50;
/// Points for an exact skin-type match.
pub const SKIN_TYPE_POINTS: u8 = 20;
/// Ceiling for the total score; the component maxima already sum to this.
pub const MAX_SCORE: u8 = 100;

/// Fallback concern label when a case name strips down to nothing.
pub const GENERAL_CONCERN: &str = "General Concern";
/// Fallback treatment label when no method can be extracted.
pub const GENERAL_TREATMENT: &str = "General Treatment";
