use serde::{Deserialize, Serialize};

use super::matcher::matches_category;
use super::{MAX_CATEGORY_POINTS, MAX_SCORE, SKIN_TYPE_POINTS, UNKNOWN_AGE_POINTS};
use crate::catalog::CategoryCatalog;
use crate::domain::case::{Case, SkinType};
use crate::domain::selection::{AgeRange, UserSelection};

/// Individual components of the 0-100 relevance score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Age proximity, max 30.
    pub age: u8,
    /// Category match ratio, max 50.
    pub category: u8,
    /// Skin-type equality, max 20.
    pub skin_type: u8,
}

impl ScoreBreakdown {
    /// Component sum, clamped to 100. The maxima already sum to exactly 100,
    /// so the clamp is a safety net, not an active constraint.
    pub fn total(&self) -> u8 {
        (self.age as u16 + self.category as u16 + self.skin_type as u16).min(MAX_SCORE as u16) as u8
    }
}

/// Age proximity on a step function of absolute difference between the case's
/// age and the selected range's midpoint. Either side unknown earns flat
/// partial credit.
pub fn age_points(case_age: Option<u8>, selected: Option<AgeRange>) -> u8 {
    let (Some(age), Some(range)) = (case_age, selected) else {
        return UNKNOWN_AGE_POINTS;
    };
    let diff = (age as i16 - range.midpoint() as i16).unsigned_abs();
    match diff {
        0 => 30,
        1..=2 => 25,
        3..=5 => 20,
        6..=10 => 15,
        11..=15 => 10,
        _ => 5,
    }
}

/// 50 x (matched selected categories / selected categories), rounded to the
/// nearest integer. No selected categories contributes nothing.
pub fn category_points(case: &Case, selection: &UserSelection, catalog: &CategoryCatalog) -> u8 {
    let selected = selection.concerns();
    if selected.is_empty() {
        return 0;
    }
    let matched = selected
        .iter()
        .filter(|id| {
            catalog.get(id).is_some_and(|compiled| matches_category(case, compiled))
        })
        .count();
    let ratio = matched as f64 / selected.len() as f64;
    (MAX_CATEGORY_POINTS as f64 * ratio).round() as u8
}

/// All-or-nothing skin-type equality.
pub fn skin_type_points(case_skin: Option<SkinType>, selected: Option<SkinType>) -> u8 {
    match (case_skin, selected) {
        (Some(case_skin), Some(selected)) if case_skin == selected => SKIN_TYPE_POINTS,
        _ => 0,
    }
}

pub fn breakdown(case: &Case, selection: &UserSelection, catalog: &CategoryCatalog) -> ScoreBreakdown {
    ScoreBreakdown {
        age: age_points(case.patient_age, selection.age_range()),
        category: category_points(case, selection, catalog),
        skin_type: skin_type_points(case.skin_type, selection.skin_type()),
    }
}

/// The full 0-100 relevance score. Pure and deterministic: identical inputs
/// always yield the identical score.
pub fn score(case: &Case, selection: &UserSelection, catalog: &CategoryCatalog) -> u8 {
    breakdown(case, selection, catalog).total()
}
