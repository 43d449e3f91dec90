use super::extract::ConcernExtractor;
use super::grouper::group;
use super::matcher::{matches_area, matches_category};
use super::scoring::score;
use crate::catalog::CategoryCatalog;
use crate::domain::case::Case;
use crate::domain::group::{MatchedCase, TreatmentGroup};
use crate::domain::selection::UserSelection;

/// One full matching pass: filter, score, label, group.
///
/// Holds only immutable configuration (the catalog, the extractor, an
/// optional score floor), so a single engine can be re-invoked on every
/// selection change.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    catalog: CategoryCatalog,
    extractor: ConcernExtractor,
    min_score: u8,
}

impl MatchEngine {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self { catalog, extractor: ConcernExtractor::new(), min_score: 0 }
    }

    /// Engine over the hand-authored production catalog.
    pub fn builtin() -> Self {
        Self::new(CategoryCatalog::builtin())
    }

    /// Drop matched cases scoring below `min_score` before grouping.
    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn extractor(&self) -> &ConcernExtractor {
        &self.extractor
    }

    /// Score and label one case against the current selection.
    pub fn annotate(&self, case: &Case, selection: &UserSelection) -> MatchedCase {
        MatchedCase {
            matching_score: score(case, selection, &self.catalog),
            concern: self.extractor.concern(&case.name),
            treatment: self.extractor.treatment(&case.name),
            case: case.clone(),
        }
    }

    /// The ordered group list for one selection snapshot.
    ///
    /// Surgical cases are excluded outright; the concern filter only applies
    /// when concerns are selected, and the area filter is opt-in.
    pub fn run(&self, cases: &[Case], selection: &UserSelection) -> Vec<TreatmentGroup> {
        let matched: Vec<MatchedCase> = cases
            .iter()
            .filter(|case| !case.is_surgical())
            .filter(|case| self.passes_filters(case, selection))
            .map(|case| self.annotate(case, selection))
            .filter(|matched| matched.matching_score >= self.min_score)
            .collect();

        group(matched)
    }

    fn passes_filters(&self, case: &Case, selection: &UserSelection) -> bool {
        let concerns = selection.concerns();
        let concern_ok = concerns.is_empty()
            || concerns.iter().any(|id| {
                self.catalog
                    .get(id)
                    .is_some_and(|compiled| matches_category(case, compiled))
            });
        concern_ok && matches_area(case, selection.areas(), self.catalog.area_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::area::Area;
    use crate::domain::category::CategoryId;
    use crate::domain::selection::AgeRange;

    fn case(id: &str, name: &str) -> Case {
        Case::new(id, name)
    }

    fn volume_selection() -> UserSelection {
        UserSelection::new()
            .with_concerns([CategoryId::from("restore-volume-definition")])
            .unwrap()
    }

    #[test]
    fn end_to_end_walkthrough_scores_eighty_and_labels_correctly() {
        let engine = MatchEngine::builtin();
        let mut case = case("rec1", "Resolve Under Eye Hollow with Filler");
        case.patient_age = Some(45);
        case.solved_issues = vec!["under-eye-hollow".to_owned()];
        case.matching_criteria = vec!["hollow-cheeks".to_owned()];

        let mut selection = volume_selection();
        selection.set_age_range(Some(AgeRange::From40To49));

        let groups = engine.run(&[case], &selection);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].concern, "Resolve Under Eye Hollow");
        assert_eq!(groups[0].treatments, vec!["Filler".to_owned()]);
        assert_eq!(groups[0].cases[0].matching_score, 80);
    }

    #[test]
    fn surgical_cases_never_reach_the_output() {
        let engine = MatchEngine::builtin();
        let mut surgical = case("rec1", "Resolve Under Eye Hollow with Filler");
        surgical.surgical = Some(true);
        surgical.patient_age = Some(45);

        let groups = engine.run(&[surgical], &volume_selection());
        assert!(groups.is_empty());
    }

    #[test]
    fn unmatched_concern_filters_a_case_out() {
        let engine = MatchEngine::builtin();
        let groups = engine.run(
            &[case("rec1", "Hairline Restoration with PRP")],
            &volume_selection(),
        );
        assert!(groups.is_empty());
    }

    #[test]
    fn empty_selection_passes_all_non_surgical_cases() {
        let engine = MatchEngine::builtin();
        let mut surgical = case("rec2", "Facelift");
        surgical.surgical = Some(true);
        let cases = [case("rec1", "Brow Refresh"), surgical];

        let groups = engine.run(&cases, &UserSelection::new());
        let total: usize = groups.iter().map(|g| g.case_count()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn area_filter_narrows_the_result_set() {
        let engine = MatchEngine::builtin();
        let cases = [
            case("rec1", "Correct Brow Ptosis with Ultherapy"),
            case("rec2", "Tighten Neck via RF"),
        ];

        let selection = UserSelection::new().with_areas([Area::Forehead]).unwrap();
        let groups = engine.run(&cases, &selection);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].concern, "Correct Brow Ptosis");
    }

    #[test]
    fn min_score_floor_drops_weak_matches() {
        let engine = MatchEngine::builtin().with_min_score(50);
        // Unknown age (15) + no concern selected (0) + no skin type (0) = 15.
        let groups = engine.run(&[case("rec1", "Brow Refresh")], &UserSelection::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn reruns_are_deterministic() {
        let engine = MatchEngine::builtin();
        let cases = [
            case("rec1", "Resolve Under Eye Hollow with Filler"),
            case("rec2", "Restore Hollow Cheeks with Sculptra"),
        ];
        let selection = volume_selection();
        assert_eq!(engine.run(&cases, &selection), engine.run(&cases, &selection));
    }
}
