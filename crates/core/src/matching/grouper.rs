use crate::domain::group::{MatchedCase, TreatmentGroup};

/// Group matched cases by extracted concern for presentation.
///
/// Members sort by score descending, groups sort by member count descending;
/// both sorts are stable, so ties keep their input encounter order. The
/// distinct treatment labels per group keep first-seen order.
pub fn group(matched: Vec<MatchedCase>) -> Vec<TreatmentGroup> {
    let mut groups: Vec<TreatmentGroup> = Vec::new();

    for entry in matched {
        match groups.iter_mut().find(|group| group.concern == entry.concern) {
            Some(group) => {
                if !group.treatments.contains(&entry.treatment) {
                    group.treatments.push(entry.treatment.clone());
                }
                group.cases.push(entry);
            }
            None => groups.push(TreatmentGroup {
                concern: entry.concern.clone(),
                treatments: vec![entry.treatment.clone()],
                cases: vec![entry],
            }),
        }
    }

    for group in &mut groups {
        group.cases.sort_by(|a, b| b.matching_score.cmp(&a.matching_score));
    }
    groups.sort_by(|a, b| b.cases.len().cmp(&a.cases.len()));

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::Case;

    fn matched(id: &str, concern: &str, treatment: &str, score: u8) -> MatchedCase {
        MatchedCase {
            case: Case::new(id, format!("{concern} with {treatment}")),
            matching_score: score,
            concern: concern.to_owned(),
            treatment: treatment.to_owned(),
        }
    }

    #[test]
    fn groups_order_by_member_count_descending() {
        let mut input = Vec::new();
        for i in 0..3 {
            input.push(matched(&format!("a{i}"), "Concern A", "Filler", 50));
        }
        for i in 0..5 {
            input.push(matched(&format!("b{i}"), "Concern B", "Laser", 50));
        }
        input.push(matched("c0", "Concern C", "Botox", 50));

        let groups = group(input);
        let order: Vec<&str> = groups.iter().map(|g| g.concern.as_str()).collect();
        assert_eq!(order, vec!["Concern B", "Concern A", "Concern C"]);
    }

    #[test]
    fn group_count_ties_keep_encounter_order() {
        let input = vec![
            matched("a0", "Concern A", "Filler", 10),
            matched("b0", "Concern B", "Laser", 99),
        ];
        let groups = group(input);
        let order: Vec<&str> = groups.iter().map(|g| g.concern.as_str()).collect();
        assert_eq!(order, vec!["Concern A", "Concern B"]);
    }

    #[test]
    fn cases_within_a_group_sort_by_score_descending_stably() {
        let input = vec![
            matched("a0", "Concern A", "Filler", 40),
            matched("a1", "Concern A", "Filler", 80),
            matched("a2", "Concern A", "Laser", 40),
        ];
        let groups = group(input);
        let ids: Vec<&str> =
            groups[0].cases.iter().map(|m| m.case.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a0", "a2"]);
    }

    #[test]
    fn treatments_are_distinct_in_first_seen_order() {
        let input = vec![
            matched("a0", "Concern A", "Filler", 10),
            matched("a1", "Concern A", "Laser", 90),
            matched("a2", "Concern A", "Filler", 50),
        ];
        let groups = group(input);
        assert_eq!(groups[0].treatments, vec!["Filler".to_owned(), "Laser".to_owned()]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group(Vec::new()).is_empty());
    }
}
