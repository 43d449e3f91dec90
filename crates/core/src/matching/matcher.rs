use crate::catalog::{AreaRule, CompiledCategory};
use crate::domain::area::Area;
use crate::domain::case::Case;

/// Does `case` qualify for `category`?
///
/// Name match OR criteria match OR issue match; the checks are independent
/// and any one suffices. A case with no name, criteria, or issues matches
/// nothing.
pub fn matches_category(case: &Case, category: &CompiledCategory) -> bool {
    name_match(case, category) || criteria_match(case, category) || issue_match(case, category)
}

fn name_match(case: &Case, category: &CompiledCategory) -> bool {
    category.photo_patterns.iter().any(|pattern| pattern.is_match(&case.name))
}

fn criteria_match(case: &Case, category: &CompiledCategory) -> bool {
    category
        .photo_patterns
        .iter()
        .any(|pattern| case.matching_criteria.iter().any(|entry| pattern.is_match(entry)))
}

fn issue_match(case: &Case, category: &CompiledCategory) -> bool {
    if category.issue_patterns.is_empty() {
        return false;
    }

    let union: Vec<String> = case
        .solved_issues
        .iter()
        .chain(case.direct_matching_issues.iter())
        .chain(case.matching_criteria.iter())
        .map(|entry| entry.to_lowercase())
        .collect();
    if union.is_empty() {
        return false;
    }

    category.issue_patterns.iter().any(|pattern| {
        let keyword = pattern.keyword().to_lowercase();
        union.iter().any(|entry| {
            entry.contains(&keyword) || keyword.contains(entry.as_str()) || pattern.is_match(entry)
        })
    })
}

/// Areas the case's text touches, scanned in specificity order.
///
/// Within a rule, keywords are tried longest-first and the rule stops at its
/// first hit. A keyword that is a substring of an already-matched keyword may
/// not claim a different area: "brow ptosis" claiming Forehead suppresses the
/// generic "brow" rule for Eyes. Overlapping but non-nested keywords are not
/// deduplicated (observed behavior, kept as-is).
pub fn matched_areas(case: &Case, rules: &[AreaRule]) -> Vec<Area> {
    let haystack = [
        case.name.to_lowercase(),
        case.matching_criteria.join(" ").to_lowercase(),
        case.solved_issues.join(" ").to_lowercase(),
    ]
    .join(" ");
    if haystack.trim().is_empty() {
        return Vec::new();
    }

    let mut touched: Vec<Area> = Vec::new();
    let mut matched_keywords: Vec<&str> = Vec::new();

    for rule in rules {
        for keyword in &rule.keywords {
            let suppressed = matched_keywords
                .iter()
                .any(|longer| longer.len() > keyword.len() && longer.contains(keyword.as_str()));
            if suppressed {
                continue;
            }
            if haystack.contains(keyword.as_str()) {
                matched_keywords.push(keyword);
                if !touched.contains(&rule.area) {
                    touched.push(rule.area);
                }
                break;
            }
        }
    }

    touched
}

/// Area filter predicate: opt-in, so an empty selection always passes.
pub fn matches_area(case: &Case, selected: &[Area], rules: &[AreaRule]) -> bool {
    if selected.is_empty() {
        return true;
    }
    matched_areas(case, rules).iter().any(|area| selected.contains(area))
}
