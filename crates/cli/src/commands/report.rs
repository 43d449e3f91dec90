use serde::Serialize;

use glowmatch_airtable::{load_cases, read_export};
use glowmatch_core::domain::case::{Case, SkinTone, SkinType};
use glowmatch_core::matching::matcher::matches_category;
use glowmatch_core::{AgeRange, CategoryCatalog};

use super::{CommandResult, EXIT_INPUT};
use crate::{ReportArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct CountRow {
    label: String,
    count: usize,
}

/// Demographic and coverage summary of one case collection.
#[derive(Debug, Serialize)]
struct CaseReport {
    total_cases: usize,
    records_skipped: usize,
    surgical_cases: usize,
    missing_age: usize,
    missing_skin_type: usize,
    age_buckets: Vec<CountRow>,
    skin_types: Vec<CountRow>,
    skin_tones: Vec<CountRow>,
    category_coverage: Vec<CountRow>,
}

pub fn run(args: &ReportArgs) -> CommandResult {
    let records = match read_export(&args.cases) {
        Ok(records) => records,
        Err(error) => {
            return CommandResult::failure("report", "case_input", error.to_string(), EXIT_INPUT)
        }
    };

    let outcome = load_cases(&records);
    let report = build_report(&outcome.cases, outcome.skipped, &CategoryCatalog::builtin());

    let output = match args.format {
        ReportFormat::Markdown => render_markdown(&report),
        ReportFormat::Csv => render_csv(&report),
    };
    CommandResult { exit_code: 0, output }
}

fn build_report(cases: &[Case], skipped: usize, catalog: &CategoryCatalog) -> CaseReport {
    let count = |predicate: &dyn Fn(&&Case) -> bool| cases.iter().filter(predicate).count();

    let age_buckets = AgeRange::ALL
        .iter()
        .map(|range| CountRow {
            label: range.label().to_string(),
            count: cases
                .iter()
                .filter(|case| case.patient_age.and_then(AgeRange::containing) == Some(*range))
                .count(),
        })
        .collect();

    let skin_types = [
        SkinType::TypeI,
        SkinType::TypeII,
        SkinType::TypeIII,
        SkinType::TypeIV,
        SkinType::TypeV,
        SkinType::TypeVI,
    ]
    .iter()
    .map(|skin_type| CountRow {
        label: skin_type.label().to_string(),
        count: count(&|case| case.skin_type == Some(*skin_type)),
    })
    .collect();

    let skin_tones = [
        SkinTone::Fair,
        SkinTone::Light,
        SkinTone::Medium,
        SkinTone::Olive,
        SkinTone::Brown,
        SkinTone::Dark,
    ]
    .iter()
    .map(|tone| CountRow {
        label: tone.label().to_string(),
        count: count(&|case| case.skin_tone == Some(*tone)),
    })
    .collect();

    let category_coverage = catalog
        .categories()
        .iter()
        .map(|compiled| CountRow {
            label: compiled.category.display_name.clone(),
            count: count(&|case| matches_category(case, compiled)),
        })
        .collect();

    CaseReport {
        total_cases: cases.len(),
        records_skipped: skipped,
        surgical_cases: count(&|case| case.is_surgical()),
        missing_age: count(&|case| case.patient_age.is_none()),
        missing_skin_type: count(&|case| case.skin_type.is_none()),
        age_buckets,
        skin_types,
        skin_tones,
        category_coverage,
    }
}

fn render_markdown(report: &CaseReport) -> String {
    let mut lines = vec![
        "# Case collection report".to_string(),
        String::new(),
        format!("- total cases: {}", report.total_cases),
        format!("- records skipped on load: {}", report.records_skipped),
        format!("- surgical cases (excluded from matching): {}", report.surgical_cases),
        format!("- missing age: {}", report.missing_age),
        format!("- missing skin type: {}", report.missing_skin_type),
    ];

    for (title, rows) in [
        ("Age distribution", &report.age_buckets),
        ("Skin types", &report.skin_types),
        ("Skin tones", &report.skin_tones),
        ("Category coverage", &report.category_coverage),
    ] {
        lines.push(String::new());
        lines.push(format!("## {title}"));
        lines.push(String::new());
        lines.push("| label | cases |".to_string());
        lines.push("| --- | ---: |".to_string());
        for row in rows {
            lines.push(format!("| {} | {} |", row.label, row.count));
        }
    }

    lines.join("\n")
}

fn render_csv(report: &CaseReport) -> String {
    let mut lines = vec![
        "section,label,count".to_string(),
        format!("summary,total_cases,{}", report.total_cases),
        format!("summary,records_skipped,{}", report.records_skipped),
        format!("summary,surgical_cases,{}", report.surgical_cases),
        format!("summary,missing_age,{}", report.missing_age),
        format!("summary,missing_skin_type,{}", report.missing_skin_type),
    ];

    for (section, rows) in [
        ("age", &report.age_buckets),
        ("skin_type", &report.skin_types),
        ("skin_tone", &report.skin_tones),
        ("category", &report.category_coverage),
    ] {
        for row in rows {
            lines.push(format!("{section},{},{}", escape_csv(&row.label), row.count));
        }
    }

    lines.join("\n")
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cases() -> Vec<Case> {
        let mut hollow = Case::new("rec1", "Resolve Under Eye Hollow with Filler");
        hollow.patient_age = Some(45);
        hollow.skin_type = Some(SkinType::TypeIII);

        let mut facelift = Case::new("rec2", "Lower Facelift");
        facelift.surgical = Some(true);

        let brow = Case::new("rec3", "Brow Refresh");

        vec![hollow, facelift, brow]
    }

    #[test]
    fn report_counts_are_exact() {
        let report = build_report(&sample_cases(), 1, &CategoryCatalog::builtin());
        assert_eq!(report.total_cases, 3);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.surgical_cases, 1);
        assert_eq!(report.missing_age, 2);
        assert_eq!(report.missing_skin_type, 2);

        let bucket_40s = report.age_buckets.iter().find(|row| row.label == "40-49").unwrap();
        assert_eq!(bucket_40s.count, 1);

        let volume = report
            .category_coverage
            .iter()
            .find(|row| row.label == "Restore Volume & Definition")
            .unwrap();
        assert_eq!(volume.count, 1);
    }

    #[test]
    fn markdown_rendering_has_every_section() {
        let output = render_markdown(&build_report(&sample_cases(), 0, &CategoryCatalog::builtin()));
        for heading in ["# Case collection report", "## Age distribution", "## Skin types", "## Skin tones", "## Category coverage"] {
            assert!(output.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn csv_rendering_escapes_commas_in_labels() {
        let output = render_csv(&build_report(&sample_cases(), 0, &CategoryCatalog::builtin()));
        assert!(output.starts_with("section,label,count"));
        assert!(output.contains("category,Smooth Wrinkles & Lines,"));
    }
}
