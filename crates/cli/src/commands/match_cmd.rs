use serde::Serialize;

use glowmatch_airtable::{
    AirtableClient, CaseSource, FixtureCaseSource, LoadOutcome, RemoteCaseSource, SourceError,
};
use glowmatch_core::config::{AppConfig, LoadOptions};
use glowmatch_core::domain::case::{EthnicBackground, SkinTone, SkinType};
use glowmatch_core::{Area, AgeRange, CategoryId, MatchEngine, TreatmentGroup, UserSelection};

use super::{CommandResult, EXIT_CONFIG, EXIT_INPUT, EXIT_INTEGRATION};
use crate::MatchArgs;

#[derive(Debug, Serialize)]
struct MatchReport<'a> {
    source: String,
    cases_loaded: usize,
    records_skipped: usize,
    groups: &'a [TreatmentGroup],
}

pub fn run(args: &MatchArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("match", "config_validation", error.to_string(), EXIT_CONFIG)
        }
    };

    let engine = MatchEngine::builtin().with_min_score(config.matching.min_score);

    let selection = match build_selection(args, &engine) {
        Ok(selection) => selection,
        Err(message) => {
            return CommandResult::failure("match", "invalid_selection", message, EXIT_CONFIG)
        }
    };

    let (source_label, outcome) = match fetch_cases(args, &config) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    let groups = engine.run(&outcome.cases, &selection);

    if args.json {
        let report = MatchReport {
            source: source_label,
            cases_loaded: outcome.cases.len(),
            records_skipped: outcome.skipped,
            groups: &groups,
        };
        let output = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
        CommandResult { exit_code: 0, output }
    } else {
        CommandResult { exit_code: 0, output: render_human(&source_label, &outcome, &groups) }
    }
}

fn build_selection(args: &MatchArgs, engine: &MatchEngine) -> Result<UserSelection, String> {
    let mut selection = UserSelection::new();

    for concern in &args.concerns {
        let id = CategoryId::from(concern.as_str());
        if engine.catalog().get(&id).is_none() {
            let known: Vec<&str> = engine.catalog().category_ids().map(|id| id.as_str()).collect();
            return Err(format!(
                "unknown concern `{concern}` (expected one of: {})",
                known.join(", ")
            ));
        }
        selection.select_concern(id).map_err(|error| error.to_string())?;
    }

    for area in &args.areas {
        let area = area.parse::<Area>().map_err(|error| error.to_string())?;
        selection.select_area(area).map_err(|error| error.to_string())?;
    }

    if let Some(raw) = &args.age_range {
        selection.set_age_range(Some(raw.parse::<AgeRange>().map_err(|e| e.to_string())?));
    }
    if let Some(raw) = &args.skin_type {
        selection.set_skin_type(Some(raw.parse::<SkinType>().map_err(|e| e.to_string())?));
    }
    if let Some(raw) = &args.skin_tone {
        selection.set_skin_tone(Some(raw.parse::<SkinTone>().map_err(|e| e.to_string())?));
    }
    if let Some(raw) = &args.ethnicity {
        selection
            .set_ethnic_background(Some(raw.parse::<EthnicBackground>().map_err(|e| e.to_string())?));
    }

    Ok(selection)
}

fn fetch_cases(args: &MatchArgs, config: &AppConfig) -> Result<(String, LoadOutcome), CommandResult> {
    let source: Box<dyn CaseSource> = if let Some(path) = &args.cases {
        Box::new(FixtureCaseSource::new(path.clone()))
    } else if args.remote {
        let client = AirtableClient::new(&config.airtable).map_err(|error| {
            CommandResult::failure("match", "airtable_credentials", error.to_string(), EXIT_CONFIG)
        })?;
        Box::new(RemoteCaseSource::new(client))
    } else {
        return Err(CommandResult::failure(
            "match",
            "missing_source",
            "either --cases <file> or --remote is required",
            EXIT_CONFIG,
        ));
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            CommandResult::failure(
                "match",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_INTEGRATION,
            )
        })?;

    let label = source.describe();
    match runtime.block_on(source.fetch_cases()) {
        Ok(outcome) => Ok((label, outcome)),
        Err(error @ SourceError::Fixture(_)) => {
            Err(CommandResult::failure("match", "case_input", error.to_string(), EXIT_INPUT))
        }
        Err(error @ SourceError::Airtable(_)) => Err(CommandResult::failure(
            "match",
            "airtable_integration",
            error.to_string(),
            EXIT_INTEGRATION,
        )),
    }
}

fn render_human(source: &str, outcome: &LoadOutcome, groups: &[TreatmentGroup]) -> String {
    let mut lines = vec![format!(
        "source: {source} ({} cases loaded, {} records skipped)",
        outcome.cases.len(),
        outcome.skipped
    )];

    if groups.is_empty() {
        lines.push("no matching cases".to_string());
        return lines.join("\n");
    }

    let total: usize = groups.iter().map(|group| group.case_count()).sum();
    lines.push(format!("matched {} groups across {} cases:", groups.len(), total));
    lines.push(String::new());

    for (index, group) in groups.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} cases, top score {} ({})",
            index + 1,
            group.concern,
            group.case_count(),
            group.top_score().unwrap_or(0),
            group.treatments.join(", ")
        ));
        for matched in &group.cases {
            lines.push(format!(
                "   {:>3}  {}  {}",
                matched.matching_score,
                matched.case.id.as_str(),
                matched.case.name
            ));
        }
    }

    lines.join("\n")
}
