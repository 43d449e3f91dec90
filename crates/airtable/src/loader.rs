use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use glowmatch_core::domain::case::{Case, EthnicBackground, SkinTone, SkinType, SunResponse};
use glowmatch_core::errors::DomainError;

use crate::client::AirtableRecord;

/// Field-name fallback chains. The base has been renamed and re-imported over
/// the years, so several historical column names map to each case field; the
/// first present, non-empty one wins.
const NAME_FIELDS: &[&str] = &["Name", "Case Name", "Title"];
const HEADLINE_FIELDS: &[&str] = &["Headline", "Story", "Treatment Description"];
const AGE_FIELDS: &[&str] = &["Patient Age", "Age"];
const SOLVED_ISSUE_FIELDS: &[&str] = &["Solved Issues", "Issues Solved", "Solved"];
const CRITERIA_FIELDS: &[&str] = &["Matching Criteria", "Criteria"];
const DIRECT_ISSUE_FIELDS: &[&str] = &["Direct Matching Issues", "Matching Issues"];
const SKIN_TYPE_FIELDS: &[&str] = &["Skin Type", "Fitzpatrick Type"];
const SKIN_TONE_FIELDS: &[&str] = &["Skin Tone", "Skin Color"];
const ETHNIC_FIELDS: &[&str] = &["Ethnic Background", "Ethnicity"];
const SUN_RESPONSE_FIELDS: &[&str] = &["Sun Response", "Reaction To Sun"];
const SURGICAL_FIELDS: &[&str] = &["Surgical", "Is Surgical"];
const PHOTO_FIELDS: &[&str] = &["Photos", "Before After", "Images"];

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("record `{record_id}`: {source}")]
    InvalidField {
        record_id: String,
        #[source]
        source: DomainError,
    },
}

/// Result of normalizing a batch of raw records.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub cases: Vec<Case>,
    pub skipped: usize,
}

/// Normalize one raw record into a [`Case`].
///
/// Missing fields become "unknown" (the core treats them as partial-credit or
/// zero-contribution inputs). A present but unrecognizable enum value is an
/// error: this is the single validation point for external vocabulary, so bad
/// values surface here instead of silently mismatching inside scoring.
pub fn case_from_record(record: &AirtableRecord) -> Result<Case, LoaderError> {
    let fields = &record.fields;

    let mut case = Case::new(
        record.id.clone(),
        first_string(fields, NAME_FIELDS).unwrap_or_default(),
    );
    case.headline = first_string(fields, HEADLINE_FIELDS).unwrap_or_default();
    case.patient_age = first_age(fields, AGE_FIELDS);
    case.solved_issues = first_string_list(fields, SOLVED_ISSUE_FIELDS);
    case.matching_criteria = first_string_list(fields, CRITERIA_FIELDS);
    case.direct_matching_issues = first_string_list(fields, DIRECT_ISSUE_FIELDS);
    case.skin_type = parse_enum::<SkinType>(record, fields, SKIN_TYPE_FIELDS)?;
    case.skin_tone = parse_enum::<SkinTone>(record, fields, SKIN_TONE_FIELDS)?;
    case.ethnic_background = parse_enum::<EthnicBackground>(record, fields, ETHNIC_FIELDS)?;
    case.sun_response = parse_enum::<SunResponse>(record, fields, SUN_RESPONSE_FIELDS)?;
    case.surgical = first_bool(fields, SURGICAL_FIELDS);
    case.photo_urls = first_attachment_urls(fields, PHOTO_FIELDS);
    case.created_at = record.created_time;

    Ok(case)
}

/// Normalize a batch, skipping records that fail validation with a warning
/// rather than aborting the whole fetch.
pub fn load_cases(records: &[AirtableRecord]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for record in records {
        match case_from_record(record) {
            Ok(case) => outcome.cases.push(case),
            Err(error) => {
                warn!(record_id = %record.id, %error, "skipping unloadable record");
                outcome.skipped += 1;
            }
        }
    }

    outcome
}

fn first_value<'a>(fields: &'a Map<String, Value>, chain: &[&str]) -> Option<&'a Value> {
    chain.iter().find_map(|name| fields.get(*name)).filter(|value| !value.is_null())
}

fn first_string(fields: &Map<String, Value>, chain: &[&str]) -> Option<String> {
    chain
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(|value| value.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_owned)
}

fn first_age(fields: &Map<String, Value>, chain: &[&str]) -> Option<u8> {
    let value = first_value(fields, chain)?;
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u8>().ok(),
        _ => None,
    }
}

// List fields arrive either as real arrays (multi-select columns) or as one
// comma/newline-separated text cell, depending on the column's era.
fn first_string_list(fields: &Map<String, Value>, chain: &[&str]) -> Vec<String> {
    let Some(value) = first_value(fields, chain) else {
        return Vec::new();
    };
    match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| entry.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Value::String(text) => text
            .split(|c| c == ',' || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn first_bool(fields: &Map<String, Value>, chain: &[&str]) -> Option<bool> {
    let value = first_value(fields, chain)?;
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "checked" | "1" => Some(true),
            "false" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// Attachment cells are arrays of objects; only the URL matters downstream.
fn first_attachment_urls(fields: &Map<String, Value>, chain: &[&str]) -> Vec<String> {
    let Some(Value::Array(attachments)) = first_value(fields, chain) else {
        return Vec::new();
    };
    attachments
        .iter()
        .filter_map(|attachment| attachment.get("url"))
        .filter_map(|url| url.as_str())
        .map(str::to_owned)
        .collect()
}

fn parse_enum<T>(
    record: &AirtableRecord,
    fields: &Map<String, Value>,
    chain: &[&str],
) -> Result<Option<T>, LoaderError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    match first_string(fields, chain) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|source| LoaderError::InvalidField { record_id: record.id.clone(), source }),
    }
}
