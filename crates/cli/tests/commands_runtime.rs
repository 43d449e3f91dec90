use std::env;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, OnceLock};

use glowmatch_cli::commands::{catalog, config, doctor, match_cmd, report};
use glowmatch_cli::{MatchArgs, ReportArgs, ReportFormat};
use serde_json::Value;

const GLOWMATCH_VARS: &[&str] = &[
    "GLOWMATCH_AIRTABLE_API_KEY",
    "GLOWMATCH_AIRTABLE_BASE_ID",
    "GLOWMATCH_AIRTABLE_TABLE",
    "GLOWMATCH_AIRTABLE_API_URL",
    "GLOWMATCH_AIRTABLE_TIMEOUT_SECS",
    "GLOWMATCH_AIRTABLE_PAGE_SIZE",
    "GLOWMATCH_MATCHING_MIN_SCORE",
    "GLOWMATCH_LOGGING_LEVEL",
    "GLOWMATCH_LOG_LEVEL",
    "GLOWMATCH_LOGGING_FORMAT",
    "GLOWMATCH_LOG_FORMAT",
];

fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_env<F: FnOnce()>(vars: &[(&str, &str)], body: F) {
    let _guard = env_lock();
    for key in GLOWMATCH_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    body();
    for key in GLOWMATCH_VARS {
        env::remove_var(key);
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn write_export(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn sample_export() -> tempfile::NamedTempFile {
    write_export(
        r#"{"records": [
            {"id": "rec1", "fields": {
                "Name": "Resolve Under Eye Hollow with Filler",
                "Patient Age": 45,
                "Solved Issues": ["under-eye-hollow"],
                "Matching Criteria": "hollow-cheeks"
            }},
            {"id": "rec2", "fields": {
                "Name": "Restore Hollow Cheeks with Sculptra",
                "Patient Age": 52
            }},
            {"id": "rec3", "fields": {
                "Name": "Lower Facelift",
                "Surgical": true
            }},
            {"id": "rec4", "fields": {
                "Name": "Resolve Under Eye Hollow with PRP",
                "Patient Age": 47
            }}
        ]}"#,
    )
}

fn match_args() -> MatchArgs {
    MatchArgs {
        cases: None,
        remote: false,
        concerns: Vec::new(),
        areas: Vec::new(),
        age_range: None,
        skin_type: None,
        skin_tone: None,
        ethnicity: None,
        json: false,
    }
}

#[test]
fn match_without_a_source_fails_with_guidance() {
    with_env(&[], || {
        let result = match_cmd::run(&match_args());
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "match");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "missing_source");
    });
}

#[test]
fn match_with_missing_export_fails_as_input_error() {
    with_env(&[], || {
        let mut args = match_args();
        args.cases = Some("/nonexistent/export.json".into());
        let result = match_cmd::run(&args);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "case_input");
    });
}

#[test]
fn match_with_unknown_concern_fails_validation() {
    with_env(&[], || {
        let export = sample_export();
        let mut args = match_args();
        args.cases = Some(export.path().to_path_buf());
        args.concerns = vec!["shrink-ears".to_string()];

        let result = match_cmd::run(&args);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_selection");
        assert!(payload["message"].as_str().unwrap().contains("shrink-ears"));
    });
}

#[test]
fn match_groups_cases_and_excludes_surgical_ones() {
    with_env(&[], || {
        let export = sample_export();
        let mut args = match_args();
        args.cases = Some(export.path().to_path_buf());
        args.concerns = vec!["restore-volume-definition".to_string()];
        args.age_range = Some("40-49".to_string());
        args.json = true;

        let result = match_cmd::run(&args);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["cases_loaded"], 4);

        let groups = payload["groups"].as_array().unwrap();
        // The two under-eye-hollow cases group together and outrank the
        // single Sculptra case; the surgical facelift is gone entirely.
        assert_eq!(groups[0]["concern"], "Resolve Under Eye Hollow");
        assert_eq!(groups[0]["cases"].as_array().unwrap().len(), 2);
        for group in groups {
            for case in group["cases"].as_array().unwrap() {
                assert_ne!(case["case"]["id"], "rec3");
            }
        }

        // Exact-midpoint age + full category match, no skin type selected.
        assert_eq!(groups[0]["cases"][0]["matching_score"], 80);
        assert_eq!(groups[0]["treatments"][0], "Filler");
    });
}

#[test]
fn match_human_output_summarizes_groups() {
    with_env(&[], || {
        let export = sample_export();
        let mut args = match_args();
        args.cases = Some(export.path().to_path_buf());

        let result = match_cmd::run(&args);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("cases loaded"));
        assert!(result.output.contains("Resolve Under Eye Hollow"));
    });
}

#[test]
fn min_score_env_override_filters_weak_matches() {
    with_env(&[("GLOWMATCH_MATCHING_MIN_SCORE", "90")], || {
        let export = sample_export();
        let mut args = match_args();
        args.cases = Some(export.path().to_path_buf());
        args.json = true;

        let result = match_cmd::run(&args);
        let payload = parse_payload(&result.output);
        // No selection: every case scores 15 (unknown-age credit only).
        assert!(payload["groups"].as_array().unwrap().is_empty());
    });
}

#[test]
fn report_markdown_covers_the_export() {
    with_env(&[], || {
        let export = sample_export();
        let result = report::run(&ReportArgs {
            cases: export.path().to_path_buf(),
            format: ReportFormat::Markdown,
        });
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("# Case collection report"));
        assert!(result.output.contains("- total cases: 4"));
        assert!(result.output.contains("| 40-49 | 2 |"));
    });
}

#[test]
fn report_csv_is_machine_readable() {
    with_env(&[], || {
        let export = sample_export();
        let result = report::run(&ReportArgs {
            cases: export.path().to_path_buf(),
            format: ReportFormat::Csv,
        });
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("section,label,count"));
        assert!(result.output.contains("summary,surgical_cases,1"));
    });
}

#[test]
fn report_with_missing_export_fails_as_input_error() {
    with_env(&[], || {
        let result = report::run(&ReportArgs {
            cases: "/nonexistent/export.json".into(),
            format: ReportFormat::Markdown,
        });
        assert_eq!(result.exit_code, 3);
    });
}

#[test]
fn catalog_json_lists_builtin_categories() {
    let output = catalog::run(true);
    let entries: Value = serde_json::from_str(&output).unwrap();
    let ids: Vec<&str> =
        entries.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"restore-volume-definition"));
    assert!(ids.contains(&"under-eye-rejuvenation"));
}

#[test]
fn doctor_without_credentials_passes_with_skips() {
    with_env(&[], || {
        let output = doctor::run(true);
        let payload: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(payload["overall_status"], "pass");

        let checks = payload["checks"].as_array().unwrap();
        let credentials =
            checks.iter().find(|check| check["name"] == "airtable_credentials").unwrap();
        assert_eq!(credentials["status"], "skipped");
        let connectivity =
            checks.iter().find(|check| check["name"] == "airtable_connectivity").unwrap();
        assert_eq!(connectivity["status"], "skipped");
    });
}

#[test]
fn doctor_reports_invalid_config() {
    with_env(&[("GLOWMATCH_AIRTABLE_API_KEY", "not-a-token")], || {
        let output = doctor::run(true);
        let payload: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(payload["overall_status"], "fail");
        let config_check = &payload["checks"][0];
        assert_eq!(config_check["name"], "config_validation");
        assert_eq!(config_check["status"], "fail");
    });
}

#[test]
fn config_output_redacts_the_api_key() {
    with_env(
        &[
            ("GLOWMATCH_AIRTABLE_API_KEY", "patSECRETSECRETSECRET"),
            ("GLOWMATCH_AIRTABLE_BASE_ID", "appBASE123"),
        ],
        || {
            let output = config::run();
            assert!(!output.contains("SECRETSECRET"));
            assert!(output.contains("patSECR...<redacted>"));
            assert!(output.contains("airtable.base_id = appBASE123 (env GLOWMATCH_AIRTABLE_BASE_ID)"));
        },
    );
}
