use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;

use glowmatch_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key: &str, env_var: &str| {
        field_source(key, env_var, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let api_key = redact_token(config.airtable.api_key.expose_secret());
    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        render_line("airtable.api_key", &api_key, source("airtable.api_key", "GLOWMATCH_AIRTABLE_API_KEY")),
        render_line(
            "airtable.base_id",
            unset_or(&config.airtable.base_id),
            source("airtable.base_id", "GLOWMATCH_AIRTABLE_BASE_ID"),
        ),
        render_line("airtable.table", &config.airtable.table, source("airtable.table", "GLOWMATCH_AIRTABLE_TABLE")),
        render_line("airtable.api_url", &config.airtable.api_url, source("airtable.api_url", "GLOWMATCH_AIRTABLE_API_URL")),
        render_line(
            "airtable.timeout_secs",
            &config.airtable.timeout_secs.to_string(),
            source("airtable.timeout_secs", "GLOWMATCH_AIRTABLE_TIMEOUT_SECS"),
        ),
        render_line(
            "airtable.page_size",
            &config.airtable.page_size.to_string(),
            source("airtable.page_size", "GLOWMATCH_AIRTABLE_PAGE_SIZE"),
        ),
        render_line(
            "matching.min_score",
            &config.matching.min_score.to_string(),
            source("matching.min_score", "GLOWMATCH_MATCHING_MIN_SCORE"),
        ),
        render_line("logging.level", &config.logging.level, source("logging.level", "GLOWMATCH_LOGGING_LEVEL")),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format).to_lowercase(),
            source("logging.format", "GLOWMATCH_LOGGING_FORMAT"),
        ),
    ];

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value} ({source})")
}

fn unset_or(value: &str) -> &str {
    if value.is_empty() {
        "<unset>"
    } else {
        value
    }
}

fn redact_token(token: &str) -> String {
    if token.is_empty() {
        "<unset>".to_string()
    } else if token.len() <= 7 {
        "<redacted>".to_string()
    } else {
        format!("{}...<redacted>", &token[..7])
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("glowmatch.toml"), PathBuf::from("config/glowmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_var: &str,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if env::var(env_var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
        return format!("env {env_var}");
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        let mut cursor = Some(doc);
        for part in key.split('.') {
            cursor = cursor.and_then(|value| value.get(part));
        }
        if cursor.is_some() {
            return format!("file {}", path.display());
        }
    }

    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_keeps_only_a_short_prefix() {
        assert_eq!(redact_token(""), "<unset>");
        assert_eq!(redact_token("patAB"), "<redacted>");
        assert_eq!(redact_token("patABCDEFGHIJK"), "patABCD...<redacted>");
    }

    #[test]
    fn field_source_falls_back_to_default() {
        let source = field_source(
            "airtable.base_id",
            "GLOWMATCH_TEST_UNSET_SOURCE_VAR",
            None,
            None,
        );
        assert_eq!(source, "default");
    }

    #[test]
    fn field_source_finds_nested_file_keys() {
        let doc: Value = "[airtable]\nbase_id = \"appX\"".parse().unwrap();
        let source = field_source(
            "airtable.base_id",
            "GLOWMATCH_TEST_UNSET_SOURCE_VAR",
            Some(&doc),
            Some(Path::new("glowmatch.toml")),
        );
        assert_eq!(source, "file glowmatch.toml");
    }
}
