use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub airtable: AirtableConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AirtableConfig {
    pub api_key: SecretString,
    pub base_id: String,
    pub table: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

#[derive(Clone, Debug)]
pub struct MatchingConfig {
    /// Matched cases scoring below this floor are dropped before grouping.
    pub min_score: u8,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub table: Option<String>,
    pub min_score: Option<u8>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            airtable: AirtableConfig {
                api_key: String::new().into(),
                base_id: String::new(),
                table: "Cases".to_string(),
                api_url: "https://api.airtable.com/v0".to_string(),
                timeout_secs: 30,
                page_size: 100,
            },
            matching: MatchingConfig { min_score: 0 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("glowmatch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(airtable) = patch.airtable {
            if let Some(api_key) = airtable.api_key {
                self.airtable.api_key = secret_value(api_key);
            }
            if let Some(base_id) = airtable.base_id {
                self.airtable.base_id = base_id;
            }
            if let Some(table) = airtable.table {
                self.airtable.table = table;
            }
            if let Some(api_url) = airtable.api_url {
                self.airtable.api_url = api_url;
            }
            if let Some(timeout_secs) = airtable.timeout_secs {
                self.airtable.timeout_secs = timeout_secs;
            }
            if let Some(page_size) = airtable.page_size {
                self.airtable.page_size = page_size;
            }
        }

        if let Some(matching) = patch.matching {
            if let Some(min_score) = matching.min_score {
                self.matching.min_score = min_score;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_API_KEY") {
            self.airtable.api_key = secret_value(value);
        }
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_BASE_ID") {
            self.airtable.base_id = value;
        }
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_TABLE") {
            self.airtable.table = value;
        }
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_API_URL") {
            self.airtable.api_url = value;
        }
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_TIMEOUT_SECS") {
            self.airtable.timeout_secs = parse_u64("GLOWMATCH_AIRTABLE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("GLOWMATCH_AIRTABLE_PAGE_SIZE") {
            self.airtable.page_size = parse_u32("GLOWMATCH_AIRTABLE_PAGE_SIZE", &value)?;
        }

        if let Some(value) = read_env("GLOWMATCH_MATCHING_MIN_SCORE") {
            self.matching.min_score = parse_u8("GLOWMATCH_MATCHING_MIN_SCORE", &value)?;
        }

        let log_level =
            read_env("GLOWMATCH_LOGGING_LEVEL").or_else(|| read_env("GLOWMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("GLOWMATCH_LOGGING_FORMAT").or_else(|| read_env("GLOWMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.api_key {
            self.airtable.api_key = secret_value(api_key);
        }
        if let Some(base_id) = overrides.base_id {
            self.airtable.base_id = base_id;
        }
        if let Some(table) = overrides.table {
            self.airtable.table = table;
        }
        if let Some(min_score) = overrides.min_score {
            self.matching.min_score = min_score;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_airtable(&self.airtable)?;
        validate_matching(&self.matching)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    /// True when the remote-store credentials are all present.
    pub fn has_airtable_credentials(&self) -> bool {
        !self.airtable.api_key.expose_secret().is_empty()
            && !self.airtable.base_id.is_empty()
            && !self.airtable.table.is_empty()
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("glowmatch.toml"), PathBuf::from("config/glowmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_airtable(airtable: &AirtableConfig) -> Result<(), ConfigError> {
    let api_url = airtable.api_url.trim();
    if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
        return Err(ConfigError::Validation(
            "airtable.api_url must be an http(s) URL".to_string(),
        ));
    }

    if airtable.timeout_secs == 0 || airtable.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "airtable.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    // Airtable caps list pages at 100 records.
    if airtable.page_size == 0 || airtable.page_size > 100 {
        return Err(ConfigError::Validation(
            "airtable.page_size must be in range 1..=100".to_string(),
        ));
    }

    let api_key = airtable.api_key.expose_secret();
    if !api_key.is_empty() && !(api_key.starts_with("pat") || api_key.starts_with("key")) {
        return Err(ConfigError::Validation(
            "airtable.api_key must be a personal access token (`pat...`) or legacy key (`key...`)"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if matching.min_score > 100 {
        return Err(ConfigError::Validation(
            "matching.min_score must be in range 0..=100".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&logging.level.trim().to_ascii_lowercase().as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of {}",
            LEVELS.join("|")
        )));
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value
        .parse::<u8>()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    airtable: Option<AirtablePatch>,
    matching: Option<MatchingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct AirtablePatch {
    api_key: Option<String>,
    base_id: Option<String>,
    table: Option<String>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    min_score: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_validate_without_credentials() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert!(!config.has_airtable_credentials());
        assert_eq!(config.airtable.api_url, "https://api.airtable.com/v0");
        assert_eq!(config.airtable.page_size, 100);
        assert_eq!(config.matching.min_score, 0);
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[airtable]\nbase_id = \"appTEST123\"\ntable = \"Before After\"\n\n[matching]\nmin_score = 40\n\n[logging]\nlevel = \"debug\"\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .unwrap();

        assert_eq!(config.airtable.base_id, "appTEST123");
        assert_eq!(config.airtable.table, "Before After");
        assert_eq!(config.matching.min_score, 40);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let error = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/glowmatch.toml")),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .unwrap_err();
        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn programmatic_overrides_win() {
        let config = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/glowmatch.toml")),
            require_file: false,
            overrides: ConfigOverrides {
                api_key: Some("patABC".to_string()),
                base_id: Some("appXYZ".to_string()),
                min_score: Some(25),
                ..ConfigOverrides::default()
            },
        })
        .unwrap();
        assert!(config.has_airtable_credentials());
        assert_eq!(config.matching.min_score, 25);
    }

    #[test]
    fn malformed_api_key_fails_validation() {
        let error = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/glowmatch.toml")),
            require_file: false,
            overrides: ConfigOverrides {
                api_key: Some("not-a-token".to_string()),
                ..ConfigOverrides::default()
            },
        })
        .unwrap_err();
        assert!(matches!(error, ConfigError::Validation(_)));
    }

    #[test]
    fn out_of_range_page_size_fails_validation() {
        let mut config = AppConfig::default();
        config.airtable.page_size = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn interpolation_reports_missing_variables() {
        let error =
            interpolate_env_vars("api_key = \"${GLOWMATCH_TEST_UNSET_VAR}\"").unwrap_err();
        assert!(matches!(error, ConfigError::MissingEnvInterpolation { .. }));
    }

    #[test]
    fn interpolation_rejects_unterminated_expressions() {
        let error = interpolate_env_vars("api_key = \"${OOPS").unwrap_err();
        assert!(matches!(error, ConfigError::UnterminatedInterpolation));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }
}
