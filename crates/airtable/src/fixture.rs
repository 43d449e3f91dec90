use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::client::AirtableRecord;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not read case export `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse case export `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// Saved exports come in two shapes: the raw list-endpoint envelope
// ({"records": [...]}) or a bare record array from older dump scripts.
#[derive(Deserialize)]
#[serde(untagged)]
enum Export {
    Envelope { records: Vec<AirtableRecord> },
    Bare(Vec<AirtableRecord>),
}

/// Read a saved JSON export of the cases table.
pub fn read_export(path: &Path) -> Result<Vec<AirtableRecord>, FixtureError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| FixtureError::Read { path: path.to_path_buf(), source })?;

    let export: Export = serde_json::from_str(&raw)
        .map_err(|source| FixtureError::Parse { path: path.to_path_buf(), source })?;

    Ok(match export {
        Export::Envelope { records } => records,
        Export::Bare(records) => records,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_export(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_the_list_endpoint_envelope() {
        let file = write_export(
            r#"{"records": [{"id": "rec1", "fields": {"Name": "Brow Refresh"}}], "offset": null}"#,
        );
        let records = read_export(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "rec1");
    }

    #[test]
    fn reads_a_bare_record_array() {
        let file = write_export(r#"[{"id": "rec1", "fields": {}}, {"id": "rec2", "fields": {}}]"#);
        let records = read_export(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_and_bad_json_are_distinct_errors() {
        let missing = read_export(Path::new("/nonexistent/export.json")).unwrap_err();
        assert!(matches!(missing, FixtureError::Read { .. }));

        let malformed = write_export("not json at all");
        let parse = read_export(malformed.path()).unwrap_err();
        assert!(matches!(parse, FixtureError::Parse { .. }));
    }
}
