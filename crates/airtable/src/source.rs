use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::client::{AirtableClient, AirtableError};
use crate::fixture::{read_export, FixtureError};
use crate::loader::{load_cases, LoadOutcome};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Airtable(#[from] AirtableError),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Where a matching pass gets its cases from: the live base or a saved
/// export. The engine is only invoked once a fetch has fully resolved.
#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch_cases(&self) -> Result<LoadOutcome, SourceError>;

    /// Human-readable origin for logs and reports.
    fn describe(&self) -> String;
}

pub struct RemoteCaseSource {
    client: AirtableClient,
}

impl RemoteCaseSource {
    pub fn new(client: AirtableClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CaseSource for RemoteCaseSource {
    async fn fetch_cases(&self) -> Result<LoadOutcome, SourceError> {
        let records = self.client.list_all_records().await?;
        let outcome = load_cases(&records);
        info!(
            loaded = outcome.cases.len(),
            skipped = outcome.skipped,
            "cases fetched from airtable"
        );
        Ok(outcome)
    }

    fn describe(&self) -> String {
        "airtable".to_string()
    }
}

pub struct FixtureCaseSource {
    path: PathBuf,
}

impl FixtureCaseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaseSource for FixtureCaseSource {
    async fn fetch_cases(&self) -> Result<LoadOutcome, SourceError> {
        let records = read_export(&self.path)?;
        let outcome = load_cases(&records);
        info!(
            loaded = outcome.cases.len(),
            skipped = outcome.skipped,
            path = %self.path.display(),
            "cases loaded from export"
        );
        Ok(outcome)
    }

    fn describe(&self) -> String {
        format!("export file {}", self.path.display())
    }
}
