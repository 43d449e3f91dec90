use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use glowmatch_core::config::AirtableConfig;

/// Airtable rejects PATCH batches larger than this.
pub const MAX_BATCH_UPDATE: usize = 10;

#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("airtable credentials missing: {0}")]
    MissingCredentials(&'static str),
    #[error("airtable request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("airtable api error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One raw record as the list endpoint returns it: fields keyed by
/// human-readable column names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AirtableRecord {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Page envelope of the list endpoint; `offset` is present until the last
/// page.
#[derive(Clone, Debug, Deserialize)]
pub struct ListResponse {
    pub records: Vec<AirtableRecord>,
    pub offset: Option<String>,
}

/// A single-record field patch for batched updates.
#[derive(Clone, Debug, Serialize)]
pub struct RecordPatch {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Serialize)]
struct UpdateBatch<'a> {
    records: &'a [RecordPatch],
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Detailed { message: String },
    Bare(String),
}

/// Thin REST client for one Airtable table.
#[derive(Clone, Debug)]
pub struct AirtableClient {
    http: reqwest::Client,
    api_key: SecretString,
    records_url: String,
    page_size: u32,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Result<Self, AirtableError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(AirtableError::MissingCredentials("airtable.api_key"));
        }
        if config.base_id.is_empty() {
            return Err(AirtableError::MissingCredentials("airtable.base_id"));
        }
        if config.table.is_empty() {
            return Err(AirtableError::MissingCredentials("airtable.table"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let records_url = format!(
            "{}/{}/{}",
            config.api_url.trim_end_matches('/'),
            config.base_id,
            // Tables are commonly addressed by display name, which may
            // contain spaces.
            config.table.replace(' ', "%20"),
        );

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            records_url,
            page_size: config.page_size,
        })
    }

    /// Fetch every record, following `offset` until the API stops returning
    /// one.
    pub async fn list_all_records(&self) -> Result<Vec<AirtableRecord>, AirtableError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self
                .http
                .get(&self.records_url)
                .bearer_auth(self.api_key.expose_secret())
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
            }

            let page: ListResponse = response.json().await?;
            pages += 1;
            records.extend(page.records);
            debug!(pages, fetched = records.len(), "airtable page fetched");

            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        Ok(records)
    }

    /// Fetch a single page of at most `limit` records; used by readiness
    /// probes.
    pub async fn probe(&self, limit: u32) -> Result<usize, AirtableError> {
        let response = self
            .http
            .get(&self.records_url)
            .bearer_auth(self.api_key.expose_secret())
            .query(&[("pageSize", limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let page: ListResponse = response.json().await?;
        Ok(page.records.len())
    }

    /// PATCH field updates in batches of at most [`MAX_BATCH_UPDATE`]
    /// records, returning how many were sent.
    pub async fn update_records(&self, patches: &[RecordPatch]) -> Result<usize, AirtableError> {
        let mut updated = 0usize;

        for chunk in patches.chunks(MAX_BATCH_UPDATE) {
            let response = self
                .http
                .patch(&self.records_url)
                .bearer_auth(self.api_key.expose_secret())
                .json(&UpdateBatch { records: chunk })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
            }

            updated += chunk.len();
            debug!(updated, total = patches.len(), "airtable batch patched");
        }

        Ok(updated)
    }
}

// Airtable error payloads come as {"error": {"type", "message"}} or
// {"error": "NOT_FOUND"}; fall back to the raw body text.
fn api_error(status: u16, body: String) -> AirtableError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|error| match error {
            ApiErrorBody::Detailed { message } => message,
            ApiErrorBody::Bare(message) => message,
        })
        .unwrap_or(body);
    AirtableError::Api { status, message }
}
