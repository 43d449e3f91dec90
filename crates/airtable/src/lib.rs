//! Airtable collaborator: the external-store boundary of the matching app.
//!
//! Everything impure lives here: the REST client (offset pagination, bearer
//! auth, batched PATCH updates), the record-to-case normalization with its
//! field-name fallback chains, and the saved-export fixture loader used for
//! offline runs. The core engine never touches this crate; it is only fed by
//! it.

pub mod client;
pub mod fixture;
pub mod loader;
pub mod source;

pub use client::{AirtableClient, AirtableError, AirtableRecord, ListResponse, RecordPatch};
pub use fixture::{read_export, FixtureError};
pub use loader::{case_from_record, load_cases, LoadOutcome, LoaderError};
pub use source::{CaseSource, FixtureCaseSource, RemoteCaseSource, SourceError};
