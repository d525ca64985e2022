// CIP Index Loader
// Fetches the published index document and builds typed records

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::types::{Index, LoadError, Record};

/// Wire shape of one record in the index document
///
/// Every field except `code` is optional; missing values default rather
/// than dropping the record. This is the one place raw document data is
/// turned into typed records, so matching code never null-checks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    code: String,

    #[serde(default)]
    code_family: Option<String>,

    #[serde(default)]
    title: String,

    #[serde(default)]
    definition: String,

    #[serde(default)]
    eligible: bool,
}

/// Wire shape of the index document
#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(default)]
    meta: Map<String, Value>,

    #[serde(default)]
    records: Vec<RawRecord>,
}

/// Load an index from a file path or an `http(s)://` URL
///
/// A non-success HTTP response fails with [`LoadError::Http`] carrying the
/// status code. The load is terminal on failure; there is no retry.
///
/// # Example
/// ```ignore
/// let index = cip_search::load_index("data/cip_stem_index.json").await?;
/// let engine = cip_search::QueryEngine::new(index.records);
/// ```
pub async fn load_index(locator: &str) -> Result<Index, LoadError> {
    let body = if locator.starts_with("http://") || locator.starts_with("https://") {
        fetch_remote(locator).await?
    } else {
        tokio::fs::read_to_string(locator).await?
    };

    let index = parse_index(&body)?;
    info!(locator, records = index.records.len(), "index loaded");
    Ok(index)
}

async fn fetch_remote(url: &str) -> Result<String, LoadError> {
    debug!(url, "fetching index");
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Parse an index document from JSON text
///
/// Separated from [`load_index`] so callers that already hold the document
/// body (embedded fixtures, alternative transports) can reuse the same
/// defaulting rules.
pub fn parse_index(body: &str) -> Result<Index, LoadError> {
    let raw: RawIndex = serde_json::from_str(body)?;
    let records = raw.records.into_iter().map(build_record).collect();
    Ok(Index {
        meta: raw.meta,
        records,
    })
}

fn build_record(raw: RawRecord) -> Record {
    let mut record = Record::new(raw.code, raw.title, raw.definition, raw.eligible);
    // Prefer the document's own family segment when present
    if let Some(family) = raw.code_family.filter(|f| !f.is_empty()) {
        record.code_family = family;
    }
    record
}
