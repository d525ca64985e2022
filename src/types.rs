// CIP Search Type Definitions
// Core types for index records, search options, and load errors

use serde_json::{Map, Value};
use thiserror::Error;

use crate::canon;

/// One program record from the published CIP index
///
/// Records are immutable once constructed. `code_family` and
/// `normalized_title` are derived at construction time so that matching
/// never has to recompute them per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Canonical CIP code, always `NN.NNNN` (e.g., "14.0901")
    pub code: String,

    /// Leading 2-digit family segment of `code` (e.g., "14")
    pub code_family: String,

    /// Human-readable program title; may be empty
    pub title: String,

    /// Free-text program definition; may be empty
    pub definition: String,

    /// STEM-eligibility flag from the authoritative list
    pub eligible: bool,

    /// Lowercased, whitespace-collapsed form of `title`
    pub normalized_title: String,
}

impl Record {
    /// Create a record, deriving `code_family` and `normalized_title`
    ///
    /// # Example
    /// ```
    /// # use cip_search::Record;
    /// let record = Record::new("14.0901", "Computer Engineering, General", "", true);
    /// assert_eq!(record.code_family, "14");
    /// assert_eq!(record.normalized_title, "computer engineering, general");
    /// ```
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        definition: impl Into<String>,
        eligible: bool,
    ) -> Self {
        let code = code.into();
        let title = title.into();
        let code_family = canon::code_family(&code).to_string();
        let normalized_title = normalize_title(&title);

        Self {
            code,
            code_family,
            title,
            definition: definition.into(),
            eligible,
            normalized_title,
        }
    }
}

/// Lowercase a title and collapse runs of whitespace to single spaces
fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A loaded index: arbitrary document metadata plus the record sequence
///
/// Built once per session from a fetched JSON document and treated as
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Index {
    /// Document metadata (record count, generation timestamp, source info)
    pub meta: Map<String, Value>,

    /// Records in document order
    pub records: Vec<Record>,
}

/// Options for one search call
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Raw query text: a code fragment ("14", "14.09", "14.0901") or keywords
    pub q: String,

    /// When set, only STEM-eligible records are returned
    pub stem_only: bool,

    /// Maximum number of results
    pub limit: usize,
}

/// Default result cap when none is given
pub const DEFAULT_LIMIT: usize = 50;

impl SearchOptions {
    /// Create options for a query with the default limit
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            stem_only: false,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Restrict results to STEM-eligible records
    pub fn stem_only(mut self, stem_only: bool) -> Self {
        self.stem_only = stem_only;
        self
    }

    /// Cap the number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new("")
    }
}

/// Index loading errors
///
/// A failed load is terminal: the caller renders a failure state and stops
/// querying. No retry happens here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("index request to {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    #[error("failed to fetch index: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to read index file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed index document: {0}")]
    Parse(#[from] serde_json::Error),
}
