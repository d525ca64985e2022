//! # CIP Search: CIP Code Lookup Engine
//!
//! Lookup and search over a published CIP program index, with canonical
//! code handling and STEM-eligibility filtering.
//!
//! ## Four Query Paths
//!
//! 1. **Exact** - Full canonical code, direct map lookup (O(1))
//!    - `search("14.0901")` - exactly one record, or none
//! 2. **Family** - 2-digit fragment, matched on the family segment
//!    - `search("14")` - every record in family 14
//! 3. **Subfamily** - 4-digit fragment, matched as a code prefix
//!    - `search("14.09")` - every record under the 14.09 rollup
//! 4. **Keyword** - anything else, all tokens required in title+definition
//!    - `search("computer engineering")` - substring AND over free text
//!
//! ## Code Canonicalization
//!
//! User-typed fragments normalize to the `NN.NNNN` form before matching:
//! `"14"` → `"14.0000"`, `"14.09"` → `"14.0900"`, `"14.9"` → `"14.9000"`.
//! Non-code text passes through untouched and falls to keyword matching.
//!
//! ## Example Usage
//!
//! ```ignore
//! use cip_search::{load_index, QueryEngine, SearchOptions};
//!
//! let index = load_index("https://example.org/cip_stem_index.json").await?;
//! let engine = QueryEngine::new(index.records);
//!
//! // Subfamily search, STEM-eligible records only
//! let results = engine.search(&SearchOptions::new("14.09").stem_only(true).limit(20));
//!
//! // Statistics
//! let (total, stem_eligible) = engine.stats();
//! # Ok::<(), cip_search::LoadError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Canonicalizer** - Normalizes code fragments to `NN.NNNN`
//! - **Query Engine** - Selects and orders records, bounded by a limit
//! - **Loader** - Fetches and parses the JSON index document
//! - The index is loaded once and read-only for the rest of the session

pub mod canon;
pub mod engine;
pub mod load;
pub mod types;

// Re-export main types and functions for convenience
pub use canon::{canonicalize, code_family, is_canonical};
pub use engine::QueryEngine;
pub use load::{load_index, parse_index};
pub use types::{Index, LoadError, Record, SearchOptions, DEFAULT_LIMIT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
