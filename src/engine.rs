// CIP Query Engine
// Selects and orders index records for code and keyword queries

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::canon::{canonicalize, code_family, is_canonical, is_subfamily_fragment};
use crate::types::{Record, SearchOptions};

/// Query engine over a loaded record collection
///
/// Construction builds an exact-lookup map keyed by canonical code and a
/// lowercase `title + definition` haystack per record. Both are immutable
/// afterwards; every search is a pure, read-only computation.
///
/// # Query resolution
/// 1. Empty query: browse mode, records in stored order.
/// 2. Full canonical code ("14.0901"): exact lookup, short-circuits
///    everything else.
/// 3. Family ("14") and subfamily ("14.09") fragments: scan with code
///    matching.
/// 4. Anything else: keyword scan, all tokens required.
///
/// # Example
/// ```
/// # use cip_search::{QueryEngine, Record, SearchOptions};
/// let engine = QueryEngine::new(vec![
///     Record::new("14.0901", "Computer Engineering, General", "", true),
///     Record::new("14.1001", "Electrical Engineering", "", true),
/// ]);
/// let results = engine.search(&SearchOptions::new("14.09"));
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].code, "14.0901");
/// ```
pub struct QueryEngine {
    /// Records in stored (document) order
    records: Vec<Record>,

    /// Canonical code → record position; last write wins on duplicates
    by_code: FxHashMap<String, usize>,

    /// Lowercase `title + " " + definition` per record, for keyword matching
    haystacks: Vec<String>,
}

impl QueryEngine {
    /// Build an engine from the full record sequence
    ///
    /// Duplicate codes must not occur in a valid index, but if one does the
    /// later record wins the exact-lookup slot. Construction never fails.
    pub fn new(records: Vec<Record>) -> Self {
        let mut by_code = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            by_code.insert(record.code.clone(), idx);
        }

        let haystacks = records
            .iter()
            .map(|r| format!("{} {}", r.title, r.definition).to_lowercase())
            .collect();

        debug!(records = records.len(), "query engine built");

        Self {
            records,
            by_code,
            haystacks,
        }
    }

    /// Execute a search
    ///
    /// Results are sorted by canonical code ascending, except in browse
    /// mode (empty query), which preserves stored order. At most
    /// `opts.limit` records are returned; no results is an empty vector,
    /// never an error.
    pub fn search(&self, opts: &SearchOptions) -> Vec<Record> {
        if opts.limit == 0 {
            return Vec::new();
        }

        let query = opts.q.trim();

        // Browse mode: first `limit` records in stored order, unsorted
        if query.is_empty() {
            return self
                .records
                .iter()
                .filter(|r| !opts.stem_only || r.eligible)
                .take(opts.limit)
                .cloned()
                .collect();
        }

        let canon = canonicalize(query);
        let code_shaped = is_canonical(&canon);

        // A canonical form ending ".0000" is a family query, matched on
        // codeFamily equality rather than the exact-lookup or prefix paths.
        let family_rollup = code_shaped && canon.ends_with(".0000");

        // Exact full-code queries resolve through the lookup map alone and
        // never fall through to keyword or family matching.
        if code_shaped && !family_rollup {
            if let Some(&idx) = self.by_code.get(&canon) {
                let record = &self.records[idx];
                if opts.stem_only && !record.eligible {
                    return Vec::new();
                }
                return vec![record.clone()];
            }
        }

        let query_is_subfamily = is_subfamily_fragment(query);
        let rollup_family = family_rollup.then(|| code_family(&canon));
        let tokens: Vec<String> = if code_shaped {
            // Code-shaped queries never match as free text
            Vec::new()
        } else {
            query
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        };

        let mut hits: Vec<&Record> = Vec::new();
        for (idx, record) in self.records.iter().enumerate() {
            if opts.stem_only && !record.eligible {
                continue;
            }

            // Raw 2-digit family fragment
            let mut hit = query == record.code_family;

            // Raw NN.NN fragment as a code prefix
            if !hit && query_is_subfamily {
                hit = record.code.starts_with(query);
            }

            // Canonicalized fragment: family equality for ".0000" rollups,
            // NN.NN prefix equality otherwise
            if !hit && code_shaped {
                hit = match rollup_family {
                    Some(family) => record.code_family == family,
                    None => record.code.get(..5) == canon.get(..5),
                };
            }

            // Keyword matching: every token must appear in title+definition
            if !hit && !tokens.is_empty() {
                let haystack = &self.haystacks[idx];
                hit = tokens.iter().all(|t| haystack.contains(t.as_str()));
            }

            if hit {
                hits.push(record);
                if hits.len() == opts.limit {
                    break;
                }
            }
        }

        let mut results: Vec<Record> = hits.into_iter().cloned().collect();
        results.sort_by(|a, b| a.code.cmp(&b.code));
        results
    }

    /// Look up a single record by code fragment
    ///
    /// The fragment is canonicalized first, so "14.09" finds "14.0900" if
    /// that exact rollup code exists in the index.
    pub fn lookup(&self, code: &str) -> Option<&Record> {
        let canon = canonicalize(code);
        self.by_code.get(&canon).map(|&idx| &self.records[idx])
    }

    /// Total and STEM-eligible record counts
    pub fn stats(&self) -> (usize, usize) {
        let eligible = self.records.iter().filter(|r| r.eligible).count();
        (self.records.len(), eligible)
    }

    /// Number of records held by the engine
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the engine holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deliberately not code-sorted: browse mode must preserve this order
    // while code searches must sort their results.
    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(
                "15.0000",
                "Engineering Technologies, General",
                "Preparation in engineering support functions.",
                false,
            ),
            Record::new(
                "14.0902",
                "Computer Hardware Engineering",
                "Design of computer hardware systems.",
                true,
            ),
            Record::new(
                "14.0901",
                "Computer Engineering, General",
                "Instruction in computer engineering and integrated circuits.",
                true,
            ),
            Record::new(
                "01.0000",
                "Agriculture, General",
                "General study of agricultural production.",
                false,
            ),
            Record::new(
                "14.1001",
                "Electrical and Electronics Engineering",
                "Electrical systems and electronics.",
                true,
            ),
            Record::new(
                "15.0101",
                "Architectural Engineering Technologies",
                "Support of architectural engineers.",
                false,
            ),
            Record::new(
                "11.0101",
                "Computer and Information Sciences, General",
                "Study of computing and information processing.",
                true,
            ),
        ]
    }

    fn engine() -> QueryEngine {
        QueryEngine::new(sample_records())
    }

    fn opts(q: &str) -> SearchOptions {
        SearchOptions::new(q)
    }

    fn codes(results: &[Record]) -> Vec<&str> {
        results.iter().map(|r| r.code.as_str()).collect()
    }

    // ============ Exact Match ============

    #[test]
    fn test_exact_code_single_result() {
        let results = engine().search(&opts("14.0901"));
        assert_eq!(codes(&results), vec!["14.0901"]);
    }

    #[test]
    fn test_exact_code_stem_filtered_out() {
        // "15.0101" exists but is not eligible
        let results = engine().search(&opts("15.0101").stem_only(true));
        assert!(results.is_empty());
    }

    #[test]
    fn test_exact_code_not_in_index_falls_through() {
        // "14.0903" is a valid shape but absent; the NN.NN prefix path
        // still recovers the subfamily
        let results = engine().search(&opts("14.0903"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902"]);
    }

    // ============ Family Matching ============

    #[test]
    fn test_family_fragment() {
        let results = engine().search(&opts("14"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902", "14.1001"]);
    }

    #[test]
    fn test_family_rollup_code_is_not_exact() {
        // "15.0000" exists as a record, but a ".0000" canonical form is a
        // family search: every family-15 record matches
        let results = engine().search(&opts("15.0000"));
        assert_eq!(codes(&results), vec!["15.0000", "15.0101"]);
    }

    #[test]
    fn test_family_rollup_from_two_digits() {
        // "15" and "15.0000" are the same query after canonicalization
        let two_digit = engine().search(&opts("15"));
        let padded = engine().search(&opts("15.0000"));
        assert_eq!(codes(&two_digit), codes(&padded));
    }

    // ============ Subfamily Matching ============

    #[test]
    fn test_subfamily_fragment() {
        let results = engine().search(&opts("14.09"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902"]);
    }

    #[test]
    fn test_dropped_zero_fragment_recovers_subfamily() {
        // "14.090" canonicalizes to "14.0900"; its NN.NN prefix matches
        // the 14.09 subfamily
        let results = engine().search(&opts("14.090"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902"]);
    }

    #[test]
    fn test_bracketed_code() {
        let results = engine().search(&opts("[14.09]"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902"]);
    }

    // ============ Keyword Matching ============

    #[test]
    fn test_keyword_single_token() {
        let results = engine().search(&opts("agriculture"));
        assert_eq!(codes(&results), vec!["01.0000"]);
    }

    #[test]
    fn test_keyword_all_tokens_required() {
        // "computer" alone matches three records; adding "engineering"
        // drops 11.0101, whose text never mentions it
        let both = engine().search(&opts("computer engineering"));
        assert_eq!(codes(&both), vec!["14.0901", "14.0902"]);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let lower = engine().search(&opts("computer engineering"));
        let mixed = engine().search(&opts("Computer ENGINEERING"));
        assert_eq!(codes(&lower), codes(&mixed));
    }

    #[test]
    fn test_keyword_matches_definition_text() {
        let results = engine().search(&opts("integrated circuits"));
        assert_eq!(codes(&results), vec!["14.0901"]);
    }

    #[test]
    fn test_keyword_no_matches() {
        let results = engine().search(&opts("astrophysics"));
        assert!(results.is_empty());
    }

    // ============ STEM Filter ============

    #[test]
    fn test_stem_filter_is_subset() {
        for q in ["", "14", "14.09", "engineering", "14.0901"] {
            let all = engine().search(&opts(q).limit(100));
            let stem = engine().search(&opts(q).stem_only(true).limit(100));
            for record in &stem {
                assert!(record.eligible);
                assert!(all.iter().any(|r| r.code == record.code));
            }
        }
    }

    #[test]
    fn test_stem_filter_on_keyword_search() {
        let results = engine().search(&opts("engineering").stem_only(true));
        assert!(results.iter().all(|r| r.eligible));
        assert!(!results.is_empty());
    }

    // ============ Browse Mode ============

    #[test]
    fn test_empty_query_stored_order() {
        let results = engine().search(&opts("").limit(3));
        // Stored order, not code order
        assert_eq!(codes(&results), vec!["15.0000", "14.0902", "14.0901"]);
    }

    #[test]
    fn test_empty_query_stem_only() {
        let results = engine().search(&opts("").stem_only(true).limit(2));
        assert_eq!(codes(&results), vec!["14.0902", "14.0901"]);
    }

    #[test]
    fn test_whitespace_query_is_browse() {
        let results = engine().search(&opts("   ").limit(2));
        assert_eq!(codes(&results), vec!["15.0000", "14.0902"]);
    }

    // ============ Ordering and Limits ============

    #[test]
    fn test_results_sorted_by_code() {
        // Stored order is 14.0902 before 14.0901; results must flip them
        let results = engine().search(&opts("14.09"));
        assert_eq!(codes(&results), vec!["14.0901", "14.0902"]);
    }

    #[test]
    fn test_limit_bound() {
        for limit in [1, 2, 3, 100] {
            let results = engine().search(&opts("engineering").limit(limit));
            assert!(results.len() <= limit);
        }
    }

    #[test]
    fn test_limit_takes_first_hits_in_scan_order() {
        // Scan collects 15.0000 then 14.0902 before hitting the limit,
        // then sorts the pair
        let results = engine().search(&opts("engineering").limit(2));
        assert_eq!(codes(&results), vec!["14.0902", "15.0000"]);
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let results = engine().search(&opts("14").limit(0));
        assert!(results.is_empty());
    }

    // ============ Determinism ============

    #[test]
    fn test_repeated_searches_identical() {
        let engine = engine();
        for q in ["14", "14.09", "computer engineering", ""] {
            let first = engine.search(&opts(q));
            let second = engine.search(&opts(q));
            assert_eq!(first, second);
        }
    }

    // ============ Lookup and Stats ============

    #[test]
    fn test_lookup_canonicalizes() {
        let engine = engine();
        assert_eq!(engine.lookup("15").map(|r| r.code.as_str()), Some("15.0000"));
        assert_eq!(
            engine.lookup("14.0901").map(|r| r.title.as_str()),
            Some("Computer Engineering, General")
        );
        assert!(engine.lookup("99.9999").is_none());
    }

    #[test]
    fn test_duplicate_codes_last_write_wins() {
        let engine = QueryEngine::new(vec![
            Record::new("14.0901", "First", "", true),
            Record::new("14.0901", "Second", "", true),
        ]);
        assert_eq!(engine.lookup("14.0901").map(|r| r.title.as_str()), Some("Second"));
        let results = engine.search(&opts("14.0901"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Second");
    }

    #[test]
    fn test_stats() {
        let (total, eligible) = engine().stats();
        assert_eq!(total, 7);
        assert_eq!(eligible, 4);
    }

    #[test]
    fn test_empty_engine() {
        let engine = QueryEngine::new(Vec::new());
        assert!(engine.is_empty());
        assert!(engine.search(&opts("14")).is_empty());
        assert!(engine.search(&opts("")).is_empty());
    }

    // ============ Malformed Records ============

    #[test]
    fn test_short_code_never_panics() {
        // Codes shorter than the NN.NN prefix simply fail to match
        let engine = QueryEngine::new(vec![
            Record::new("14", "Truncated", "", true),
            Record::new("14.0901", "Computer Engineering, General", "", true),
        ]);
        let results = engine.search(&opts("14.09"));
        assert_eq!(codes(&results), vec!["14.0901"]);
    }
}
