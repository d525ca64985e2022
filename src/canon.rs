// CIP Code Canonicalizer
// Normalizes user-entered code fragments to the canonical NN.NNNN form

use regex::Regex;
use std::sync::LazyLock;

/// Canonical CIP shape: two digits, a dot, four digits
static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{4}$").expect("canonical CIP pattern"));

/// Subfamily fragment shape: two digits, a dot, two digits
static SUBFAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}$").expect("subfamily fragment pattern"));

/// Canonicalize a CIP code fragment
///
/// An empty return value is the "not code-shaped" sentinel. Any other
/// return value is either a canonical `NN.NNNN` code or the input passed
/// through unchanged (best-effort fallback for fragments that are not
/// code-shaped, which downstream matching treats as free text).
///
/// Surrounding whitespace and bracket characters are stripped first; NCES
/// outputs occasionally wrap moved or deleted codes in `[]` or `()`.
///
/// # Rules
/// - `""` → `""`
/// - `"14"` → `"14.0000"` (family)
/// - `"14.09"` → `"14.0900"` (subfamily rollup)
/// - `"14.0901"` → `"14.0901"` (already canonical)
/// - `"14.9"` → `"14.9000"` (trailing zeros; dropped-zero fragments pad right)
/// - anything else → input unchanged
///
/// # Example
/// ```
/// # use cip_search::canonicalize;
/// assert_eq!(canonicalize("14"), "14.0000");
/// assert_eq!(canonicalize("14.09"), "14.0900");
/// assert_eq!(canonicalize("14.0901"), "14.0901");
/// assert_eq!(canonicalize("computer"), "computer");
/// assert_eq!(canonicalize(""), "");
/// ```
pub fn canonicalize(input: &str) -> String {
    let s = input
        .trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '(' | ')'));

    if s.is_empty() {
        return String::new();
    }

    let Some((left, right)) = s.split_once('.') else {
        if s.len() == 2 && is_digits(s) {
            return format!("{s}.0000");
        }
        return s.to_string();
    };

    let left = left.trim();
    let right = right.trim();

    if left.len() == 2 && is_digits(left) && is_digits(right) {
        return match right.len() {
            // 4-digit rollup: "14.09"
            2 => format!("{left}.{right}00"),
            // 6-digit already: "14.0903"
            4 => format!("{left}.{right}"),
            // pad anything else up to 4, appending zeros
            1 | 3 => format!("{left}.{right:0<4}"),
            _ => s.to_string(),
        };
    }

    s.to_string()
}

/// Check whether a string is a full canonical code (`NN.NNNN`)
///
/// # Example
/// ```
/// # use cip_search::is_canonical;
/// assert!(is_canonical("14.0901"));
/// assert!(!is_canonical("14.09"));
/// assert!(!is_canonical("engineering"));
/// ```
pub fn is_canonical(code: &str) -> bool {
    CANONICAL_RE.is_match(code)
}

/// Check whether a string is a 4-digit subfamily fragment (`NN.NN`)
pub fn is_subfamily_fragment(s: &str) -> bool {
    SUBFAMILY_RE.is_match(s)
}

/// Extract the 2-digit family segment of a code ("14.0900" → "14")
///
/// Codes without a dot are returned whole; the empty string yields "".
pub fn code_family(code: &str) -> &str {
    match code.split_once('.') {
        Some((family, _)) => family,
        None => code,
    }
}

/// ASCII-digit check; empty strings do not count as digits
#[inline]
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
