#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SQL_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:select|with)\b").expect("invalid keyword regex"));

// Prompt-echo or meta text that disqualifies a candidate outright.
const META_MARKERS: &[&str] = &[
    "conversation history",
    "user question:",
    "return only the sql query",
];

// Space-delimited structural phrases required by the strict level.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    " from ",
    " where ",
    " join ",
    " group by ",
    " order by ",
    " having ",
    " limit ",
    " offset ",
    " union ",
    " intersect ",
    " except ",
];

const MIN_CANDIDATE_LEN: usize = 20;

/// How aggressively candidates are rejected.
///
/// `Lenient` only guards against tiny keyword fragments via a minimum
/// length; `Strict` additionally demands a structural SQL keyword so
/// bare keyword echoes never pass.
#[derive(Hash, PartialEq, Eq, Deserialize, Serialize, Debug, Clone, Copy, Default)]
pub enum Strictness {
    #[default]
    #[serde(rename = "lenient")]
    Lenient,
    #[serde(rename = "strict")]
    Strict,
}

/// Cheap heuristic gate deciding whether a candidate looks like real
/// SQL. Deliberately not a SQL parser: plausible-looking garbage and
/// rejected terse-but-valid SQL are accepted trade-offs.
pub fn is_plausible(candidate: &str, strictness: Strictness) -> bool {
    let stripped = candidate.trim();
    if stripped.is_empty() {
        return false;
    }

    let lowered = stripped.to_lowercase();
    if META_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return false;
    }

    if !SQL_KEYWORD.is_match(stripped) {
        return false;
    }

    match strictness {
        Strictness::Lenient => stripped.chars().count() >= MIN_CANDIDATE_LEN,
        Strictness::Strict => STRUCTURAL_KEYWORDS.iter().any(|kw| lowered.contains(kw)),
    }
}
