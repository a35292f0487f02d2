#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

static SQL_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```sql(.*?)```").expect("invalid sql fence regex"));

static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("invalid fence regex"));

static SQL_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:select|with)\s").expect("invalid sql start regex"));

// Sections of an echoed prompt that can trail a bare SQL statement.
static ECHO_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)schema:|conversation history|user question:").expect("invalid marker regex")
});

/// Best-effort extraction of a SQL candidate from raw model output.
///
/// Preference order: a ```sql fenced block, any fenced block, then the
/// earliest `SELECT`/`WITH` keyword with trailing prompt-echo sections
/// cut off. Never fails; when nothing SQL-like is found the trimmed
/// input is returned as-is and the validator rejects it downstream.
pub fn extract_sql(text: &str) -> String {
    if let Some(caps) = SQL_FENCE
        .captures(text)
        .or_else(|| ANY_FENCE.captures(text))
    {
        return caps[1].trim().to_string();
    }

    let start = match SQL_START.find(text) {
        Some(m) => m.start(),
        None => return text.trim().to_string(),
    };

    let end = match ECHO_MARKER.find_at(text, start) {
        Some(m) => m.start(),
        None => text.len(),
    };

    text[start..end].trim().to_string()
}
