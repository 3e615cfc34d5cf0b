//! Best-effort extraction of `Label: value` fields from model prose.
//!
//! The generative fallback asks for six labeled fields but the model's
//! formatting drifts: extra prose, list markers, blank lines. This parser is
//! deliberately loose (line-based, first-`": "` split, normalized key)
//! and silently drops anything it cannot read. It is kept pure so the
//! fragility stays contained and testable away from network code.

use std::collections::HashMap;

/// Parse `Label: value` lines into a map keyed by the case-folded label
/// stripped of non-alphabetic characters (`"Generic Name"` → `genericname`).
///
/// Later occurrences of the same key overwrite earlier ones. Lines without a
/// `": "` separator, an alphabetic label, or a non-blank value are ignored.
pub fn parse_labeled_fields(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in text.lines() {
        let Some((label, value)) = line.split_once(": ") else {
            continue;
        };
        let key: String = label
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        fields.insert(key, value.to_string());
    }
    fields
}
