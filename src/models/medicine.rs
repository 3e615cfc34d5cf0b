//! The canonical Medicine record.
//!
//! Both upstream sources are normalized into this one shape. Every field is
//! always a non-empty string: missing or blank upstream values degrade to
//! the sentinels below, so rendering and prompt construction downstream never
//! deal with absent fields. Which source produced a record is recoverable
//! from `id` alone: fallback records carry the `gemini-` prefix.

use serde::{Deserialize, Serialize};

/// Sentinel for an unknown name or generic name.
pub const UNKNOWN: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_INDICATIONS: &str = "No indications available";
pub const NO_WARNINGS: &str = "No warnings available";
pub const NO_DOSAGE: &str = "No dosage information available";

/// Id prefix marking records produced by the generative fallback.
pub const FALLBACK_ID_PREFIX: &str = "gemini-";

/// A single normalized medicine record, serialized in the camelCase shape
/// the UI consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub generic_name: String,
    pub description: String,
    pub indications: String,
    pub warnings: String,
    pub dosage: String,
}

/// Which upstream source produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The structured regulatory database (openFDA).
    Structured,
    /// The generative-language fallback.
    Generative,
}

impl Medicine {
    /// Recover provenance from the id prefix.
    pub fn provenance(&self) -> Provenance {
        if self.id.starts_with(FALLBACK_ID_PREFIX) {
            Provenance::Generative
        } else {
            Provenance::Structured
        }
    }
}

/// First non-blank value, or the sentinel.
///
/// openFDA returns label fields as arrays of strings; the generative parser
/// produces at most one value per field. Either way only the first element
/// counts, and a blank first element is treated as absent.
pub fn first_or(values: Option<Vec<String>>, sentinel: &str) -> String {
    values
        .into_iter()
        .flatten()
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| sentinel.to_string())
}
