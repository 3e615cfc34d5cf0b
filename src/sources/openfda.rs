//! Structured-source client for the openFDA drug label API.
//!
//! One operation: search labels by brand or generic name and normalize each
//! hit into a `Medicine`. A non-success status or transport error is a
//! `SourceError`; a well-formed response with no results is `Ok(vec![])`.

use serde::Deserialize;

use super::{MedicineSource, SourceError};
use crate::models::{
    first_or, Medicine, NO_DESCRIPTION, NO_DOSAGE, NO_INDICATIONS, NO_WARNINGS, UNKNOWN,
};

/// Result cap, bounding latency and response size.
const RESULT_LIMIT: u32 = 5;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the openFDA drug label endpoint.
pub struct OpenFdaClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenFdaClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Search expression matching the query against brand OR generic name.
/// The expression is a single `search` query parameter; URL encoding is the
/// HTTP client's job.
fn search_expression(query: &str) -> String {
    format!(r#"openfda.brand_name:"{query}" OR openfda.generic_name:"{query}""#)
}

impl MedicineSource for OpenFdaClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Medicine>, SourceError> {
        let url = format!("{}/drug/label.json", self.base_url);
        let search = search_expression(query);
        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("search", search.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                service: "openFDA",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: LabelSearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(parsed.results.into_iter().map(normalize_label).collect())
    }
}

// ═══════════════════════════════════════════════════════════
// Raw response shape + normalization
// ═══════════════════════════════════════════════════════════

/// Response body from `/drug/label.json`.
#[derive(Debug, Deserialize)]
struct LabelSearchResponse {
    #[serde(default)]
    results: Vec<RawLabel>,
}

/// One raw drug label. Every field is an array of strings in the upstream
/// schema (usually one element) and may be absent entirely.
#[derive(Debug, Default, Deserialize)]
struct RawLabel {
    id: Option<String>,
    #[serde(default)]
    openfda: RawOpenFda,
    description: Option<Vec<String>>,
    indications_and_usage: Option<Vec<String>>,
    warnings: Option<Vec<String>>,
    dosage_and_administration: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOpenFda {
    brand_name: Option<Vec<String>>,
    generic_name: Option<Vec<String>>,
}

/// Normalize one raw label into a `Medicine`. Never fails; absent or blank
/// fields degrade to sentinels.
fn normalize_label(raw: RawLabel) -> Medicine {
    Medicine {
        id: raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        name: first_or(raw.openfda.brand_name, UNKNOWN),
        generic_name: first_or(raw.openfda.generic_name, UNKNOWN),
        description: first_or(raw.description, NO_DESCRIPTION),
        indications: first_or(raw.indications_and_usage, NO_INDICATIONS),
        warnings: first_or(raw.warnings, NO_WARNINGS),
        dosage: first_or(raw.dosage_and_administration, NO_DOSAGE),
    }
}
