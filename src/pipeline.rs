//! Acquisition pipeline — strict two-tier fallback.
//!
//! Structured source first; only when it returns nothing (or fails) is the
//! generative fallback consulted. First success wins entirely: no retry, no
//! merging of both sources, no ranking. Upstream failures are logged and
//! treated the same as "no match".

use thiserror::Error;

use crate::models::Medicine;
use crate::sources::{MedicineSource, SourceError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("no medicine information found")]
    NotFound,
}

/// Look up `query`, trying the structured source then the generative
/// fallback. Returns the first non-empty result set, or `NotFound` once
/// both tiers are exhausted.
pub async fn search<S, F>(
    structured: &S,
    fallback: &F,
    query: &str,
) -> Result<Vec<Medicine>, SearchError>
where
    S: MedicineSource,
    F: MedicineSource,
{
    match structured.lookup(query).await {
        Ok(records) if !records.is_empty() => {
            tracing::info!(query, count = records.len(), "structured source hit");
            return Ok(records);
        }
        Ok(_) => tracing::info!(query, "structured source returned no records"),
        Err(e) => tracing::warn!(query, error = %e, "structured source failed"),
    }

    match fallback.lookup(query).await {
        Ok(records) if !records.is_empty() => {
            tracing::info!(query, "generative fallback produced a record");
            Ok(records)
        }
        Ok(_) => Err(SearchError::NotFound),
        Err(e) => {
            tracing::warn!(query, error = %e, "generative fallback failed");
            Err(SearchError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted source: fixed outcome, counts how often it is consulted.
    struct Scripted {
        outcome: Result<Vec<Medicine>, String>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn returning(records: Vec<Medicine>) -> Self {
            Self {
                outcome: Ok(records),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::returning(vec![])
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MedicineSource for Scripted {
        async fn lookup(&self, _query: &str) -> Result<Vec<Medicine>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(SourceError::Http)
        }
    }

    fn record(id: &str, name: &str) -> Medicine {
        Medicine {
            id: id.into(),
            name: name.into(),
            generic_name: "Unknown".into(),
            description: "No description available".into(),
            indications: "No indications available".into(),
            warnings: "No warnings available".into(),
            dosage: "No dosage information available".into(),
        }
    }

    #[tokio::test]
    async fn structured_hit_skips_fallback() {
        let structured = Scripted::returning(vec![record("a1", "Aspirin")]);
        let fallback = Scripted::returning(vec![record("gemini-1", "Aspirin")]);

        let records = search(&structured, &fallback, "aspirin").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a1");
        assert_eq!(structured.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn structured_empty_consults_fallback_once() {
        let structured = Scripted::empty();
        let fallback = Scripted::returning(vec![record("gemini-1", "Obscurol")]);

        let records = search(&structured, &fallback, "obscurol").await.unwrap();
        assert_eq!(records[0].id, "gemini-1");
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn structured_failure_consults_fallback_once() {
        let structured = Scripted::failing("upstream 503");
        let fallback = Scripted::returning(vec![record("gemini-2", "Obscurol")]);

        let records = search(&structured, &fallback, "obscurol").await.unwrap();
        assert_eq!(records[0].id, "gemini-2");
        assert_eq!(structured.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn both_empty_is_not_found() {
        let structured = Scripted::empty();
        let fallback = Scripted::empty();

        let result = search(&structured, &fallback, "x").await;
        assert_eq!(result.unwrap_err(), SearchError::NotFound);
        assert_eq!(structured.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn both_failing_is_not_found() {
        let structured = Scripted::failing("boom");
        let fallback = Scripted::failing("boom");

        let result = search(&structured, &fallback, "x").await;
        assert_eq!(result.unwrap_err(), SearchError::NotFound);
        assert_eq!(fallback.calls(), 1);
    }
}
