//! Outbound data sources.
//!
//! Two clients feed the acquisition pipeline: the openFDA drug label API
//! (structured, authoritative) and the Gemini generative backend (fallback).
//! Both normalize their raw responses into `models::Medicine`. A failed
//! source is an `Err`; a reachable source with no match is `Ok(vec![])`.
//! The pipeline needs to tell those apart.

pub mod gemini;
pub mod openfda;
pub mod parse;

pub use gemini::{GeminiClient, GenerativeBackend, GenerativeFallback, MockBackend};
pub use openfda::OpenFdaClient;
pub use parse::parse_labeled_fields;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::models::Medicine;

/// Errors from either outbound service. The pipeline treats all of these as
/// "source unavailable" and moves on; they are never surfaced verbatim to
/// the end user.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("{service} returned error (status {status}): {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("response parsing error: {0}")]
    Parse(String),

    /// The generative backend produced no usable reply, e.g. a
    /// safety-filter rejection.
    #[error("generative backend returned no reply: {0}")]
    Blocked(String),
}

/// A medicine lookup source (allows mocking in pipeline and router tests).
pub trait MedicineSource {
    /// Look up medicines matching `query`. `Ok(vec![])` means the source was
    /// reachable but had no match.
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Medicine>, SourceError>> + Send;
}

impl<S: MedicineSource> MedicineSource for Arc<S> {
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Medicine>, SourceError>> + Send {
        S::lookup(self, query)
    }
}
