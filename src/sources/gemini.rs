//! Generative backend client (Gemini `generateContent`) and the
//! generative-fallback medicine lookup built on top of it.
//!
//! The backend is used two ways: a single free-text prompt (fallback lookup)
//! and an ordered multi-turn conversation with fixed generation parameters
//! and safety settings (chat). Both go through the `GenerativeBackend` trait
//! so tests can substitute a mock.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::parse::parse_labeled_fields;
use super::{MedicineSource, SourceError};
use crate::models::{
    Medicine, FALLBACK_ID_PREFIX, NO_DESCRIPTION, NO_DOSAGE, NO_INDICATIONS, NO_WARNINGS, UNKNOWN,
};

const CONNECT_TIMEOUT_SECS: u64 = 10;

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

/// One conversation turn as the generateContent API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::turn("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::turn("model", text)
    }

    fn turn(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f64,
}

/// Fixed generation parameters for chat replies.
pub const CHAT_GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 1000,
    top_k: 40,
    top_p: 0.8,
};

/// Safety settings applied to chat replies.
pub const CHAT_SAFETY_SETTINGS: &[SafetySetting] = &[SafetySetting {
    category: "HARM_CATEGORY_HARASSMENT",
    threshold: "BLOCK_MEDIUM_AND_ABOVE",
}];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<&'a [SafetySetting]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Extract the single reply text, or the reason there is none.
    fn into_text(self) -> Result<String, SourceError> {
        let GenerateContentResponse {
            candidates,
            prompt_feedback,
        } = self;

        let Some(candidate) = candidates.into_iter().next() else {
            let reason = prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(SourceError::Blocked(reason));
        };

        let text = candidate.content.map(|c| c.text()).unwrap_or_default();
        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "empty reply".to_string());
            return Err(SourceError::Blocked(reason));
        }
        Ok(text)
    }
}

// ═══════════════════════════════════════════════════════════
// Backend trait + HTTP client
// ═══════════════════════════════════════════════════════════

/// Generative backend abstraction (allows mocking).
pub trait GenerativeBackend {
    /// Single free-text prompt, default generation parameters.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Ordered conversation turns with the fixed chat generation config and
    /// safety settings. Returns the single reply text verbatim.
    fn converse(
        &self,
        turns: &[Content],
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

impl<G: GenerativeBackend> GenerativeBackend for Arc<G> {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, SourceError>> + Send {
        G::generate(self, prompt)
    }

    fn converse(
        &self,
        turns: &[Content],
    ) -> impl Future<Output = Result<String, SourceError>> + Send {
        G::converse(self, turns)
    }
}

/// HTTP client for the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        request: GenerateContentRequest<'_>,
    ) -> Result<String, SourceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                service: "generative backend",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        parsed.into_text()
    }
}

impl GenerativeBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, SourceError> {
        let contents = [Content::user(prompt)];
        self.generate_content(GenerateContentRequest {
            contents: &contents,
            safety_settings: None,
            generation_config: None,
        })
        .await
    }

    async fn converse(&self, turns: &[Content]) -> Result<String, SourceError> {
        self.generate_content(GenerateContentRequest {
            contents: turns,
            safety_settings: Some(CHAT_SAFETY_SETTINGS),
            generation_config: Some(CHAT_GENERATION_CONFIG),
        })
        .await
    }
}

// ═══════════════════════════════════════════════════════════
// Generative-fallback lookup
// ═══════════════════════════════════════════════════════════

/// The fixed six-field instruction sent when the structured source had no
/// match. The closest-analogue clause keeps the reply useful for misspelled
/// or regional names, with the substitution disclosed in the description.
fn lookup_prompt(query: &str) -> String {
    format!(
        "Provide detailed medical information about \"{query}\" in this exact format:\n\
         \n\
         Name: [Medicine Name]\n\
         Generic Name: [Generic Name if available, otherwise \"Unknown\"]\n\
         Description: [Detailed description of what this medicine is]\n\
         Indications: [What conditions this medicine treats]\n\
         Warnings: [Important safety warnings and side effects]\n\
         Dosage: [General dosage guidelines]\n\
         \n\
         Please ensure all information is evidence-based and follows medical \
         guidelines. If this exact medicine isn't known, provide information \
         about the closest known similar medicine or drug class, but clearly \
         state this fact in the description."
    )
}

/// Build a record from the parsed reply fields. `name` falls back to the
/// query term itself, everything else to the usual sentinels. The id is
/// stamped with the fallback prefix plus a millisecond timestamp;
/// uniqueness beyond that is cosmetic.
fn record_from_fields(
    query: &str,
    mut fields: std::collections::HashMap<String, String>,
) -> Medicine {
    let mut take = |key: &str, default: &str| {
        fields
            .remove(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    Medicine {
        id: format!(
            "{FALLBACK_ID_PREFIX}{}",
            chrono::Utc::now().timestamp_millis()
        ),
        name: take("name", query),
        generic_name: take("genericname", UNKNOWN),
        description: take("description", NO_DESCRIPTION),
        indications: take("indications", NO_INDICATIONS),
        warnings: take("warnings", NO_WARNINGS),
        dosage: take("dosage", NO_DOSAGE),
    }
}

/// Generative-fallback lookup client. Wraps a backend so the pipeline can
/// treat it as just another `MedicineSource`.
pub struct GenerativeFallback<G> {
    backend: G,
}

impl<G: GenerativeBackend> GenerativeFallback<G> {
    pub fn new(backend: G) -> Self {
        Self { backend }
    }
}

impl<G: GenerativeBackend + Sync> MedicineSource for GenerativeFallback<G> {
    async fn lookup(&self, query: &str) -> Result<Vec<Medicine>, SourceError> {
        let reply = self.backend.generate(&lookup_prompt(query)).await?;
        let fields = parse_labeled_fields(&reply);
        Ok(vec![record_from_fields(query, fields)])
    }
}

// ═══════════════════════════════════════════════════════════
// Mock backend for testing
// ═══════════════════════════════════════════════════════════

/// Mock generative backend — returns a configurable reply and records what
/// it was asked, for call-count and turn-sequence assertions.
pub struct MockBackend {
    reply: Result<String, String>,
    generate_calls: AtomicUsize,
    conversations: Mutex<Vec<Vec<Content>>>,
}

impl MockBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            generate_calls: AtomicUsize::new(0),
            conversations: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            generate_calls: AtomicUsize::new(0),
            conversations: Mutex::new(Vec::new()),
        }
    }

    /// How many single-prompt generations were requested.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Every turn sequence passed to `converse`, in call order.
    pub fn conversations(&self) -> Vec<Vec<Content>> {
        self.conversations.lock().unwrap().clone()
    }

    fn reply(&self) -> Result<String, SourceError> {
        self.reply.clone().map_err(SourceError::Http)
    }
}

impl GenerativeBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, SourceError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.reply()
    }

    async fn converse(&self, turns: &[Content]) -> Result<String, SourceError> {
        self.conversations.lock().unwrap().push(turns.to_vec());
        self.reply()
    }
}
