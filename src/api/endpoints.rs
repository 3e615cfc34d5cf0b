//! Endpoint handlers.
//!
//! - `GET /api/medicine?query=<q>` — acquisition pipeline
//! - `POST /api/chat` — record-grounded chat
//! - `GET /api/health` — liveness

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;
use crate::models::{Medicine, Message};
use crate::pipeline;
use crate::sources::{GenerativeBackend, MedicineSource};

#[derive(Deserialize)]
pub struct MedicineQuery {
    pub query: Option<String>,
}

/// `GET /api/medicine` — search both tiers for a medicine.
pub async fn search_medicine<S, G>(
    State(ctx): State<ApiContext<S, G>>,
    Query(params): Query<MedicineQuery>,
) -> Result<Json<Vec<Medicine>>, ApiError>
where
    S: MedicineSource + Send + Sync + 'static,
    G: GenerativeBackend + Send + Sync + 'static,
{
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;

    let medicines = pipeline::search(&ctx.structured, &ctx.fallback, query).await?;
    Ok(Json(medicines))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    pub medicine_data: Option<Medicine>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /api/chat` — answer a follow-up question grounded in the record.
pub async fn send_chat<S, G>(
    State(ctx): State<ApiContext<S, G>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError>
where
    S: MedicineSource + Send + Sync + 'static,
    G: GenerativeBackend + Send + Sync + 'static,
{
    let record = request
        .medicine_data
        .ok_or_else(|| ApiError::BadRequest("Medicine data is required".to_string()))?;

    let reply = crate::chat::respond(&ctx.backend, &request.messages, &record).await?;
    Ok(Json(ChatResponse { response: reply }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/health` — liveness only; upstream services are not probed.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
    })
}
