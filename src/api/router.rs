//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Generic over the source clients so integration tests can run the full
//! HTTP surface against mocks.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::sources::{GenerativeBackend, MedicineSource};

/// Build the API router. CORS is permissive; the UI is served separately.
pub fn api_router<S, G>(ctx: ApiContext<S, G>) -> Router
where
    S: MedicineSource + Send + Sync + 'static,
    G: GenerativeBackend + Send + Sync + 'static,
{
    Router::new()
        .route("/api/medicine", get(endpoints::search_medicine::<S, G>))
        .route("/api/chat", post(endpoints::send_chat::<S, G>))
        .route("/api/health", get(endpoints::health_check))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
