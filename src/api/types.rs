//! Shared state for the API router.

use std::sync::Arc;

use crate::sources::{GenerativeBackend, GenerativeFallback, MedicineSource};

/// Application state behind every handler: the structured source, the
/// generative-fallback lookup built over the backend, and the backend itself
/// for chat. Generic over the two client traits so router tests can inject
/// mocks.
pub struct AppState<S, G> {
    pub structured: S,
    pub fallback: GenerativeFallback<G>,
    pub backend: G,
}

/// Cloneable handle handed to axum as router state.
pub type ApiContext<S, G> = Arc<AppState<S, G>>;

impl<S, G> AppState<S, G>
where
    S: MedicineSource,
    G: GenerativeBackend + Clone,
{
    pub fn new(structured: S, backend: G) -> ApiContext<S, G> {
        Arc::new(Self {
            structured,
            fallback: GenerativeFallback::new(backend.clone()),
            backend,
        })
    }
}
