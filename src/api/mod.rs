//! Inbound HTTP surface consumed by the UI.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use types::{ApiContext, AppState};
