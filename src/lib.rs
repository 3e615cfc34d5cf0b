pub mod api; // Inbound HTTP surface consumed by the UI
pub mod chat; // Record-grounded chat responder
pub mod config;
pub mod models;
pub mod pipeline; // Two-tier acquisition pipeline
pub mod sources; // Outbound clients: openFDA + generative backend
