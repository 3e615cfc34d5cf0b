use tracing_subscriber::EnvFilter;

use medichat::api::{server, AppState};
use medichat::config::{self, Settings};
use medichat::sources::{GeminiClient, OpenFdaClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::from_env();

    let structured = OpenFdaClient::new(&settings.fda_base_url, &settings.fda_api_key);
    let backend = GeminiClient::new(
        &settings.gemini_base_url,
        &settings.gemini_api_key,
        &settings.gemini_model,
    );

    let ctx = AppState::new(structured, backend);

    if let Err(e) = server::serve(ctx, &settings.host, settings.port).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
