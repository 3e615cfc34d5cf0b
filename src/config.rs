//! Runtime configuration.
//!
//! Credentials and base URLs are read once at startup and threaded into the
//! client constructors explicitly; there are no module-level singletons, so tests can
//! substitute fakes without touching the environment.

pub const APP_NAME: &str = "medichat";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// openFDA drug label API.
pub const DEFAULT_FDA_BASE_URL: &str = "https://api.fda.gov";

/// Google generative language API (Gemini).
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info")
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub fda_base_url: String,
    pub fda_api_key: String,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    ///
    /// Missing API keys are a warning rather than a startup failure: the
    /// openFDA API works unauthenticated at a lower rate limit, and a missing
    /// Gemini key surfaces per-request as an upstream failure.
    pub fn from_env() -> Self {
        let settings = Self {
            host: env_or("HOST", DEFAULT_HOST),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            fda_base_url: env_or("FDA_BASE_URL", DEFAULT_FDA_BASE_URL),
            fda_api_key: env_or("FDA_API_KEY", ""),
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_api_key: env_or("GOOGLE_API_KEY", ""),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        };

        if settings.fda_api_key.is_empty() {
            tracing::warn!("FDA_API_KEY not set; openFDA requests will be rate-limited");
        }
        if settings.gemini_api_key.is_empty() {
            tracing::warn!("GOOGLE_API_KEY not set; generative fallback and chat will fail");
        }

        settings
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_scopes_to_crate() {
        assert!(default_log_filter().starts_with(APP_NAME));
    }

    #[test]
    fn env_or_falls_back_to_default() {
        assert_eq!(env_or("MEDICHAT_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
