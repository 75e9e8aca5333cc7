use std::path::PathBuf;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3-8b-instruct";
const DEFAULT_PORT: u16 = 3000;

/// Process-wide settings, loaded once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer credential for the upstream provider (`OPENROUTER_API_KEY`).
    pub api_key: Option<String>,
    /// Base URL the completions path is appended to (`UPSTREAM_BASE_URL`).
    pub upstream_base_url: String,
    pub model: String,
    pub port: u16,
    /// Built frontend served as the router fallback (`STATIC_DIR`).
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never have to
    /// touch the real process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty("OPENROUTER_API_KEY"),
            upstream_base_url: non_empty("UPSTREAM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            model: DEFAULT_MODEL.to_string(),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: non_empty("STATIC_DIR").map(PathBuf::from),
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.upstream_base_url)
    }
}
