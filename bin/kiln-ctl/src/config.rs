//! CLI configuration, loaded from environment variables at startup.

/// Runtime configuration for kiln-ctl.
///
/// Every field has a default so the tool works against a local backend
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// API root, envelope endpoints live underneath
    /// (default: `"http://127.0.0.1:5000/api"`).
    pub api_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,hyper=warn"`.
    pub log_level: String,

    /// Seconds between task progress polls for `watch`.
    pub poll_interval_secs: u64,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("KILN_API_URL", "http://127.0.0.1:5000/api"),
            log_level: env_or("KILN_LOG", "info"),
            poll_interval_secs: parse_env("KILN_POLL_INTERVAL", 2),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
