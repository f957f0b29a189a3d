use serde::Deserialize;
use std::path::Path;

use crate::poller::DEFAULT_POLL_INTERVAL_MS;
use crate::table::{DEFAULT_CONFIDENCE_MAX, DEFAULT_CONFIDENCE_MIN};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Dashboard backend root, e.g. "http://127.0.0.1:5000".
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Range of the decorative confidence figure in the log table.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_confidence_min")]
    pub confidence_min: f64,
    #[serde(default = "default_confidence_max")]
    pub confidence_max: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            confidence_min: default_confidence_min(),
            confidence_max: default_confidence_max(),
        }
    }
}

fn default_confidence_min() -> f64 {
    DEFAULT_CONFIDENCE_MIN
}

fn default_confidence_max() -> f64 {
    DEFAULT_CONFIDENCE_MAX
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let url = self.backend.base_url.trim();
        anyhow::ensure!(!url.is_empty(), "backend.base_url must be non-empty");
        anyhow::ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "backend.base_url must start with http:// or https://, got {}",
            url
        );
        anyhow::ensure!(
            self.polling.interval_ms > 0,
            "polling.interval_ms must be > 0, got {}",
            self.polling.interval_ms
        );
        anyhow::ensure!(
            self.display.confidence_min.is_finite() && self.display.confidence_max.is_finite(),
            "display.confidence_min and display.confidence_max must be finite"
        );
        anyhow::ensure!(
            self.display.confidence_min < self.display.confidence_max,
            "display.confidence_min must be < display.confidence_max, got {} >= {}",
            self.display.confidence_min,
            self.display.confidence_max
        );
        Ok(())
    }
}
