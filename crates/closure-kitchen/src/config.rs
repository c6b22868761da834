// ABOUTME: Application configuration loaded from kitchen.toml
// ABOUTME: Server, preview, session and logging sections, each falling back to defaults

use anyhow::Context;
use kitchen_logging::{LoggingConfig, LoggingReloadHandle};
use kitchen_types::{PreviewConfig, ServerConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::log_relay::ConsoleLogSink;

/// File name looked up in the configuration directory
pub const CONFIG_FILE_NAME: &str = "kitchen.toml";

const MAX_TIMEOUT_MS: u64 = 120_000;
const MAX_CACHE_SIZE: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitchenConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KitchenConfig {
    /// `~/.config/closure-kitchen`
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("closure-kitchen"))
    }

    /// Load configuration from the standard location
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_dir() {
            Some(dir) => Self::load_from_dir(&dir),
            None => {
                kitchen_logging::warn!("No configuration directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load `kitchen.toml` from a specific directory
    pub fn load_from_dir(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);

        kitchen_logging::info!(
            config_path = %path.display(),
            config_exists = path.exists(),
            "Loading kitchen configuration"
        );

        if !path.exists() {
            kitchen_logging::info!("No configuration file found, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: KitchenConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config.sanitized())
    }

    /// Install the global subscriber from the `[logging]` table plus `KITCHEN_LOG*` overrides.
    ///
    /// Records at or above `[logging.relay] threshold` go to `sink`; hand its receiver
    /// to [`App::attach_log_relay`](crate::App::attach_log_relay) to show them in the console pane.
    pub fn init_logging(&self, sink: ConsoleLogSink) -> anyhow::Result<LoggingReloadHandle> {
        let mut logging = self.logging.clone();
        logging.apply_env_overrides()?;
        kitchen_logging::init_logging(logging, sink)
    }

    /// Reject configurations the app cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.server.timeout_ms == 0 {
            return Err("Server timeout must be greater than 0".to_string());
        }

        if !self.server.offline && self.server.base_url.trim().is_empty() {
            return Err("Server base_url is required unless offline".to_string());
        }

        if self.preview.cache_size == 0 {
            kitchen_logging::warn!("Preview cache size must be positive, using 1");
        }

        Ok(())
    }

    /// Copy with out-of-range values clamped
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.server.timeout_ms = config.server.timeout_ms.clamp(1, MAX_TIMEOUT_MS);
        config.server.base_url = config.server.base_url.trim().to_string();
        config.preview.cache_size = config.preview.cache_size.clamp(1, MAX_CACHE_SIZE);
        config
    }
}
