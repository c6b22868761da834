// ABOUTME: Logging configuration: levels, outputs, log file and console relay threshold
// ABOUTME: Loaded from the [logging] table of kitchen.toml, then overridden by KITCHEN_LOG* variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// A tracing level that reads and writes as its lowercase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(pub Level);

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    /// Accepts tracing names plus the `warning`/`severe` spellings used by preview loggers
    fn from_str(name: &str) -> Result<Self> {
        let level = match name.trim().to_ascii_lowercase().as_str() {
            "trace" | "finest" => Level::TRACE,
            "debug" | "fine" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" | "severe" => Level::ERROR,
            other => anyhow::bail!(
                "Unknown log level '{other}', expected trace, debug, info, warn or error"
            ),
        };
        Ok(LogLevel(level))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.as_str().to_ascii_lowercase())
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Per-target overrides, e.g. `kitchen_project = "debug"`
    pub module_levels: BTreeMap<String, LogLevel>,

    pub output: OutputConfig,

    pub file: FileConfig,

    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub console: bool,
    pub file: bool,
    pub json: bool,
    /// Multi-line pretty console format instead of compact
    pub pretty_console: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Rolled daily; defaults to ~/.config/closure-kitchen/closure-kitchen.log
    pub path: PathBuf,
}

/// Records forwarded to the in-page debug console
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub threshold: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(Level::INFO),
            module_levels: BTreeMap::new(),
            output: OutputConfig::default(),
            file: FileConfig::default(),
            relay: RelayConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: true,
            json: false,
            pretty_console: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        let path = dirs::config_dir()
            .map(|dir| dir.join("closure-kitchen"))
            .unwrap_or_default()
            .join("closure-kitchen.log");
        Self { path }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            threshold: LogLevel(Level::WARN),
        }
    }
}

/// Presence-only variables and the output switch each one flips
const OUTPUT_SWITCHES: &[(&str, fn(&mut OutputConfig))] = &[
    ("KITCHEN_LOG_JSON", |output| output.json = true),
    ("KITCHEN_LOG_PRETTY", |output| output.pretty_console = true),
    ("KITCHEN_LOG_NO_CONSOLE", |output| output.console = false),
    ("KITCHEN_LOG_NO_FILE", |output| output.file = false),
];

impl LoggingConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// `KITCHEN_LOG` takes a single level and wins over `RUST_LOG` directives.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = env::var("KITCHEN_LOG") {
            self.level = level.parse().context("Invalid KITCHEN_LOG")?;
        } else if let Ok(directives) = env::var("RUST_LOG") {
            self.apply_directives(&directives)
                .context("Invalid RUST_LOG")?;
        }

        if let Ok(path) = env::var("KITCHEN_LOG_FILE") {
            self.file.path = PathBuf::from(path);
        }

        for (name, switch) in OUTPUT_SWITCHES {
            if env::var_os(name).is_some() {
                switch(&mut self.output);
            }
        }

        Ok(())
    }

    /// Apply `RUST_LOG`-style directives: a bare level sets the global level,
    /// `target=level` adds an override.
    fn apply_directives(&mut self, directives: &str) -> Result<()> {
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, level)) => {
                    let level = level
                        .parse()
                        .with_context(|| format!("Bad level for target '{target}'"))?;
                    self.module_levels.insert(target.to_string(), level);
                }
                None => self.level = directive.parse()?,
            }
        }
        Ok(())
    }
}
