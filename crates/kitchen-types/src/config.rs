// ABOUTME: Configuration data types
// ABOUTME: Pure data structures for application configuration

use serde::{Deserialize, Serialize};

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the repository paths (`/projects`, `/compile`, ...) are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Run without a backing service (offline transport)
    #[serde(default)]
    pub offline: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            offline: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Which backend endpoint produces the preview script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Send the raw source to `/compile` and run the compiled output
    #[default]
    Compile,
    /// Send the dependency list to `/js` and run the bundle ahead of the raw source
    Requires,
}

/// Preview pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub mode: PreviewMode,

    /// Number of compiled sources kept in the preview cache
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            mode: PreviewMode::default(),
            cache_size: default_cache_size(),
        }
    }
}

fn default_cache_size() -> usize {
    10
}

/// Language of the messages the core surfaces to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

/// Session behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Ask before unloading a modified project
    #[serde(default = "default_true")]
    pub confirm_unload: bool,

    /// Persist guest buffers to local storage on unload
    #[serde(default = "default_true")]
    pub persist_guest_on_unload: bool,

    #[serde(default)]
    pub locale: Locale,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confirm_unload: true,
            persist_guest_on_unload: true,
            locale: Locale::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.timeout_ms, 10_000);
        assert!(!server.offline);

        let preview = PreviewConfig::default();
        assert_eq!(preview.mode, PreviewMode::Compile);
        assert_eq!(preview.cache_size, 10);

        let session = SessionConfig::default();
        assert!(session.confirm_unload);
        assert_eq!(session.locale, Locale::En);
    }

    #[test]
    fn test_partial_toml() {
        let preview: PreviewConfig = toml::from_str("mode = \"requires\"").unwrap();
        assert_eq!(preview.mode, PreviewMode::Requires);
        assert_eq!(preview.cache_size, 10);
    }
}
