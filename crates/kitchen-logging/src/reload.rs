// ABOUTME: Runtime log level reloading and configuration updates
// ABOUTME: Provides mechanism to update log filters without restarting the application

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::layers::create_env_filter;

type ReloadFn = dyn Fn(EnvFilter) -> Result<()> + Send + Sync;

/// Handle for updating log configuration at runtime
#[derive(Clone)]
pub struct LoggingReloadHandle {
    reload: Arc<ReloadFn>,
    current_config: Arc<RwLock<LoggingConfig>>,
}

impl LoggingReloadHandle {
    /// Wrap a filter reload function with the initial configuration
    pub fn new<F>(reload: F, config: LoggingConfig) -> Self
    where
        F: Fn(EnvFilter) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            reload: Arc::new(reload),
            current_config: Arc::new(RwLock::new(config)),
        }
    }

    fn apply(&self, config: &LoggingConfig) -> Result<()> {
        let new_filter =
            create_env_filter(config).context("Failed to create new environment filter")?;
        (self.reload)(new_filter).context("Failed to reload log filter")
    }

    /// Update the log level at runtime
    pub fn update_log_level(&self, level: tracing::Level) -> Result<()> {
        let mut config = self.current_config.write();
        config.level = level.into();
        self.apply(&config)?;

        tracing::info!(new_level = %level, "Log level updated at runtime");
        Ok(())
    }

    /// Update module-specific log levels
    pub fn update_module_level(&self, module: &str, level: tracing::Level) -> Result<()> {
        let mut config = self.current_config.write();
        config
            .module_levels
            .insert(module.to_string(), level.into());
        self.apply(&config)?;

        tracing::info!(module = %module, new_level = %level, "Module log level updated at runtime");
        Ok(())
    }

    /// Reload levels from environment variables, keeping outputs as they are
    pub fn reload_from_env(&self) -> Result<()> {
        let mut new_config =
            LoggingConfig::from_env().context("Failed to load configuration from environment")?;

        {
            let current = self.current_config.read();
            new_config.output = current.output.clone();
            new_config.file = current.file.clone();
        }

        self.apply(&new_config)?;
        *self.current_config.write() = new_config.clone();

        tracing::info!(
            level = %new_config.level.0,
            module_count = new_config.module_levels.len(),
            "Logging configuration reloaded from environment"
        );
        Ok(())
    }

    /// Get current configuration (clone)
    pub fn current_config(&self) -> LoggingConfig {
        self.current_config.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tracing::Level;

    fn recording_handle() -> (LoggingReloadHandle, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handle = LoggingReloadHandle::new(
            move |filter: EnvFilter| {
                sink.lock().push(filter.to_string().to_lowercase());
                Ok(())
            },
            LoggingConfig::default(),
        );
        (handle, seen)
    }

    #[test]
    fn test_update_log_level() {
        let (handle, seen) = recording_handle();
        handle.update_log_level(Level::DEBUG).unwrap();

        assert_eq!(handle.current_config().level.0, Level::DEBUG);
        assert_eq!(seen.lock().len(), 1);
        assert!(seen.lock()[0].contains("debug"));
    }

    #[test]
    fn test_update_module_level() {
        let (handle, seen) = recording_handle();
        handle
            .update_module_level("kitchen_project", Level::TRACE)
            .unwrap();

        assert!(
            handle
                .current_config()
                .module_levels
                .contains_key("kitchen_project")
        );
        assert!(seen.lock()[0].contains("kitchen_project=trace"));
    }

    #[test]
    fn test_failed_reload_propagates() {
        let handle = LoggingReloadHandle::new(
            |_| anyhow::bail!("subscriber gone"),
            LoggingConfig::default(),
        );
        assert!(handle.update_log_level(Level::WARN).is_err());
    }
}
