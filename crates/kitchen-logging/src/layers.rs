// ABOUTME: Layer constructors for the console, file and JSON outputs plus the env filter
// ABOUTME: Boxed layers let the subscriber compose whatever the config enables

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::Directive,
    fmt::{self, format::FmtSpan},
};

use crate::config::{FileConfig, LoggingConfig, OutputConfig};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Human-readable output on stderr, compact unless `pretty_console` is set
pub fn create_console_layer(config: &OutputConfig) -> Option<BoxedLayer> {
    config.console.then(|| {
        let base = fmt::layer().with_target(true).with_writer(std::io::stderr);
        if config.pretty_console {
            base.pretty().with_span_events(FmtSpan::CLOSE).boxed()
        } else {
            base.compact().boxed()
        }
    })
}

fn split_log_path(path: &Path) -> Result<(&Path, &str)> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log file path has no usable file name: {}", path.display()))?;
    Ok((directory, file_name))
}

/// Daily rolling plain-text log file. Creates the directory when missing.
pub fn create_file_layer(config: &FileConfig) -> Result<BoxedLayer> {
    let (directory, file_name) = split_log_path(&config.path)?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
    // Dropping the guard stops the background flush; the file layer lives for the process
    std::mem::forget(guard);

    Ok(fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .boxed())
}

/// One JSON object per event on stdout
pub fn create_json_layer(config: &OutputConfig) -> Option<BoxedLayer> {
    config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    })
}

/// Global level plus one directive per target override
pub fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    config
        .module_levels
        .iter()
        .try_fold(EnvFilter::new(config.level.to_string()), |filter, (target, level)| {
            let directive = format!("{target}={level}")
                .parse::<Directive>()
                .with_context(|| format!("Invalid filter directive for target '{target}'"))?;
            Ok(filter.add_directive(directive))
        })
}
