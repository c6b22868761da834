// ABOUTME: Tracing subscriber initialization and layer composition
// ABOUTME: Combines console, file, JSON and relay layers under a reloadable filter

use anyhow::{Context, Result};

use crate::config::LoggingConfig;
use crate::layers::{
    BoxedLayer, create_console_layer, create_env_filter, create_file_layer, create_json_layer,
};
use crate::relay::{LogSink, RelayLayer};
use crate::reload::LoggingReloadHandle;

/// Collect the output layers the configuration enables.
pub fn build_layers(config: &LoggingConfig) -> Result<Vec<BoxedLayer>> {
    let mut layers = Vec::new();

    if let Some(console) = create_console_layer(&config.output) {
        layers.push(console);
    }
    if let Some(json) = create_json_layer(&config.output) {
        layers.push(json);
    }
    if config.output.file {
        layers.push(create_file_layer(&config.file).context("Failed to set up file logging")?);
    }

    Ok(layers)
}

fn install(config: LoggingConfig, mut layers: Vec<BoxedLayer>) -> Result<LoggingReloadHandle> {
    use tracing_subscriber::{prelude::*, reload, util::SubscriberInitExt};

    let env_filter = create_env_filter(&config).context("Failed to create environment filter")?;
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);

    layers.extend(build_layers(&config)?);

    tracing_subscriber::registry()
        .with(layers)
        .with(filter_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(
        log_level = %config.level,
        relay_threshold = %config.relay.threshold,
        console_output = config.output.console,
        file_output = config.output.file,
        json_output = config.output.json,
        file_path = %config.file.path.display(),
        "Closure Kitchen logging initialized"
    );

    Ok(LoggingReloadHandle::new(
        move |filter| {
            filter_handle
                .reload(filter)
                .context("Filter layer is gone")
        },
        config,
    ))
}

/// The console-pane relay: events at or above `[relay] threshold` go to `sink`
pub fn relay_layer<K: LogSink>(config: &LoggingConfig, sink: K) -> BoxedLayer {
    Box::new(RelayLayer::new(sink, config.relay.threshold.into()))
}

/// Initialize the global subscriber with hot-reload support, relaying events
/// at or above the configured threshold to `sink`.
pub fn init_subscriber_with_relay<K: LogSink>(
    config: LoggingConfig,
    sink: K,
) -> Result<LoggingReloadHandle> {
    let relay = relay_layer(&config, sink);
    install(config, vec![relay])
}
