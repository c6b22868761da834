// ABOUTME: Tracing setup for Closure Kitchen: config, output layers, reload handle and console relay
// ABOUTME: The app installs one global subscriber through init_logging and logs with the re-exported macros

pub mod config;
pub mod layers;
pub mod relay;
pub mod reload;
pub mod subscriber;


pub use tracing::{Level, Span, debug, error, info, instrument, span, trace, warn};

pub use config::{FileConfig, LogLevel, LoggingConfig, OutputConfig, RelayConfig};
pub use relay::{LogRecord, LogSink, MemorySink, RelayLayer};
pub use reload::LoggingReloadHandle;
pub use subscriber::{init_subscriber_with_relay, relay_layer};

/// Install the global subscriber for `config`, relaying records at or above
/// `[relay] threshold` to the console pane's `sink`.
///
/// Fails when a global subscriber is already installed.
pub fn init_logging<K: LogSink>(
    config: LoggingConfig,
    sink: K,
) -> anyhow::Result<LoggingReloadHandle> {
    init_subscriber_with_relay(config, sink)
}
