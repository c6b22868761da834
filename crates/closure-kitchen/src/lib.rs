// ABOUTME: Closure Kitchen application core: the action-dispatching controller
// ABOUTME: Wires the project repository, transports and UI collaborators together

pub mod app;
pub mod config;
pub mod error;
pub mod log_relay;
pub mod messages;

pub use app::{App, Collaborators};
pub use config::KitchenConfig;
pub use error::{AppError, Result};
pub use log_relay::{ConsoleLogReceiver, ConsoleLogSink};
pub use messages::Messages;

#[cfg(test)]
mod tests;
