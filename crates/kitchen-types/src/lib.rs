// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer for all other closure kitchen crates

pub mod config;
pub mod editor_types;
pub mod project;
pub mod startup;
pub mod user;

// Re-export commonly used types
pub use config::{Locale, PreviewConfig, PreviewMode, ServerConfig, SessionConfig};
pub use editor_types::{Buffer, HistoryDepth};
pub use project::{Format, HttpMethod, ProjectId, ProjectType, ProjectValues};
pub use startup::StartupInfo;
pub use user::UserRole;
