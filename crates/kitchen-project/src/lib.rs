// ABOUTME: Project model, repository and backend transports for Closure Kitchen
// ABOUTME: Requests are built here and exchanged through a pluggable Transport

pub mod codec;
pub mod error;
pub mod project;
pub mod repository;
pub mod request;
pub mod transport;

pub use codec::{ANTI_HIJACK_PREFIX, extract_requires, parse_value};
pub use error::{ProjectError, Result, TransportError};
pub use project::{Project, ProjectKey};
pub use repository::ProjectRepository;
pub use request::{Request, RequestOutcome};
pub use transport::{LiveTransport, OfflineTransport, RequestSpec, Response, Transport};

use kitchen_types::ServerConfig;
use std::sync::Arc;

/// Pick the transport the server configuration asks for
pub fn transport_for(config: &ServerConfig) -> std::result::Result<Arc<dyn Transport>, TransportError> {
    if config.offline {
        kitchen_logging::info!("Using offline transport");
        Ok(Arc::new(OfflineTransport::new()))
    } else {
        kitchen_logging::info!(base_url = %config.base_url, "Using live transport");
        Ok(Arc::new(LiveTransport::new(config)?))
    }
}
