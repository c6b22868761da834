// ABOUTME: Transport abstraction between the repository and the backend
// ABOUTME: One exchange per call; live and offline implementations live in submodules

use async_trait::async_trait;
use kitchen_types::{Format, HttpMethod};

use crate::error::TransportError;

pub mod live;
pub mod offline;

pub use live::LiveTransport;
pub use offline::OfflineTransport;

/// Everything needed to perform one backend exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub uri: String,
    pub method: HttpMethod,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
    pub format: Format,
}

impl RequestSpec {
    /// Whether this is a dependency-bundle request whose answers may be reused
    pub fn is_cacheable(&self) -> bool {
        self.method.has_body() && self.format == Format::Requires
    }
}

/// A successful backend answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one exchange. Failures are returned, never raised.
    async fn exchange(&self, request: &RequestSpec) -> Result<Response, TransportError>;
}
