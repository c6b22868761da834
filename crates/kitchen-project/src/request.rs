// ABOUTME: A single repository operation bound to its project, sent at most once
// ABOUTME: Sending consumes the request and yields an outcome for the repository to apply

use kitchen_types::{Format, HttpMethod};

use crate::error::TransportError;
use crate::project::ProjectKey;
use crate::transport::{RequestSpec, Response, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dispatch {
    Remote(RequestSpec),
    /// Answered without an exchange
    Local(String),
}

/// One operation against the backend for one project
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a request does nothing until it is sent"]
pub struct Request {
    key: ProjectKey,
    method: HttpMethod,
    format: Format,
    dispatch: Dispatch,
}

impl Request {
    pub(crate) fn remote(key: ProjectKey, spec: RequestSpec) -> Self {
        Self {
            key,
            method: spec.method,
            format: spec.format,
            dispatch: Dispatch::Remote(spec),
        }
    }

    pub(crate) fn local(key: ProjectKey, method: HttpMethod, format: Format, body: &str) -> Self {
        Self {
            key,
            method,
            format,
            dispatch: Dispatch::Local(body.to_string()),
        }
    }

    pub fn key(&self) -> ProjectKey {
        self.key
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The exchange this request performs, `None` when answered locally
    pub fn spec(&self) -> Option<&RequestSpec> {
        match &self.dispatch {
            Dispatch::Remote(spec) => Some(spec),
            Dispatch::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.dispatch, Dispatch::Local(_))
    }

    /// Perform the request. Local requests succeed without touching the transport.
    pub async fn send(self, transport: &dyn Transport) -> RequestOutcome {
        let result = match &self.dispatch {
            Dispatch::Local(body) => Ok(Response::ok(body.clone())),
            Dispatch::Remote(spec) => transport.exchange(spec).await,
        };

        RequestOutcome {
            key: self.key,
            method: self.method,
            format: self.format,
            result,
        }
    }
}

/// Result of a sent request, tagged with what it was sent for
#[derive(Debug)]
pub struct RequestOutcome {
    pub key: ProjectKey,
    pub method: HttpMethod,
    pub format: Format,
    pub result: Result<Response, TransportError>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Response body on success, or the failure body when the server answered
    pub fn body(&self) -> Option<&str> {
        match &self.result {
            Ok(response) => Some(&response.body),
            Err(err) => err.body(),
        }
    }
}
