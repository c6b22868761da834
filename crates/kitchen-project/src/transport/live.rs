// ABOUTME: HTTP transport against the Closure Kitchen backend using reqwest
// ABOUTME: Logs every exchange and reuses answers to identical dependency-bundle requests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::{RequestSpec, Response, Transport};
use crate::error::TransportError;
use kitchen_types::{HttpMethod, ServerConfig};

pub struct LiveTransport {
    client: reqwest::Client,
    base_url: Url,
    requires_cache: Mutex<HashMap<String, Response>>,
}

impl LiveTransport {
    pub fn new(config: &ServerConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::invalid_uri(&config.base_url, e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::network(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url,
            requires_cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn cached(&self, request: &RequestSpec) -> Option<Response> {
        if !request.is_cacheable() {
            return None;
        }
        let body = request.body.as_ref()?;
        self.requires_cache.lock().get(body).cloned()
    }

    fn remember(&self, request: &RequestSpec, response: &Response) {
        if let (true, Some(body)) = (request.is_cacheable(), request.body.as_ref()) {
            self.requires_cache
                .lock()
                .insert(body.clone(), response.clone());
        }
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for LiveTransport {
    async fn exchange(&self, request: &RequestSpec) -> Result<Response, TransportError> {
        if let Some(hit) = self.cached(request) {
            kitchen_logging::debug!(uri = %request.uri, "Dependency bundle served from cache");
            return Ok(hit);
        }

        let url = self
            .base_url
            .join(&request.uri)
            .map_err(|e| TransportError::invalid_uri(&request.uri, e.to_string()))?;

        let mut builder = self.client.request(to_reqwest(request.method), url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            kitchen_logging::warn!(uri = %request.uri, error = %e, "Network access failed");
            if e.is_timeout() {
                TransportError::timeout(&request.uri)
            } else {
                TransportError::network(&request.uri, e)
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(&request.uri, e))?;

        if !status.is_success() {
            kitchen_logging::warn!(
                uri = %request.uri,
                status = status.as_u16(),
                body = %body,
                "Network access failed"
            );
            return Err(TransportError::status(&request.uri, status.as_u16(), body));
        }

        kitchen_logging::info!(
            uri = %request.uri,
            status = status.as_u16(),
            body = %body,
            "Network access succeeded"
        );

        let response = Response {
            status: status.as_u16(),
            body,
        };
        self.remember(request, &response);
        Ok(response)
    }
}
