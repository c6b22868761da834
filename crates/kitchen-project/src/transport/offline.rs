// ABOUTME: Transport that answers locally for sessions without a backend
// ABOUTME: Creates get fresh random ids and compiles echo the source back

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use super::{RequestSpec, Response, Transport};
use crate::error::TransportError;
use kitchen_types::{Format, HttpMethod};

#[derive(Debug, Default, Clone)]
pub struct OfflineTransport;

impl OfflineTransport {
    pub fn new() -> Self {
        Self
    }

    fn answer(request: &RequestSpec) -> String {
        match (request.method, request.format) {
            (HttpMethod::Post, Format::Compile) => json!({
                "compiledCode": request.body.as_deref().unwrap_or_default(),
            })
            .to_string(),
            (HttpMethod::Post, Format::Publish | Format::Requires) => "{}".to_string(),
            (HttpMethod::Post, _) => {
                let id: u64 = rand::thread_rng().r#gen();
                json!({ "id": format!("l_{id:016x}") }).to_string()
            }
            _ => "{}".to_string(),
        }
    }
}

#[async_trait]
impl Transport for OfflineTransport {
    async fn exchange(&self, request: &RequestSpec) -> Result<Response, TransportError> {
        let body = Self::answer(request);
        kitchen_logging::debug!(
            uri = %request.uri,
            method = %request.method,
            format = %request.format,
            "Answered request offline"
        );
        Ok(Response::ok(body))
    }
}
