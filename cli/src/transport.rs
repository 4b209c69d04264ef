use std::time::Duration;

use board_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use ureq::typestate::WithBody;
use ureq::RequestBuilder;

/// Blocking transport over a shared ureq agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are the core's business, so 4xx/5xx come back as data.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let a = &self.agent;
        let result = match method {
            HttpMethod::Get => with_headers(a.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(a.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(a.post(&url), &headers), body),
            HttpMethod::Put => send(with_headers(a.put(&url), &headers), body),
            HttpMethod::Patch => send(with_headers(a.patch(&url), &headers), body),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (k, v) in headers {
        builder = builder.header(k.as_str(), v.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(b) => builder.send(b.as_bytes()),
        None => builder.send_empty(),
    }
}
