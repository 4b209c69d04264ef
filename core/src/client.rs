//! Stateless HTTP request builder and response parser for the board API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse*` method that consumes an `HttpResponse`. The
//! caller executes the actual HTTP round-trip, keeping the core deterministic
//! and free of I/O dependencies.
//!
//! Any status outside 2xx is rejected before the body is looked at.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::resource::{Action, Operation, ResourceType};
use crate::types::WithId;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list(&self, resource: ResourceType) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/{resource}", self.base_url))
    }

    pub fn build_get(&self, resource: ResourceType, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/{resource}/{id}", self.base_url))
    }

    /// `GET /{parent}/{id}/{child}`, e.g. the comments of one post.
    pub fn build_children(
        &self,
        parent: ResourceType,
        id: u64,
        child: ResourceType,
    ) -> HttpRequest {
        self.bare(
            HttpMethod::Get,
            format!("{}/{parent}/{id}/{child}", self.base_url),
        )
    }

    pub fn build_create<D: Serialize>(
        &self,
        resource: ResourceType,
        draft: &D,
    ) -> Result<HttpRequest, FetchError> {
        let op = Operation::new(Action::Create, resource);
        self.with_body(
            HttpMethod::Post,
            format!("{}/{resource}", self.base_url),
            op,
            draft,
        )
    }

    /// Full replace. The body is `draft` with `id` merged in.
    pub fn build_update<D: Serialize>(
        &self,
        resource: ResourceType,
        id: u64,
        draft: &D,
    ) -> Result<HttpRequest, FetchError> {
        let op = Operation::new(Action::Update, resource);
        self.with_body(
            HttpMethod::Put,
            format!("{}/{resource}/{id}", self.base_url),
            op,
            &WithId { id, draft },
        )
    }

    pub fn build_patch<P: Serialize>(
        &self,
        resource: ResourceType,
        id: u64,
        patch: &P,
    ) -> Result<HttpRequest, FetchError> {
        let op = Operation::new(Action::Patch, resource);
        self.with_body(
            HttpMethod::Patch,
            format!("{}/{resource}/{id}", self.base_url),
            op,
            patch,
        )
    }

    pub fn build_delete(&self, resource: ResourceType, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/{resource}/{id}", self.base_url))
    }

    /// Check the status and parse the body as untyped JSON.
    pub fn parse_json(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<serde_json::Value, FetchError> {
        check_status(operation, &response)?;
        serde_json::from_str(&response.body).map_err(|e| {
            warn!(%operation, error = %e, "response body is not JSON");
            FetchError::new(operation)
        })
    }

    /// Decode an already-parsed JSON value into the expected type.
    pub fn decode<T: DeserializeOwned>(
        &self,
        operation: Operation,
        value: serde_json::Value,
    ) -> Result<T, FetchError> {
        serde_json::from_value(value).map_err(|e| {
            warn!(%operation, error = %e, "response body has unexpected shape");
            FetchError::new(operation)
        })
    }

    pub fn parse<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<T, FetchError> {
        let value = self.parse_json(operation, response)?;
        self.decode(operation, value)
    }

    /// Deletes succeed on any 2xx; the body is ignored.
    pub fn parse_delete(
        &self,
        resource: ResourceType,
        response: HttpResponse,
    ) -> Result<(), FetchError> {
        check_status(Operation::new(Action::Delete, resource), &response)
    }

    fn bare(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body<B: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        operation: Operation,
        body: &B,
    ) -> Result<HttpRequest, FetchError> {
        let body = serde_json::to_string(body).map_err(|e| {
            warn!(%operation, error = %e, "request body could not be serialized");
            FetchError::new(operation)
        })?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }
}

fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(%operation, status = response.status, body = %response.body, "request rejected");
    Err(FetchError::new(operation))
}
