//! Error types for the board API client.
//!
//! # Design
//! Every remote failure (non-2xx status, transport failure, undecodable body)
//! collapses into one [`FetchError`] that carries only the operation. Its
//! message is fixed per operation; status codes and bodies are written to the
//! log where the failure is detected, not attached to the error.

use thiserror::Error;

use crate::resource::Operation;

/// A remote call did not succeed. No retry has been attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .operation.failure_message())]
pub struct FetchError {
    pub operation: Operation,
}

impl FetchError {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }
}

/// The host could not complete an HTTP round-trip at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Action, ResourceType};

    #[test]
    fn fetch_error_displays_fixed_message() {
        let err = FetchError::new(Operation::new(Action::List, ResourceType::Todos));
        assert_eq!(err.to_string(), "Failed to fetch todos");
    }

    #[test]
    fn transport_error_display() {
        assert_eq!(
            TransportError::new("connection refused").to_string(),
            "transport failed: connection refused"
        );
    }
}
