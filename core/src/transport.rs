//! The host's side of the host-does-IO split.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip on behalf of the core.
///
/// Implementations must return non-2xx responses as `Ok`; status
/// interpretation belongs to the core. `Err` means no response was received.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
