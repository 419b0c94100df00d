// Wire-level DTOs that only the HTTP adapter needs. Shared request/response shapes live in the
// domain layer.

use serde::Deserialize;

// Fallback error body for non-2xx responses that are not wrapped in the API envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
