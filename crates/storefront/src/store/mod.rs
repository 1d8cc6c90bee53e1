//! Store API client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest`; the store API is the source of truth,
//!   no local sync
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//! - Concurrent lookups for the same product id are coalesced into a single
//!   upstream request
//!
//! # Example
//!
//! ```rust,ignore
//! use papaya_market_storefront::store::StoreClient;
//!
//! let client = StoreClient::new(&config.store_api);
//!
//! // Read-through product lookup
//! let product = client.product(ProductId::new(1)).await?;
//!
//! // A user's carts, newest data straight from the API
//! let carts = client.user_carts(UserId::new(3), &DateRange::default()).await?;
//! ```

mod client;
pub mod types;

pub use client::StoreClient;
pub use types::*;

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status; `body` carries a snippet of
    /// the response for diagnostics and user-facing toasts.
    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request URL could not be constructed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A coalesced lookup failed; the error is shared between all waiters.
    #[error("{0}")]
    Shared(Arc<StoreError>),
}

impl StoreError {
    /// The upstream response body, if this error carries one.
    ///
    /// Used by the login flow, which surfaces the API's own message in the
    /// failure toast.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::Shared(inner) => inner.response_body(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = StoreError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "username or password is incorrect".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API returned 401 Unauthorized: username or password is incorrect"
        );
    }

    #[test]
    fn test_shared_error_keeps_response_body() {
        let inner = StoreError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "bad input".to_string(),
        };
        let shared = StoreError::Shared(Arc::new(inner));
        assert_eq!(shared.response_body(), Some("bad input"));
    }

    #[test]
    fn test_http_error_has_no_response_body() {
        let err = StoreError::NotFound("x".to_string());
        assert!(err.response_body().is_none());
    }
}
