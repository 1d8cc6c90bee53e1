//! Shared helpers for Papaya Market integration tests.
//!
//! Builds the real storefront router against a configuration whose store
//! API root points at an unroutable local port, so tests exercise routing,
//! session gating, validation, and the remote-failure paths without any
//! live upstream.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{Router, routing::get};
use secrecy::SecretString;

use papaya_market_storefront::config::{StoreApiConfig, StorefrontConfig};
use papaya_market_storefront::middleware::create_session_layer;
use papaya_market_storefront::routes;
use papaya_market_storefront::state::AppState;

/// A storefront configuration for tests.
///
/// The store API base URL targets the discard port on localhost, so any
/// handler that reaches upstream fails fast with a connection error.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kJ8#mP2$vQ9@wX4^nB7&cD1*fG5!hL3%"),
        store_api: StoreApiConfig::parse("http://127.0.0.1:9").expect("valid test URL"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the full application router, session layer included.
#[must_use]
pub fn test_app() -> Router {
    let state = AppState::new(test_config());
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state)
}
