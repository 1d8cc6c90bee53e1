//! Store API client implementation.
//!
//! Plain REST/JSON via `reqwest`. Catalog reads are cached with `moka`
//! (5-minute TTL); cart reads and all writes go straight to the API.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use papaya_market_core::{ProductId, UserId};

use crate::config::StoreApiConfig;
use crate::services::daterange::DateRange;
use crate::store::StoreError;
use crate::store::types::{
    AuthToken, Cart, CreatedCart, CreatedUser, Credentials, NewCart, NewUser, Product,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Upper bound on cached catalog entries.
const CACHE_CAPACITY: u64 = 1000;

/// Client for the store API.
///
/// Provides typed access to auth, catalog, and cart operations. Product
/// lookups are read-through cached: a miss triggers one upstream fetch and
/// concurrent callers for the same id share that in-flight request.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
    catalog: Cache<(), Vec<Product>>,
}

impl StoreClient {
    /// Create a new store API client.
    #[must_use]
    pub fn new(config: &StoreApiConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        let catalog = Cache::builder()
            .max_capacity(1)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                products,
                catalog,
            }),
        }
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    /// A rejection carries the API's response body for display.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, StoreError> {
        self.post_json("auth/login", credentials).await
    }

    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the account or the request fails.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn register(&self, user: &NewUser) -> Result<CreatedUser, StoreError> {
        self.post_json("users", user).await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full product catalog (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; failures are shared with
    /// concurrent callers and not cached.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, StoreError> {
        self.inner
            .catalog
            .try_get_with((), self.fetch_products())
            .await
            .map_err(StoreError::Shared)
    }

    /// Get a product by id (read-through cached).
    ///
    /// Concurrent lookups for the same id are coalesced into one upstream
    /// request; every waiter receives the same resolved value.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.inner
            .products
            .try_get_with(id, self.fetch_product(id))
            .await
            .map_err(StoreError::Shared)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        debug!("catalog cache miss, fetching");
        self.get_json("products", &[]).await
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, StoreError> {
        debug!("product cache miss, fetching");
        self.get_json(&format!("products/{id}"), &[]).await
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get a user's carts, optionally constrained to an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, range), fields(user_id = %user_id))]
    pub async fn user_carts(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> Result<Vec<Cart>, StoreError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(start) = range.start_param() {
            query.push(("startdate", start));
        }
        if let Some(end) = range.end_param() {
            query.push(("enddate", end));
        }

        self.get_json(&format!("carts/user/{user_id}"), &query).await
    }

    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the cart or the request fails.
    #[instrument(skip(self, cart), fields(user_id = %cart.user_id))]
    pub async fn create_cart(&self, cart: &NewCart) -> Result<CreatedCart, StoreError> {
        self.post_json("carts", cart).await
    }

    // =========================================================================
    // HTTP Plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let url = self.inner.base_url.join(path)?;
        let mut request = self.inner.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        Self::read_json(response, path).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::read_json(response, path).await
    }

    /// Read a response body as JSON. The body is fetched as text first so
    /// parse failures can be logged with context.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, StoreError> {
        let status = response.status();
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %snippet(&text, 500),
                "store API returned non-success status"
            );
            return Err(StoreError::Status {
                status,
                body: snippet(&text, 200),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %snippet(&text, 500),
                "failed to parse store API response"
            );
            StoreError::Parse(e)
        })
    }
}

/// Truncate a response body for logs and error messages.
fn snippet(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
