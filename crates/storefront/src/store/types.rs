//! Domain types for the store API.
//!
//! These types mirror the JSON documents exchanged with the remote store API.
//! Field names on the wire are camelCase; structs that cross the wire carry
//! explicit serde renames so the Rust side can stay snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use papaya_market_core::{CartId, Email, ProductId, UserId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A catalog product snapshot.
///
/// Products are immutable once fetched; the client caches them per id for
/// the cache TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Aggregate review rating for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating value (e.g., 4.5).
    pub rate: f64,
    /// Total number of reviews.
    pub count: i64,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A cart fetched from the store API.
///
/// Fetched carts are read-only; new carts are composed client-side as a
/// [`crate::services::draft::CartDraft`] and submitted as a [`NewCart`].
#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub products: Vec<CartLine>,
}

/// A (product, quantity) line item within a fetched cart.
///
/// The API occasionally returns degenerate lines; both cells are lenient so
/// one bad line cannot fail the whole cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    #[serde(rename = "productId", default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: u32,
}

impl CartLine {
    /// A hole is a line with a missing/zero product id or a zero quantity.
    ///
    /// Holes render as nothing; they are skipped, not replaced.
    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.quantity == 0 || self.product_id.is_none_or(|id| id.as_i32() == 0)
    }
}

/// Payload for `POST /carts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCart {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// ISO 8601 timestamp; chrono serializes `DateTime<Utc>` as RFC 3339.
    pub date: DateTime<Utc>,
    pub products: Vec<NewCartLine>,
}

/// A line in a cart creation payload. Quantities are always positive here;
/// zero-quantity lines are filtered before the payload is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartLine {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Response from `POST /carts`; only the id is of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCart {
    pub id: CartId,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password: String,
}

/// Response from `POST /users`; the endpoint returns only the new id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    pub id: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parses_full_document() {
        let json = r#"{
            "id": 1,
            "title": "Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "image": "https://example.com/1.jpg",
            "rating": {"rate": 3.9, "count": 120}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title, "Backpack");
        assert!((product.price - 109.95).abs() < f64::EPSILON);
        assert_eq!(product.rating.unwrap().count, 120);
    }

    #[test]
    fn test_product_parses_without_optional_fields() {
        let product: Product =
            serde_json::from_str(r#"{"id": 2, "title": "Shirt", "price": 9.5}"#).unwrap();
        assert!(product.image.is_none());
        assert!(product.rating.is_none());
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_cart_parses_wire_document() {
        let json = r#"{
            "id": 5,
            "userId": 3,
            "date": "2020-03-01T00:00:00.000Z",
            "products": [
                {"productId": 7, "quantity": 1},
                {"productId": 8, "quantity": 0},
                {"quantity": 2}
            ]
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.id, CartId::new(5));
        assert_eq!(cart.user_id, UserId::new(3));
        assert!(cart.date.is_some());
        assert_eq!(cart.products.len(), 3);
        assert!(!cart.products[0].is_hole());
        assert!(cart.products[1].is_hole()); // zero quantity
        assert!(cart.products[2].is_hole()); // missing product id
    }

    #[test]
    fn test_cart_parses_without_date() {
        let cart: Cart =
            serde_json::from_str(r#"{"id": 1, "userId": 2, "products": []}"#).unwrap();
        assert!(cart.date.is_none());
    }

    #[test]
    fn test_zero_product_id_is_hole() {
        let line = CartLine {
            product_id: Some(ProductId::new(0)),
            quantity: 3,
        };
        assert!(line.is_hole());
    }

    #[test]
    fn test_new_cart_serializes_camel_case() {
        let payload = NewCart {
            user_id: UserId::new(3),
            date: "2024-06-02T10:30:00Z".parse().unwrap(),
            products: vec![NewCartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["products"][0]["productId"], 7);
        assert_eq!(json["products"][0]["quantity"], 2);
        // ISO 8601 timestamp, not a bare calendar date
        assert!(json["date"].as_str().unwrap().contains('T'));
    }
}
