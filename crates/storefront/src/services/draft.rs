//! Cart draft assembly.
//!
//! A draft is the client-only, not-yet-submitted cart a user composes on
//! the "new cart" form. It is seeded with quantity zero for every product
//! in the catalog snapshot taken when the form opens, and is discarded on
//! cancel or successful submission.

use chrono::{DateTime, Utc};

use papaya_market_core::{ProductId, Quantity, UserId};

use crate::store::types::{NewCart, NewCartLine, Product};

/// A mutable cart-in-progress.
///
/// Lines keep the catalog order they were seeded in, so payloads built from
/// the same draft state are byte-for-byte identical.
#[derive(Debug, Clone, PartialEq)]
pub struct CartDraft {
    user_id: UserId,
    date: DateTime<Utc>,
    lines: Vec<(ProductId, Quantity)>,
}

impl CartDraft {
    /// Open a draft against a catalog snapshot.
    ///
    /// Every catalog product is seeded at quantity zero. The snapshot is not
    /// re-synced if the catalog changes mid-edit.
    #[must_use]
    pub fn new(user_id: UserId, date: DateTime<Utc>, catalog: &[Product]) -> Self {
        Self {
            user_id,
            date,
            lines: catalog.iter().map(|product| (product.id, Quantity::ZERO)).collect(),
        }
    }

    /// Set the quantity for a seeded product.
    ///
    /// Ids outside the seeded catalog are ignored; the draft only ever
    /// contains products the user was shown.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: Quantity) {
        if let Some(entry) = self.lines.iter_mut().find(|(id, _)| *id == product_id) {
            entry.1 = quantity;
        }
    }

    /// Current quantity for a product (zero if not seeded).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Quantity {
        self.lines
            .iter()
            .find(|(id, _)| *id == product_id)
            .map_or(Quantity::ZERO, |(_, quantity)| *quantity)
    }

    /// The user this draft belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Build the creation payload.
    ///
    /// Only lines with a positive quantity survive; order follows the
    /// seeded catalog. Pure: calling this twice on unchanged state yields
    /// identical payloads.
    #[must_use]
    pub fn payload(&self) -> NewCart {
        NewCart {
            user_id: self.user_id,
            date: self.date,
            products: self
                .lines
                .iter()
                .filter(|(_, quantity)| !quantity.is_zero())
                .map(|(product_id, quantity)| NewCartLine {
                    product_id: *product_id,
                    quantity: quantity.get(),
                })
                .collect(),
        }
    }
}
