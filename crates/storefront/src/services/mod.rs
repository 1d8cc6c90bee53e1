//! Domain services for the storefront.
//!
//! Pure logic with no I/O: route handlers fetch data through the store
//! client and hand it to these modules.
//!
//! - [`pagination`] - per-cart line paging and newest-first cart ordering
//! - [`draft`] - composing a new cart from a catalog snapshot
//! - [`daterange`] - the inclusive date filter on the cart list
//! - [`validation`] - declarative form validation rules

pub mod daterange;
pub mod draft;
pub mod pagination;
pub mod validation;
