//! Cart line pagination and cart list ordering.
//!
//! Each cart's line items paginate independently of the others. Degenerate
//! lines ("holes": missing/zero product id or zero quantity) occupy a slot
//! in the window but render as nothing.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::store::types::{Cart, CartLine};

/// Rows shown per cart table page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of a cart's line items.
#[derive(Debug)]
pub struct CartPageView<'a> {
    /// Non-hole lines within the page window, in cart order.
    pub rows: Vec<&'a CartLine>,
    /// Total line count of the cart, holes included.
    pub total: usize,
    /// Blank rows padding the tail page to full height. Always zero on the
    /// first page, even for an empty cart.
    pub empty_rows: usize,
}

/// Slice one page out of a cart's line items.
///
/// The window is `[page_index * page_size, (page_index + 1) * page_size)`;
/// holes inside the window are skipped without replacement. Padding fills
/// the last page up to `page_size` rows, but only past the first page, so a
/// short cart never renders trailing blanks.
#[must_use]
pub fn paginate(lines: &[CartLine], page_index: usize, page_size: usize) -> CartPageView<'_> {
    let total = lines.len();
    let start = page_index.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    let rows = lines
        .get(start..end)
        .unwrap_or(&[])
        .iter()
        .filter(|line| !line.is_hole())
        .collect();

    let empty_rows = if page_index == 0 {
        0
    } else {
        page_index
            .saturating_add(1)
            .saturating_mul(page_size)
            .saturating_sub(total)
    };

    CartPageView {
        rows,
        total,
        empty_rows,
    }
}

/// Number of pages needed for `total` lines.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Order carts newest-first by date.
///
/// The sort is stable; carts without a date count as the Unix epoch and end
/// up last.
pub fn sort_latest_first(carts: &mut [Cart]) {
    carts.sort_by_key(|cart| Reverse(cart.date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use papaya_market_core::{CartId, ProductId, UserId};

    fn line(product_id: i32, quantity: u32) -> CartLine {
        CartLine {
            product_id: Some(ProductId::new(product_id)),
            quantity,
        }
    }

    fn lines(count: usize) -> Vec<CartLine> {
        (0..count)
            .map(|i| line(i32::try_from(i).unwrap() + 1, 1))
            .collect()
    }

    fn cart(id: i32, date: Option<&str>) -> Cart {
        Cart {
            id: CartId::new(id),
            user_id: UserId::new(1),
            date: date.map(|d| d.parse().unwrap()),
            products: Vec::new(),
        }
    }

    #[test]
    fn test_seven_lines_page_zero() {
        let items = lines(7);
        let page = paginate(&items, 0, 5);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.total, 7);
        assert_eq!(page.empty_rows, 0);
        assert_eq!(page.rows[0].product_id, Some(ProductId::new(1)));
        assert_eq!(page.rows[4].product_id, Some(ProductId::new(5)));
    }

    #[test]
    fn test_seven_lines_page_one_pads_to_full_height() {
        let items = lines(7);
        let page = paginate(&items, 1, 5);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].product_id, Some(ProductId::new(6)));
        assert_eq!(page.rows[1].product_id, Some(ProductId::new(7)));
        assert_eq!(page.empty_rows, 3);
    }

    #[test]
    fn test_first_page_never_pads_even_when_empty() {
        let page = paginate(&[], 0, 5);
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.empty_rows, 0);
    }

    #[test]
    fn test_page_past_the_end_is_all_padding() {
        let items = lines(3);
        let page = paginate(&items, 2, 5);
        assert!(page.rows.is_empty());
        assert_eq!(page.empty_rows, 12);
    }

    #[test]
    fn test_holes_are_skipped_not_replaced() {
        let items = vec![
            line(1, 2),
            CartLine {
                product_id: None,
                quantity: 4,
            },
            line(3, 0),
            line(4, 1),
        ];
        let page = paginate(&items, 0, 5);
        // Two holes inside the window render as nothing
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].product_id, Some(ProductId::new(1)));
        assert_eq!(page.rows[1].product_id, Some(ProductId::new(4)));
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_never_more_than_page_size_rows() {
        let items = lines(23);
        for page_index in 0..6 {
            let page = paginate(&items, page_index, 5);
            assert!(page.rows.len() <= 5);
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(7, 5), 2);
        assert_eq!(page_count(11, 5), 3);
        assert_eq!(page_count(10, 0), 1);
    }

    #[test]
    fn test_sort_latest_first() {
        let mut carts = vec![
            cart(1, Some("2020-03-01T00:00:00Z")),
            cart(2, Some("2020-03-02T00:00:00Z")),
            cart(3, Some("2020-01-05T00:00:00Z")),
        ];
        sort_latest_first(&mut carts);
        let ids: Vec<i32> = carts.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_places_undated_carts_last() {
        let mut carts = vec![
            cart(1, None),
            cart(2, Some("2020-03-02T00:00:00Z")),
            cart(3, None),
        ];
        sort_latest_first(&mut carts);
        let ids: Vec<i32> = carts.iter().map(|c| c.id.as_i32()).collect();
        // Stable: undated carts keep their relative order at the tail
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut carts = vec![
            cart(10, Some("2020-03-01T00:00:00Z")),
            cart(11, Some("2020-03-01T00:00:00Z")),
            cart(12, Some("2020-03-01T00:00:00Z")),
        ];
        sort_latest_first(&mut carts);
        let ids: Vec<i32> = carts.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }
}
