//! Cart route handlers.
//!
//! The cart list is the authenticated home page: a date filter, one table
//! per cart (newest first, lines paginated server-side), and the "new cart"
//! form seeded from the current catalog.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use papaya_market_core::{CartId, ProductId, Quantity, UserId};

use crate::filters;
use crate::middleware::{AuthSession, RequireAuth};
use crate::models::CurrentUser;
use crate::models::flash::{self, Flash, Severity};
use crate::services::daterange::DateRange;
use crate::services::draft::CartDraft;
use crate::services::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::state::AppState;
use crate::store::StoreError;
use crate::store::types::Product;

use super::products::ProductView;

// =============================================================================
// View Types
// =============================================================================

/// One rendered cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub title: String,
    pub quantity: u32,
}

/// A pager link under a cart table.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub label: String,
    pub href: String,
    pub current: bool,
}

/// One cart's table: the visible page of lines plus tail padding.
#[derive(Debug)]
pub struct CartTableView {
    pub id: i32,
    pub date: String,
    pub lines: Vec<CartLineView>,
    pub empty_rows: usize,
    pub pages: Vec<PageLink>,
}

impl CartTableView {
    /// Iterator driving the blank padding rows in the template.
    #[must_use]
    pub const fn padding(&self) -> std::ops::Range<usize> {
        0..self.empty_rows
    }
}

/// One product tile in the new-cart form.
#[derive(Debug)]
pub struct DraftLineView {
    pub product: ProductView,
    pub quantity: u32,
}

/// The new-cart form: every catalog product with its drafted quantity.
#[derive(Debug)]
pub struct NewCartFormView {
    pub lines: Vec<DraftLineView>,
}

/// Cart list page template.
#[derive(Template, WebTemplate)]
#[template(path = "carts/index.html")]
pub struct CartsIndexTemplate {
    pub flash: Option<Flash>,
    /// Filter inputs, `yyyy-MM-dd` or empty.
    pub start: String,
    pub end: String,
    pub new_cart_href: String,
    pub carts: Vec<CartTableView>,
    pub new_cart: Option<NewCartFormView>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Cart list query parameters.
///
/// Everything is carried as raw text and parsed leniently: a malformed
/// value counts as absent, the same way the date filter treats its
/// parameters, so a mangled link never turns into a 400.
#[derive(Debug, Default, Deserialize)]
pub struct CartListQuery {
    pub startdate: Option<String>,
    pub enddate: Option<String>,
    /// Cart whose line table is being paged; all others stay on page 0.
    pub cart: Option<String>,
    pub page: Option<String>,
    /// `new=1` opens the new-cart form.
    pub new: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart list page.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    auth: AuthSession,
    Query(query): Query<CartListQuery>,
) -> Response {
    let mut flash = flash::take(auth.session()).await;
    let range = DateRange::parse(query.startdate.as_deref(), query.enddate.as_deref());
    let selected = lenient::<i32>(query.cart.as_deref()).map(CartId::new);
    let page = lenient::<usize>(query.page.as_deref()).unwrap_or(0);

    let carts = match build_cart_tables(&state, user.user_id, &range, selected, page).await {
        Ok(carts) => carts,
        Err(e) => {
            tracing::warn!("Failed to fetch carts: {e}");
            flash = Some(Flash::new("Failed to load carts.", Severity::Error));
            Vec::new()
        }
    };

    let new_cart = if query.new.as_deref() == Some("1") {
        match state.store().products().await {
            Ok(catalog) => {
                let draft = CartDraft::new(user.user_id, Utc::now(), &catalog);
                Some(build_draft_form(catalog, &draft))
            }
            Err(e) => {
                tracing::warn!("Failed to fetch catalog: {e}");
                flash = Some(Flash::new("Failed to load products.", Severity::Error));
                None
            }
        }
    } else {
        None
    };

    CartsIndexTemplate {
        flash,
        start: range.start_param().unwrap_or_default(),
        end: range.end_param().unwrap_or_default(),
        new_cart_href: new_cart_href(&range),
        carts,
        new_cart,
    }
    .into_response()
}

/// Handle new-cart form submission.
///
/// Exactly one create request per submission. Success queues a toast and
/// redirects so the list re-renders from a fresh fetch; failure re-renders
/// the form with the submitted quantities intact for a retry.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    auth: AuthSession,
    Form(form): Form<BTreeMap<String, String>>,
) -> Response {
    // Seed from the same catalog the form was rendered against
    let catalog = match state.store().products().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Failed to fetch catalog: {e}");
            queue_flash(&auth, "Failed to add cart.", Severity::Error).await;
            return Redirect::to("/").into_response();
        }
    };

    let draft = draft_from_form(user.user_id, Utc::now(), &catalog, &form);

    match state.store().create_cart(&draft.payload()).await {
        Ok(created) if created.id.as_i32() != 0 => {
            tracing::info!(cart_id = %created.id, "cart created");
            queue_flash(&auth, "Cart added successfully", Severity::Success).await;
            Redirect::to("/").into_response()
        }
        Ok(_) => failed_create(&state, &user, &catalog, &draft).await,
        Err(e) => {
            tracing::warn!("Failed to create cart: {e}");
            failed_create(&state, &user, &catalog, &draft).await
        }
    }
}

/// Re-render the page with the form open and the draft preserved.
async fn failed_create(
    state: &AppState,
    user: &CurrentUser,
    catalog: &[Product],
    draft: &CartDraft,
) -> Response {
    let range = DateRange::default();
    let carts = build_cart_tables(state, user.user_id, &range, None, 0)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch carts: {e}");
            Vec::new()
        });

    CartsIndexTemplate {
        flash: Some(Flash::new("Failed to add cart.", Severity::Error)),
        start: String::new(),
        end: String::new(),
        new_cart_href: new_cart_href(&range),
        carts,
        new_cart: Some(build_draft_form(catalog.to_vec(), draft)),
    }
    .into_response()
}

// =============================================================================
// Assembly Helpers
// =============================================================================

/// Fetch, order, and paginate a user's carts into table views.
async fn build_cart_tables(
    state: &AppState,
    user_id: UserId,
    range: &DateRange,
    selected: Option<CartId>,
    page: usize,
) -> Result<Vec<CartTableView>, StoreError> {
    let mut carts = state.store().user_carts(user_id, range).await?;
    pagination::sort_latest_first(&mut carts);

    let mut views = Vec::with_capacity(carts.len());
    for cart in &carts {
        let page_index = if selected == Some(cart.id) { page } else { 0 };
        let cart_page = pagination::paginate(&cart.products, page_index, DEFAULT_PAGE_SIZE);

        let mut lines = Vec::with_capacity(cart_page.rows.len());
        for line in &cart_page.rows {
            // Holes were filtered by the paginator; the id is present.
            let Some(product_id) = line.product_id else {
                continue;
            };
            let title = match state.store().product(product_id).await {
                Ok(product) => product.title,
                Err(e) => {
                    tracing::warn!("Failed to fetch product {product_id}: {e}");
                    format!("Product #{product_id}")
                }
            };
            lines.push(CartLineView {
                product_id: product_id.as_i32(),
                title,
                quantity: line.quantity,
            });
        }

        views.push(CartTableView {
            id: cart.id.as_i32(),
            date: format_cart_date(cart.date),
            lines,
            empty_rows: cart_page.empty_rows,
            pages: page_links(cart.id, cart_page.total, page_index, range),
        });
    }

    Ok(views)
}

/// Seed a draft from the catalog and fill it from `qty_<id>` form fields.
///
/// Unknown field names and unparsable ids are skipped; quantity values
/// coerce leniently, so one bad input never fails the submission.
fn draft_from_form(
    user_id: UserId,
    date: DateTime<Utc>,
    catalog: &[Product],
    form: &BTreeMap<String, String>,
) -> CartDraft {
    let mut draft = CartDraft::new(user_id, date, catalog);
    for (name, value) in form {
        if let Some(raw_id) = name.strip_prefix("qty_") {
            if let Ok(id) = raw_id.parse::<i32>() {
                draft.set_quantity(ProductId::new(id), Quantity::coerce(value));
            }
        }
    }
    draft
}

fn build_draft_form(catalog: Vec<Product>, draft: &CartDraft) -> NewCartFormView {
    NewCartFormView {
        lines: catalog
            .into_iter()
            .map(|product| {
                let quantity = draft.quantity(product.id).get();
                DraftLineView {
                    product: ProductView::from(product),
                    quantity,
                }
            })
            .collect(),
    }
}

fn page_links(cart_id: CartId, total: usize, current: usize, range: &DateRange) -> Vec<PageLink> {
    let count = pagination::page_count(total, DEFAULT_PAGE_SIZE);
    if count <= 1 {
        return Vec::new();
    }

    (0..count)
        .map(|index| {
            let mut href = format!("/?cart={cart_id}&page={index}");
            if let Some(start) = range.start_param() {
                href.push_str("&startdate=");
                href.push_str(&start);
            }
            if let Some(end) = range.end_param() {
                href.push_str("&enddate=");
                href.push_str(&end);
            }
            PageLink {
                label: (index + 1).to_string(),
                href,
                current: index == current,
            }
        })
        .collect()
}

fn new_cart_href(range: &DateRange) -> String {
    let mut href = "/?new=1".to_string();
    if let Some(start) = range.start_param() {
        href.push_str("&startdate=");
        href.push_str(&start);
    }
    if let Some(end) = range.end_param() {
        href.push_str("&enddate=");
        href.push_str(&end);
    }
    href
}

/// Parse an optional query value, treating unparsable input as absent.
fn lenient<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value?.trim().parse().ok()
}

fn format_cart_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(
        || "No date".to_string(),
        |d| d.format("%d %B %Y").to_string(),
    )
}

async fn queue_flash(auth: &AuthSession, message: &str, severity: Severity) {
    if let Err(e) = flash::notify(auth.session(), message, severity).await {
        tracing::error!("Failed to queue notification: {e}");
    }
}
