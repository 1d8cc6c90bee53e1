//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use papaya_market_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::middleware::{AuthSession, RequireAuth};
use crate::models::flash::{self, Flash};
use crate::state::AppState;
use crate::store::types::Product;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub image: Option<String>,
    pub description: String,
    pub rating: Option<RatingView>,
}

/// Rating display data for templates.
#[derive(Debug, Clone)]
pub struct RatingView {
    pub rate: f64,
    pub count: i64,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title,
            price: product.price,
            image: product.image,
            description: product.description,
            rating: product.rating.map(|rating| RatingView {
                rate: rating.rate,
                count: rating.count,
            }),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub flash: Option<Flash>,
    pub product: ProductView,
}

/// Display the product detail page.
///
/// Resolved through the read-through product cache; an unknown id is a 404.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    auth: AuthSession,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let flash = flash::take(auth.session()).await;
    let product = state.store().product(ProductId::new(id)).await?;

    Ok(ProductShowTemplate {
        flash,
        product: ProductView::from(product),
    })
}
