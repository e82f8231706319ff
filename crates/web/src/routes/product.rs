//! Product catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// One product card, preformatted for the template.
pub struct ProductCard {
    pub name: String,
    pub plan_label: String,
    pub price_display: String,
    pub duration_months: i32,
    pub description: Option<String>,
    pub features: Vec<String>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<ProductCard>,
}

/// Display the active product catalog.
///
/// # Errors
///
/// Returns an error page when the catalog cannot be read.
pub async fn catalog(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<ProductsTemplate> {
    let token = user
        .as_ref()
        .map_or_else(|| state.supabase().anon_token().to_owned(), |u| u.access_token.clone());

    let products = state.supabase().list_active_products(&token).await?;

    Ok(ProductsTemplate {
        products: products
            .iter()
            .map(|product| ProductCard {
                name: product.name.clone(),
                plan_label: product.plan_type.as_str().to_owned(),
                price_display: product.price_display(),
                duration_months: product.duration_months,
                description: product.description.clone(),
                features: product.features.clone(),
            })
            .collect(),
    })
}
