//! `products` table: subscription catalog reads.
//!
//! The active catalog changes rarely, so it is cached for five minutes.
//! Name search bypasses the cache.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use utility_hub_core::{Plan, Price, ProductId};

use crate::models::Product;

use super::{SupabaseClient, SupabaseError};

const PRODUCT_COLUMNS: &str =
    "id,name,plan_type,price,duration_months,description,features,is_active";

const ACTIVE_CACHE_KEY: &str = "products:active";

/// Wire shape of a `products` row.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    id: ProductId,
    name: String,
    plan_type: String,
    price: Decimal,
    duration_months: i32,
    description: Option<String>,
    #[serde(default)]
    features: Vec<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            plan_type: Plan::from_db(&row.plan_type),
            price: Price::new(row.price),
            duration_months: row.duration_months,
            description: row.description,
            features: row.features,
        }
    }
}

/// Insert shape for a new `products` row, used by the seeding CLI.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewProduct {
    pub name: String,
    pub plan_type: String,
    pub price: Decimal,
    pub duration_months: i32,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl SupabaseClient {
    /// Insert catalog rows. Requires a service-role token; row-level
    /// security blocks catalog writes from user tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, service_token, products), fields(count = products.len()))]
    pub async fn insert_products(
        &self,
        service_token: &str,
        products: &[NewProduct],
    ) -> Result<(), SupabaseError> {
        let response = self
            .request(
                reqwest::Method::POST,
                self.rest_url("products"),
                service_token,
            )
            .json(products)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }

    /// Fetch the active catalog, free tier first. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails on a cache miss.
    #[instrument(skip(self, access_token))]
    pub async fn list_active_products(
        &self,
        access_token: &str,
    ) -> Result<Arc<Vec<Product>>, SupabaseError> {
        if let Some(cached) = self.inner.product_cache.get(ACTIVE_CACHE_KEY).await {
            return Ok(cached);
        }

        let url = format!(
            "{}?is_active=eq.true&select={PRODUCT_COLUMNS}&order=plan_type.asc",
            self.rest_url("products")
        );
        let response = self
            .request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<ProductRow> = Self::parse_json(&body)?;
        let products = Arc::new(rows.into_iter().map(Product::from).collect::<Vec<_>>());

        self.inner
            .product_cache
            .insert(ACTIVE_CACHE_KEY.to_owned(), Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Case-insensitive substring search over active product names.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token))]
    pub async fn search_products(
        &self,
        access_token: &str,
        term: &str,
    ) -> Result<Vec<Product>, SupabaseError> {
        let pattern = format!("*{}*", term.replace(['*', ','], " ").trim());
        let url = format!(
            "{}?is_active=eq.true&select={PRODUCT_COLUMNS}&name=ilike.{pattern}",
            self.rest_url("products")
        );
        let response = self
            .request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<ProductRow> = Self::parse_json(&body)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_converts() {
        let body = format!(
            r#"{{
                "id": "{}",
                "name": "Utility Hub Pro (monthly)",
                "plan_type": "pro",
                "price": 9900,
                "duration_months": 1,
                "description": "Three months of forward scheduling",
                "features": ["3-month calendar", "extended scheduling"],
                "is_active": true
            }}"#,
            uuid::Uuid::new_v4()
        );
        let row: ProductRow = serde_json::from_str(&body).unwrap();
        let product = Product::from(row);
        assert_eq!(product.plan_type, Plan::Pro);
        assert_eq!(product.price_display(), "9,900 KRW");
        assert_eq!(product.features.len(), 2);
    }

    #[test]
    fn test_product_row_defaults_missing_features() {
        let body = format!(
            r#"{{
                "id": "{}",
                "name": "Free",
                "plan_type": "free",
                "price": 0,
                "duration_months": 1,
                "description": null
            }}"#,
            uuid::Uuid::new_v4()
        );
        let row: ProductRow = serde_json::from_str(&body).unwrap();
        let product = Product::from(row);
        assert!(product.features.is_empty());
        assert!(product.price.is_free());
    }
}
