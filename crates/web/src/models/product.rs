//! Subscription product model.

use serde::{Deserialize, Serialize};

use utility_hub_core::{Plan, Price, ProductId};

/// A purchasable (or free) subscription product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// The plan tier this product unlocks.
    pub plan_type: Plan,
    pub price: Price,
    /// Subscription length in months.
    pub duration_months: i32,
    pub description: Option<String>,
    /// Marketing bullet points.
    pub features: Vec<String>,
}

impl Product {
    /// Display string for the price column.
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price.display()
    }
}
