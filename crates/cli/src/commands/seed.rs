//! Seed the hosted platform's `products` table.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::info;

use utility_hub_web::config::SupabaseConfig;
use utility_hub_web::supabase::{NewProduct, SupabaseClient};

/// The catalog the application ships with.
fn default_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Utility Hub Free".to_owned(),
            plan_type: "free".to_owned(),
            price: Decimal::ZERO,
            duration_months: 1,
            description: Some("Basic task management with one month of scheduling.".to_owned()),
            features: vec![
                "1-month calendar".to_owned(),
                "Basic task management".to_owned(),
            ],
            is_active: true,
        },
        NewProduct {
            name: "Utility Hub Pro (monthly)".to_owned(),
            plan_type: "pro".to_owned(),
            price: Decimal::from(9900),
            duration_months: 1,
            description: Some("Everything in Free plus three months of scheduling.".to_owned()),
            features: vec![
                "3-month calendar".to_owned(),
                "Extended scheduling".to_owned(),
                "Priority support".to_owned(),
            ],
            is_active: true,
        },
    ]
}

/// Insert the default catalog.
///
/// # Errors
///
/// Returns an error if `SUPABASE_SERVICE_KEY` is not configured or the
/// platform rejects the insert.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let config = SupabaseConfig::from_env()?;
    let service_key = config
        .service_key
        .as_ref()
        .ok_or("SUPABASE_SERVICE_KEY not set (seeding needs the service role)")?
        .expose_secret()
        .to_owned();

    let client = SupabaseClient::new(&config);
    let catalog = default_products();

    info!(count = catalog.len(), "inserting default products");
    client.insert_products(&service_key, &catalog).await?;
    info!("product catalog seeded");

    Ok(())
}
