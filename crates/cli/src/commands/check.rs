//! Verify the hosted platform is reachable.

use tracing::info;

use utility_hub_web::config::SupabaseConfig;
use utility_hub_web::supabase::SupabaseClient;

/// Read the active catalog as a connectivity probe.
///
/// # Errors
///
/// Returns an error if the platform cannot be reached.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SupabaseConfig::from_env()?;
    let client = SupabaseClient::new(&config);

    let token = client.anon_token().to_owned();
    let products = client.list_active_products(&token).await?;

    info!(products = products.len(), "platform reachable");
    Ok(())
}
