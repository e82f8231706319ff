//! `profiles` table: plan reads and the post-payment plan flip.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use utility_hub_core::{Plan, UserId};

use super::{SupabaseClient, SupabaseError};

#[derive(Debug, Deserialize)]
struct PlanRow {
    plan: Option<String>,
}

impl SupabaseClient {
    /// Read the user's plan from their profile row.
    ///
    /// A missing row or null column resolves to [`Plan::Free`]. Callers wrap
    /// this in a bounded wait and also default to free on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token), fields(user_id = %user_id))]
    pub async fn fetch_plan(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Plan, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select=plan",
            self.rest_url("profiles"),
            user_id
        );
        let response = self
            .request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<PlanRow> = Self::parse_json(&body)?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.plan)
            .map(|plan| Plan::from_db(&plan))
            .unwrap_or_default())
    }

    /// Flip the user's plan to pro after a successful payment.
    ///
    /// The filter skips rows that are already pro, so a repeated success
    /// callback is a no-op rather than a rewrite.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token), fields(user_id = %user_id))]
    pub async fn upgrade_plan_to_pro(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<(), SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&plan=neq.{}",
            self.rest_url("profiles"),
            user_id,
            Plan::Pro.as_str()
        );
        let response = self
            .request(reqwest::Method::PATCH, url, access_token)
            .json(&json!({ "plan": Plan::Pro.as_str() }))
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}
