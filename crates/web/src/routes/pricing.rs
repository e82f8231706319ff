//! Plan comparison page.

use askama::Template;
use askama_web::WebTemplate;

use crate::middleware::RequireUser;

/// Pricing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pricing.html")]
pub struct PricingTemplate {
    pub is_pro: bool,
}

/// Display the free/pro comparison. Anonymous visitors are redirected to
/// `/auth` by the extractor.
pub async fn pricing(RequireUser(user): RequireUser) -> PricingTemplate {
    PricingTemplate {
        is_pro: user.plan.is_pro(),
    }
}
