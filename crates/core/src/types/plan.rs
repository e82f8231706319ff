//! Subscription plan tier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Subscription plan gating feature limits.
///
/// The plan is derived from the `profiles.plan` column of the hosted data
/// platform. Anything that is not recognizably `pro` is treated as the free
/// tier, which keeps an absent or corrupted profile on the conservative side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Free tier: one month of forward scheduling.
    #[default]
    Free,
    /// Paid tier: three months of forward scheduling.
    Pro,
}

impl Plan {
    /// Parse a plan from its stored string form.
    ///
    /// Unknown values fall back to [`Plan::Free`].
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        if value.eq_ignore_ascii_case("pro") {
            Self::Pro
        } else {
            Self::Free
        }
    }

    /// The stored string form of the plan.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }

    /// How many months ahead this plan allows tasks to be scheduled.
    #[must_use]
    pub const fn window_months(self) -> u32 {
        match self {
            Self::Free => 1,
            Self::Pro => 3,
        }
    }

    /// Whether this is the paid tier.
    #[must_use]
    pub const fn is_pro(self) -> bool {
        matches!(self, Self::Pro)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_db() {
        assert_eq!(Plan::from_db("pro"), Plan::Pro);
        assert_eq!(Plan::from_db("PRO"), Plan::Pro);
        assert_eq!(Plan::from_db("free"), Plan::Free);
        assert_eq!(Plan::from_db("enterprise"), Plan::Free);
        assert_eq!(Plan::from_db(""), Plan::Free);
    }

    #[test]
    fn test_default_is_free() {
        assert_eq!(Plan::default(), Plan::Free);
    }

    #[test]
    fn test_window_months() {
        assert_eq!(Plan::Free.window_months(), 1);
        assert_eq!(Plan::Pro.window_months(), 3);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Plan::Pro).unwrap(), "\"pro\"");
        let plan: Plan = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(plan, Plan::Free);
    }
}
