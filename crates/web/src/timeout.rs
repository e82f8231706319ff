//! Bounded waits around external calls.
//!
//! Reads against the hosted platform must never hold up the page: a profile
//! lookup gets 3 seconds, the post-payment plan flip gets 5. Instead of
//! scattering ad-hoc request-vs-timer races, every call site goes through
//! [`bounded`] and decides what to do with a [`Bounded::TimedOut`].

use std::future::Future;
use std::time::Duration;

/// Budget for profile plan lookups.
pub const PLAN_LOOKUP_BUDGET: Duration = Duration::from_secs(3);

/// Budget for the post-payment plan update.
pub const PLAN_UPDATE_BUDGET: Duration = Duration::from_secs(5);

/// Outcome of a bounded wait.
///
/// Timing out is a soft failure: callers substitute a conservative default
/// rather than surfacing an error to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounded<T> {
    /// The future completed within its budget.
    Completed(T),
    /// The budget elapsed first; the future was dropped.
    TimedOut,
}

impl<T> Bounded<T> {
    /// Whether the budget elapsed before the call finished.
    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// The completed value, or `None` on timeout.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::TimedOut => None,
        }
    }

    /// The completed value, or the supplied fallback on timeout.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Self::Completed(value) => value,
            Self::TimedOut => fallback,
        }
    }
}

impl<T: Default> Bounded<T> {
    /// The completed value, or `T::default()` on timeout.
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

/// Run `future` for at most `limit`.
///
/// The future is dropped on timeout; there is no cancellation signal to the
/// remote side, matching the fire-and-forget semantics of the original races.
pub async fn bounded<F>(limit: Duration, future: F) -> Bounded<F::Output>
where
    F: Future,
{
    match tokio::time::timeout(limit, future).await {
        Ok(value) => Bounded::Completed(value),
        Err(_) => Bounded::TimedOut,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_budget() {
        let result = bounded(Duration::from_millis(100), async { 42 }).await;
        assert_eq!(result, Bounded::Completed(42));
    }

    #[tokio::test]
    async fn test_times_out() {
        let result = bounded(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            42
        })
        .await;
        assert!(result.is_timed_out());
        assert_eq!(result.into_option(), None);
    }

    #[tokio::test]
    async fn test_unwrap_or_applies_fallback() {
        let timed_out: Bounded<u32> = bounded(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            7
        })
        .await;
        assert_eq!(timed_out.unwrap_or(99), 99);
    }

    #[tokio::test]
    async fn test_plan_lookup_over_budget_resolves_to_free() {
        use utility_hub_core::Plan;

        // The shape every plan read uses: a stalled platform call resolves
        // to the free tier with no error surfaced.
        let lookup = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<Plan, String>(Plan::Pro)
        };

        let plan = bounded(Duration::from_millis(5), lookup)
            .await
            .into_option()
            .map_or(Plan::Free, |result| result.unwrap_or(Plan::Free));

        assert_eq!(plan, Plan::Free);
    }

    #[tokio::test]
    async fn test_unwrap_or_default() {
        let timed_out: Bounded<Vec<u8>> = bounded(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            vec![1, 2, 3]
        })
        .await;
        assert!(timed_out.unwrap_or_default().is_empty());
    }
}
