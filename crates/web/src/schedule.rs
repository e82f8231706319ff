//! Plan-gated date scheduling.
//!
//! A task's due date must fall within the forward-looking window the user's
//! plan pays for: one month for the free tier, three for pro. A date beyond
//! the window is rejected outright (the caller shows an upgrade prompt);
//! nothing is ever silently clamped into range.

use chrono::{Months, NaiveDate};
use thiserror::Error;

use utility_hub_core::Plan;

/// Why a batch of task dates was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The task text was empty or whitespace.
    #[error("enter a task first")]
    EmptyTask,
    /// No dates were selected.
    #[error("select at least one date")]
    NoDates,
    /// At least one date falls outside the plan's window.
    #[error("{date} is outside the {plan} plan's scheduling window")]
    OutOfWindow {
        /// The first offending date.
        date: NaiveDate,
        /// The plan whose window was exceeded.
        plan: Plan,
    },
}

impl ScheduleError {
    /// Whether this rejection should surface the upgrade prompt.
    #[must_use]
    pub const fn is_upgrade_prompt(&self) -> bool {
        matches!(self, Self::OutOfWindow { .. })
    }
}

/// The last schedulable day under `plan`, counted from `today`.
///
/// Month arithmetic clamps to the end of shorter months, so January 31 on
/// the free plan yields February 28 (or 29).
#[must_use]
pub fn max_due_date(plan: Plan, today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(plan.window_months()))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether `date` may carry a task under `plan`.
#[must_use]
pub fn is_date_allowed(date: NaiveDate, plan: Plan, today: NaiveDate) -> bool {
    date <= max_due_date(plan, today)
}

/// Validate a batch add of `text` across `dates`.
///
/// The batch is all-or-nothing: a single out-of-window date rejects every
/// date, so the caller never commits a partial batch.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyTask`] or [`ScheduleError::NoDates`] for the
/// respective missing inputs, and [`ScheduleError::OutOfWindow`] carrying the
/// first offending date otherwise.
pub fn validate_batch(
    text: &str,
    dates: &[NaiveDate],
    plan: Plan,
    today: NaiveDate,
) -> Result<(), ScheduleError> {
    if text.trim().is_empty() {
        return Err(ScheduleError::EmptyTask);
    }
    if dates.is_empty() {
        return Err(ScheduleError::NoDates);
    }
    if let Some(&date) = dates.iter().find(|&&d| !is_date_allowed(d, plan, today)) {
        return Err(ScheduleError::OutOfWindow { date, plan });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_max_due_date_free_is_one_month_out() {
        assert_eq!(
            max_due_date(Plan::Free, date(2026, 8, 7)),
            date(2026, 9, 7)
        );
    }

    #[test]
    fn test_max_due_date_pro_is_three_months_out() {
        assert_eq!(
            max_due_date(Plan::Pro, date(2026, 8, 7)),
            date(2026, 11, 7)
        );
    }

    #[test]
    fn test_max_due_date_clamps_short_months() {
        // Jan 31 + 1 month lands on the last day of February.
        assert_eq!(
            max_due_date(Plan::Free, date(2026, 1, 31)),
            date(2026, 2, 28)
        );
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let today = date(2026, 8, 7);
        assert!(is_date_allowed(date(2026, 9, 7), Plan::Free, today));
        assert!(!is_date_allowed(date(2026, 9, 8), Plan::Free, today));
    }

    #[test]
    fn test_pro_window_is_superset_of_free() {
        let today = date(2026, 8, 7);
        let mut d = today;
        // Every day free allows, pro must also allow.
        while d <= max_due_date(Plan::Pro, today) {
            if is_date_allowed(d, Plan::Free, today) {
                assert!(is_date_allowed(d, Plan::Pro, today), "pro rejected {d}");
            }
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_validate_batch_empty_text() {
        let today = date(2026, 8, 7);
        assert_eq!(
            validate_batch("   ", &[today], Plan::Free, today),
            Err(ScheduleError::EmptyTask)
        );
    }

    #[test]
    fn test_validate_batch_no_dates() {
        let today = date(2026, 8, 7);
        assert_eq!(
            validate_batch("water the plants", &[], Plan::Free, today),
            Err(ScheduleError::NoDates)
        );
    }

    #[test]
    fn test_validate_batch_all_or_nothing() {
        let today = date(2026, 8, 7);
        let dates = [today, date(2026, 8, 20), date(2026, 12, 1)];
        let err = validate_batch("quarterly report", &dates, Plan::Free, today).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfWindow {
                date: date(2026, 12, 1),
                plan: Plan::Free,
            }
        );
        assert!(err.is_upgrade_prompt());
    }

    #[test]
    fn test_validate_batch_ok() {
        let today = date(2026, 8, 7);
        let dates = [today, date(2026, 8, 20)];
        assert!(validate_batch("water the plants", &dates, Plan::Free, today).is_ok());
    }

    #[test]
    fn test_empty_inputs_are_not_upgrade_prompts() {
        assert!(!ScheduleError::EmptyTask.is_upgrade_prompt());
        assert!(!ScheduleError::NoDates.is_upgrade_prompt());
    }
}
