//! Post-restructuring observation window
//!
//! For a fixed window after a restructuring, the contract cannot be reported
//! below stage 2 and its provision cannot fall below the configured floor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::elapsed_days;
use core_kernel::DateRange;

/// Annotation appended to rule labels while the window is active
pub const OBSERVATION_LABEL_SUFFIX: &str = " (restructured, under observation)";

/// State of the observation window on the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationStatus {
    pub active: bool,
    pub days_remaining: u32,
    /// Window covering the restructuring date and the days that follow
    pub window: Option<DateRange>,
}

impl ObservationStatus {
    /// Status for a contract that was never restructured
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Appends the observation annotation to a label when active
    pub fn annotate(&self, label: String) -> String {
        if self.active {
            label + OBSERVATION_LABEL_SUFFIX
        } else {
            label
        }
    }
}

/// Evaluates the observation window
///
/// The window is inclusive: a contract restructured exactly `window_days`
/// ago is still under observation. A restructuring dated after `now` counts
/// as zero days elapsed. A restructured contract without a restructuring
/// date cannot be placed in a window and is reported inactive.
pub fn observation_status(
    is_restructured: bool,
    restructuring_date: Option<NaiveDate>,
    now: NaiveDate,
    window_days: u32,
) -> ObservationStatus {
    let date = match (is_restructured, restructuring_date) {
        (true, Some(date)) => date,
        (true, None) => {
            tracing::warn!("Restructured contract has no restructuring date; observation window not applied");
            return ObservationStatus::inactive();
        }
        (false, _) => return ObservationStatus::inactive(),
    };

    let elapsed = elapsed_days(date, now);
    let active = elapsed <= window_days;

    ObservationStatus {
        active,
        days_remaining: window_days.saturating_sub(elapsed),
        window: Some(DateRange::starting_at(date, window_days)),
    }
}
