//! Regulatory mark override
//!
//! Once a contract has been overdue long enough for its classification, the
//! regulation mandates a 100% provision whatever the tables or the
//! expected-loss model would produce. This check runs before anything else.

use serde::{Deserialize, Serialize};

use core_kernel::whole_months;

use crate::calibration::{MARK_MONTHS_HIGH_RISK, MARK_MONTHS_LOW_RISK};
use crate::classification::ClassificationRisk;

/// Outcome of the regulatory mark check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOverride {
    /// Whether the mark forces a full provision
    pub applies: bool,
    /// Provenance text for the applied rule label
    pub detail: String,
    /// Whole months overdue at evaluation
    pub months_overdue: u32,
    /// Months at which the mark applies for the classification
    pub threshold_months: u32,
}

/// Months overdue from which the mark applies to a classification
pub fn mark_threshold_months(classification: ClassificationRisk) -> u32 {
    if classification.is_low_risk() {
        MARK_MONTHS_LOW_RISK
    } else {
        MARK_MONTHS_HIGH_RISK
    }
}

/// Evaluates the regulatory mark for a delinquency age and classification
///
/// # Example
///
/// ```rust
/// use domain_provisioning::{regulatory_mark, ClassificationRisk};
///
/// assert!(regulatory_mark(650, ClassificationRisk::C1).applies);
/// assert!(!regulatory_mark(449, ClassificationRisk::C5).applies);
/// ```
pub fn regulatory_mark(days_overdue: u32, classification: ClassificationRisk) -> MarkOverride {
    let months_overdue = whole_months(days_overdue);
    let threshold_months = mark_threshold_months(classification);
    let applies = months_overdue >= threshold_months;

    let detail = if applies {
        format!(
            "Regulatory mark: {} at {} months (>= {})",
            classification, months_overdue, threshold_months
        )
    } else {
        format!(
            "Regulatory mark not reached: {} at {} months (< {})",
            classification, months_overdue, threshold_months
        )
    };

    MarkOverride {
        applies,
        detail,
        months_overdue,
        threshold_months,
    }
}
