//! Write-off advisory
//!
//! Flags contracts old enough to be written off in full. The flag is
//! metadata for reporting and never changes the provision.

use serde::{Deserialize, Serialize};

use core_kernel::whole_months;

use crate::calibration::{WRITE_OFF_MONTHS_C1_C2, WRITE_OFF_MONTHS_C3_C4, WRITE_OFF_MONTHS_C5};
use crate::classification::ClassificationRisk;

/// Write-off eligibility with the figures it was decided on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOffAdvice {
    pub eligible: bool,
    pub months_overdue: u32,
    pub threshold_months: u32,
}

/// Months overdue from which a classification may be written off
pub fn write_off_threshold_months(classification: ClassificationRisk) -> u32 {
    match classification {
        ClassificationRisk::C5 => WRITE_OFF_MONTHS_C5,
        ClassificationRisk::C3 | ClassificationRisk::C4 => WRITE_OFF_MONTHS_C3_C4,
        ClassificationRisk::C1 | ClassificationRisk::C2 => WRITE_OFF_MONTHS_C1_C2,
    }
}

/// Full write-off advice for a delinquency age and classification
pub fn write_off_advice(days_overdue: u32, classification: ClassificationRisk) -> WriteOffAdvice {
    let months_overdue = whole_months(days_overdue);
    let threshold_months = write_off_threshold_months(classification);

    WriteOffAdvice {
        eligible: months_overdue >= threshold_months,
        months_overdue,
        threshold_months,
    }
}

/// True when the contract is eligible for full write-off
pub fn write_off_eligible(days_overdue: u32, classification: ClassificationRisk) -> bool {
    write_off_advice(days_overdue, classification).eligible
}
