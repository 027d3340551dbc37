//! Risk stage classification by delinquency age

use crate::calibration::EXPECTED_LOSS_MAX_DAYS;
use crate::classification::RiskStage;

/// Last day overdue that still counts as stage 1
pub const STAGE_1_MAX_DAYS: u32 = 30;

/// Classifies the stage of a contract
///
/// Up to 30 days overdue is stage 1, 31 to 90 is stage 2, beyond 90 is
/// stage 3. A restructured contract under observation is never reported
/// below stage 2; the pin only ever raises the stage.
pub fn classify_stage(days_overdue: u32, is_restructured: bool, observation_active: bool) -> RiskStage {
    let base = if days_overdue <= STAGE_1_MAX_DAYS {
        RiskStage::Stage1
    } else if days_overdue <= EXPECTED_LOSS_MAX_DAYS {
        RiskStage::Stage2
    } else {
        RiskStage::Stage3
    };

    if is_restructured && observation_active {
        base.max(RiskStage::Stage2)
    } else {
        base
    }
}
