//! Regulatory calibration data
//!
//! Percentages, thresholds and model matrices taken from the provisioning
//! regulation. Every figure here belongs to [`REGULATION_VERSION`]; an
//! amendment to the regulation is a change to this data and its version
//! tag, never to the calculators.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::classification::{ClassificationRisk, RiskStage};
use crate::tables::{
    ClassificationPercents, ExpectedLossRule, IncurredLossRule, LossCriterion, RegulatoryTables,
};

/// Identifier of the regulation mapping the compiled data comes from
pub const REGULATION_VERSION: &str = "BCB-352/2023-annex-I";

/// Last day covered by the expected-loss table
pub const EXPECTED_LOSS_MAX_DAYS: u32 = 90;

/// Regulatory mark for C3, C4 and C5: full provision from this many months
pub const MARK_MONTHS_HIGH_RISK: u32 = 15;

/// Regulatory mark for C1 and C2: full provision from this many months
pub const MARK_MONTHS_LOW_RISK: u32 = 21;

/// Length of the post-restructuring observation window
pub const OBSERVATION_WINDOW_DAYS: u32 = 180;

/// Provision floor while a restructured contract is under observation
///
/// No regulatory citation has been confirmed for this figure; it is
/// overridable through `ProvisioningConfig::observation_floor_percent`.
pub const OBSERVATION_FLOOR_PERCENT: Decimal = dec!(3.0);

/// Write-off eligibility for C5, in months overdue
pub const WRITE_OFF_MONTHS_C5: u32 = 18;

/// Write-off eligibility for C3 and C4, in months overdue
pub const WRITE_OFF_MONTHS_C3_C4: u32 = 24;

/// Write-off eligibility for C1 and C2, in months overdue
pub const WRITE_OFF_MONTHS_C1_C2: u32 = 36;

/// Floor and ceiling applied to recovery rates, in percent
pub const RECOVERY_RATE_FLOOR: Decimal = dec!(10);
pub const RECOVERY_RATE_CEILING: Decimal = dec!(95);

/// Maximum recovery uplift from real collateral, in percentage points
pub const COLLATERAL_RECOVERY_UPLIFT: Decimal = dec!(30);

/// Probability of default in percent, indexed by `[stage][classification]`
pub const BASE_PD_MATRIX: [[Decimal; 5]; 3] = [
    // Stage 1
    [dec!(1.0), dec!(2.5), dec!(5.0), dec!(8.0), dec!(12.0)],
    // Stage 2
    [dec!(10.0), dec!(18.0), dec!(28.0), dec!(40.0), dec!(55.0)],
    // Stage 3
    [dec!(100), dec!(100), dec!(100), dec!(100), dec!(100)],
];

/// Base recovery rate in percent, indexed by classification
pub const BASE_RECOVERY_BY_CLASSIFICATION: [Decimal; 5] =
    [dec!(65), dec!(55), dec!(45), dec!(35), dec!(25)];

/// Probability of default for a stage and classification
pub fn base_pd(stage: RiskStage, classification: ClassificationRisk) -> Decimal {
    BASE_PD_MATRIX[stage.index()][classification.index()]
}

/// Base recovery rate for a classification, before collateral
pub fn base_recovery(classification: ClassificationRisk) -> Decimal {
    BASE_RECOVERY_BY_CLASSIFICATION[classification.index()]
}

/// Expected-loss rows: `(start day, end day, [C1..C5])`
const EXPECTED_LOSS_ROWS: [(u32, u32, [Decimal; 5]); 4] = [
    (0, 14, [dec!(1.0), dec!(2.0), dec!(3.5), dec!(5.0), dec!(7.0)]),
    (15, 30, [dec!(1.5), dec!(3.0), dec!(5.0), dec!(7.5), dec!(10.0)]),
    (31, 60, [dec!(4.0), dec!(7.5), dec!(12.0), dec!(17.0), dec!(22.0)]),
    (61, 90, [dec!(8.0), dec!(14.0), dec!(22.0), dec!(30.0), dec!(38.0)]),
];

/// Incurred-loss rows by whole month overdue: `(month, [C1..C5])`
const INCURRED_LOSS_MONTHS: [(u32, [Decimal; 5]); 19] = [
    (3, [dec!(20.0), dec!(35.0), dec!(56.1), dec!(60.0), dec!(65.0)]),
    (4, [dec!(24.0), dec!(39.5), dec!(60.2), dec!(64.0), dec!(69.5)]),
    (5, [dec!(28.0), dec!(44.0), dec!(64.3), dec!(68.0), dec!(74.0)]),
    (6, [dec!(32.0), dec!(48.5), dec!(68.4), dec!(72.0), dec!(78.5)]),
    (7, [dec!(36.0), dec!(53.0), dec!(72.5), dec!(76.0), dec!(83.0)]),
    (8, [dec!(40.0), dec!(57.5), dec!(76.6), dec!(80.0), dec!(87.5)]),
    (9, [dec!(44.0), dec!(62.0), dec!(80.7), dec!(84.0), dec!(92.0)]),
    (10, [dec!(48.0), dec!(66.5), dec!(84.8), dec!(88.0), dec!(96.5)]),
    (11, [dec!(52.0), dec!(71.0), dec!(88.9), dec!(92.0), dec!(100)]),
    (12, [dec!(56.0), dec!(75.5), dec!(93.0), dec!(96.0), dec!(100)]),
    (13, [dec!(60.0), dec!(80.0), dec!(97.1), dec!(100), dec!(100)]),
    (14, [dec!(64.0), dec!(84.5), dec!(100), dec!(100), dec!(100)]),
    (15, [dec!(68.0), dec!(89.0), dec!(100), dec!(100), dec!(100)]),
    (16, [dec!(72.0), dec!(93.5), dec!(100), dec!(100), dec!(100)]),
    (17, [dec!(76.0), dec!(98.0), dec!(100), dec!(100), dec!(100)]),
    (18, [dec!(80.0), dec!(100), dec!(100), dec!(100), dec!(100)]),
    (19, [dec!(85.0), dec!(100), dec!(100), dec!(100), dec!(100)]),
    (20, [dec!(90.0), dec!(100), dec!(100), dec!(100), dec!(100)]),
    (21, [dec!(100), dec!(100), dec!(100), dec!(100), dec!(100)]),
];

/// Expected-loss table of the compiled regulation version
pub fn default_expected_loss_table() -> Vec<ExpectedLossRule> {
    EXPECTED_LOSS_ROWS
        .iter()
        .map(|(start, end, percents)| {
            ExpectedLossRule::new(*start, *end, ClassificationPercents::new(*percents))
        })
        .collect()
}

/// Incurred-loss table of the compiled regulation version, by whole month
pub fn default_incurred_loss_table() -> Vec<IncurredLossRule> {
    INCURRED_LOSS_MONTHS
        .iter()
        .map(|(month, percents)| {
            IncurredLossRule::new(
                LossCriterion::MonthsOverdue,
                *month,
                *month,
                ClassificationPercents::new(*percents),
            )
        })
        .collect()
}

/// Compiled table set, shared read-only
pub static DEFAULT_TABLES: Lazy<Arc<RegulatoryTables>> = Lazy::new(|| {
    Arc::new(RegulatoryTables::new(
        REGULATION_VERSION,
        default_expected_loss_table(),
        default_incurred_loss_table(),
    ))
});
