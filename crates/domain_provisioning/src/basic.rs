//! Tabular provision calculation
//!
//! Rules apply in priority order:
//!
//! 1. **Regulatory mark** - full provision, nothing else is consulted
//! 2. **Methodology switch** - expected-loss table up to 90 days overdue,
//!    incurred-loss table beyond
//! 3. **Observation floor** - restructured contracts under observation are
//!    provisioned at least at the configured floor

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use core_kernel::CoreError;

use crate::calibration::EXPECTED_LOSS_MAX_DAYS;
use crate::classification::RiskStage;
use crate::config::ProvisioningConfig;
use crate::error::ProvisioningError;
use crate::lookup::{expected_loss_percent, incurred_loss_percent};
use crate::observation::{observation_status, ObservationStatus};
use crate::regulatory_mark::regulatory_mark;
use crate::snapshot::{ContractSnapshot, Methodology, ProvisionResult};
use crate::stage::classify_stage;
use crate::tables::{ExpectedLossRule, IncurredLossRule};

/// Decimal places kept on computed percentages
pub const PERCENT_PRECISION: u32 = 4;

/// Computes the tabular provision for a contract
///
/// # Arguments
///
/// * `snapshot` - Contract state at valuation
/// * `expected_loss` - Expected-loss table in force
/// * `incurred_loss` - Incurred-loss table in force
/// * `now` - Valuation date
/// * `config` - Observation floor, window and incurred-loss criterion
///
/// # Errors
///
/// Returns [`ProvisioningError::NoRuleFound`] or
/// [`ProvisioningError::PercentUnset`] when the tables do not cover the
/// contract; a missing rule is never read as a zero provision.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use core_kernel::Money;
/// use domain_provisioning::{
///     calculate_basic, ClassificationRisk, ContractSnapshot, ProvisioningConfig, DEFAULT_TABLES,
/// };
/// use rust_decimal_macros::dec;
///
/// let snapshot = ContractSnapshot::new(Money::brl(dec!(100000)), 95, ClassificationRisk::C3);
/// let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let result = calculate_basic(
///     &snapshot,
///     &DEFAULT_TABLES.expected_loss,
///     &DEFAULT_TABLES.incurred_loss,
///     now,
///     &ProvisioningConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.percent, dec!(56.1));
/// assert_eq!(result.amount.amount(), dec!(56100));
/// ```
pub fn calculate_basic(
    snapshot: &ContractSnapshot,
    expected_loss: &[ExpectedLossRule],
    incurred_loss: &[IncurredLossRule],
    now: NaiveDate,
    config: &ProvisioningConfig,
) -> Result<ProvisionResult, ProvisioningError> {
    let observation = observation_status(
        snapshot.is_restructured,
        snapshot.restructuring_date,
        now,
        config.observation_window_days,
    );
    let stage = classify_stage(snapshot.days_overdue, snapshot.is_restructured, observation.active);

    let mark = regulatory_mark(snapshot.days_overdue, snapshot.classification);
    if mark.applies {
        debug!(
            contract = %snapshot.contract_id,
            months = mark.months_overdue,
            classification = %snapshot.classification,
            "Regulatory mark forces full provision"
        );
        return build_result(
            snapshot,
            Decimal::ONE_HUNDRED,
            stage,
            Methodology::RegulatoryOverride,
            mark.detail,
            &observation,
        );
    }

    let lookup = if snapshot.days_overdue > EXPECTED_LOSS_MAX_DAYS {
        incurred_loss_percent(
            snapshot.days_overdue,
            config.incurred_criterion,
            incurred_loss,
            snapshot.classification,
        )
        .map(|(percent, row)| (Methodology::IncurredLoss, percent, row))
    } else {
        expected_loss_percent(snapshot.days_overdue, expected_loss, snapshot.classification)
            .map(|(percent, row)| (Methodology::ExpectedLoss, percent, row))
    };

    let (methodology, tabular_percent, row) = lookup.map_err(|e| {
        warn!(
            contract = %snapshot.contract_id,
            days_overdue = snapshot.days_overdue,
            classification = %snapshot.classification,
            error = %e,
            "No regulatory rule for contract"
        );
        e
    })?;

    let percent = apply_observation_floor(tabular_percent, &observation, config);
    if percent != tabular_percent {
        debug!(
            contract = %snapshot.contract_id,
            tabular = %tabular_percent,
            floor = %config.observation_floor_percent,
            "Observation floor raised provision"
        );
    }

    let label = observation.annotate(format!("{} {}", methodology.label(), row));

    debug!(
        contract = %snapshot.contract_id,
        methodology = %methodology,
        percent = %percent,
        stage = %stage,
        "Computed tabular provision"
    );

    build_result(snapshot, percent, stage, methodology, label, &observation)
}

/// Raises a percentage to the observation floor while the window is active
pub(crate) fn apply_observation_floor(
    percent: Decimal,
    observation: &ObservationStatus,
    config: &ProvisioningConfig,
) -> Decimal {
    if observation.active {
        percent.max(config.observation_floor_percent)
    } else {
        percent
    }
}

/// Assembles a result, keeping the percentage within `[0, 100]`
///
/// The amount is the exact `outstanding * percent / 100` of the rounded
/// percentage.
pub(crate) fn build_result(
    snapshot: &ContractSnapshot,
    percent: Decimal,
    stage: RiskStage,
    methodology: Methodology,
    applied_rule_label: String,
    observation: &ObservationStatus,
) -> Result<ProvisionResult, ProvisioningError> {
    let percent = percent
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp(PERCENT_PRECISION);

    let amount = snapshot
        .outstanding_amount
        .percent_of(percent)
        .map_err(CoreError::from)?;

    Ok(ProvisionResult {
        percent,
        amount,
        stage,
        methodology,
        applied_rule_label,
        observation_window_active: observation.active,
        days_remaining_in_observation: observation.days_remaining,
    })
}
