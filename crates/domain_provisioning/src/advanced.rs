//! Expected-loss model provision
//!
//! Estimates expected loss as PD x LGD from the calibration matrices and
//! takes the more conservative of that estimate and the tabular provision.
//! The model can only raise a provision, never lower it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::{CoreError, Money, MoneyError, Rate};

use crate::basic::{build_result, calculate_basic, PERCENT_PRECISION};
use crate::calibration::{
    base_pd, base_recovery, COLLATERAL_RECOVERY_UPLIFT, RECOVERY_RATE_CEILING,
    RECOVERY_RATE_FLOOR,
};
use crate::classification::RiskStage;
use crate::config::ProvisioningConfig;
use crate::error::ProvisioningError;
use crate::observation::observation_status;
use crate::regulatory_mark::regulatory_mark;
use crate::snapshot::{ContractSnapshot, Methodology, ProvisionResult};
use crate::stage::classify_stage;
use crate::tables::{ExpectedLossRule, IncurredLossRule};

/// Intermediate figures of the PD x LGD estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossEstimate {
    pub pd: Rate,
    pub recovery: Rate,
    pub lgd: Rate,
    pub expected_loss: Rate,
}

/// Recovery rate for a classification, raised by real collateral coverage
///
/// Collateral adds up to 30 percentage points in proportion to how much of
/// the outstanding amount it covers; the result is clamped to `[10, 95]`.
pub fn recovery_rate(snapshot: &ContractSnapshot) -> Result<Rate, ProvisioningError> {
    let base = base_recovery(snapshot.classification);
    let uplift = collateral_uplift(snapshot)?;

    Ok(Rate::from_percentage(base + uplift).clamp(
        Rate::from_percentage(RECOVERY_RATE_FLOOR),
        Rate::from_percentage(RECOVERY_RATE_CEILING),
    ))
}

fn collateral_uplift(snapshot: &ContractSnapshot) -> Result<Decimal, ProvisioningError> {
    let collateral = match (&snapshot.has_real_collateral, &snapshot.collateral_value) {
        (true, Some(value)) if value.is_positive() => value,
        _ => return Ok(Decimal::ZERO),
    };

    let coverage = coverage_ratio(collateral, &snapshot.outstanding_amount)?;
    Ok((coverage * COLLATERAL_RECOVERY_UPLIFT).min(COLLATERAL_RECOVERY_UPLIFT))
}

/// Share of the outstanding amount covered by collateral, capped at 1
fn coverage_ratio(collateral: &Money, outstanding: &Money) -> Result<Decimal, ProvisioningError> {
    if outstanding.is_zero() {
        return Ok(Decimal::ONE);
    }
    match collateral.ratio_to(outstanding) {
        Ok(ratio) => Ok(ratio.min(Decimal::ONE)),
        // a ratio past the decimal range is well above full coverage
        Err(MoneyError::Overflow) => Ok(Decimal::ONE),
        Err(e) => Err(CoreError::from(e).into()),
    }
}

/// PD x LGD estimate for a contract in a given stage
pub fn estimate_loss(
    snapshot: &ContractSnapshot,
    stage: RiskStage,
    mark_applies: bool,
) -> Result<LossEstimate, ProvisioningError> {
    let pd = if mark_applies {
        Rate::FULL
    } else {
        Rate::from_percentage(base_pd(stage, snapshot.classification))
    };
    let recovery = recovery_rate(snapshot)?;
    let lgd = Rate::from_percentage(Decimal::ONE_HUNDRED - recovery.as_percentage());
    let expected_loss = Rate::from_fraction(pd.as_fraction() * lgd.as_fraction());

    Ok(LossEstimate {
        pd,
        recovery,
        lgd,
        expected_loss,
    })
}

/// Computes the model-refined provision for a contract
///
/// Takes the same inputs as [`calculate_basic`]. The regulatory mark still
/// short-circuits to a full provision in stage 3; otherwise the result is
/// `max(PD x LGD, tabular)`, so any floor applied to the tabular figure also
/// holds here.
pub fn calculate_advanced(
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

    let mark = regulatory_mark(snapshot.days_overdue, snapshot.classification);
    if mark.applies {
        debug!(
            contract = %snapshot.contract_id,
            months = mark.months_overdue,
            "Regulatory mark forces full provision"
        );
        return build_result(
            snapshot,
            Decimal::ONE_HUNDRED,
            RiskStage::Stage3,
            Methodology::RegulatoryOverride,
            mark.detail,
            &observation,
        );
    }

    let stage = classify_stage(snapshot.days_overdue, snapshot.is_restructured, observation.active);
    let estimate = estimate_loss(snapshot, stage, mark.applies)?;
    let expected_loss_percent = estimate.expected_loss.as_percentage().round_dp(PERCENT_PRECISION);

    let baseline = calculate_basic(snapshot, expected_loss, incurred_loss, now, config)?;
    let percent = expected_loss_percent.max(baseline.percent);

    let label = observation.annotate(format!(
        "{}: pd={}% lgd={}% el={}% baseline={}%",
        Methodology::AdvancedExpectedLoss.label(),
        estimate.pd.as_percentage().normalize(),
        estimate.lgd.as_percentage().normalize(),
        expected_loss_percent.normalize(),
        baseline.percent.normalize()
    ));

    debug!(
        contract = %snapshot.contract_id,
        classification = %snapshot.classification,
        pd = %estimate.pd,
        lgd = %estimate.lgd,
        expected_loss = %expected_loss_percent,
        baseline = %baseline.percent,
        "Computed advanced provision"
    );

    build_result(
        snapshot,
        percent,
        stage,
        Methodology::AdvancedExpectedLoss,
        label,
        &observation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::DEFAULT_TABLES;
    use crate::classification::ClassificationRisk;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn advanced(snapshot: &ContractSnapshot) -> ProvisionResult {
        calculate_advanced(
            snapshot,
            &DEFAULT_TABLES.expected_loss,
            &DEFAULT_TABLES.incurred_loss,
            now(),
            &ProvisioningConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_recovery_without_collateral() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(1000)), 0, ClassificationRisk::C3);
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(45));
    }

    #[test]
    fn test_recovery_with_partial_collateral() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(1000)), 0, ClassificationRisk::C5)
            .with_collateral(Money::brl(dec!(500)));
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(40));
    }

    #[test]
    fn test_recovery_uplift_capped_and_clamped() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(1000)), 0, ClassificationRisk::C1)
            .with_collateral(Money::brl(dec!(5000)));
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(95));
    }

    #[test]
    fn test_zero_outstanding_counts_as_full_coverage() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(0)), 0, ClassificationRisk::C4)
            .with_collateral(Money::brl(dec!(10)));
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(65));
    }

    #[test]
    fn test_collateral_in_other_currency_is_an_error() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(1000)), 0, ClassificationRisk::C2)
            .with_collateral(Money::new(dec!(500), Currency::USD));
        let err = recovery_rate(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::Core(CoreError::Money(MoneyError::CurrencyMismatch(_, _)))
        ));
    }

    #[test]
    fn test_coverage_beyond_decimal_range_counts_as_full() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(0.0001)), 0, ClassificationRisk::C3)
            .with_collateral(Money::brl(Decimal::MAX));
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(75));
    }

    #[test]
    fn test_collateral_flag_without_value_is_ignored() {
        let mut snapshot = ContractSnapshot::new(Money::brl(dec!(1000)), 0, ClassificationRisk::C2);
        snapshot.has_real_collateral = true;
        assert_eq!(recovery_rate(&snapshot).unwrap().as_percentage(), dec!(55));
    }

    #[test]
    fn test_model_dominates_in_stage_two() {
        // C5, 45 days: pd 55, lgd 75 -> el 41.25, tabular 22
        let snapshot = ContractSnapshot::new(Money::brl(dec!(10000)), 45, ClassificationRisk::C5);
        let result = advanced(&snapshot);

        assert_eq!(result.percent, dec!(41.25));
        assert_eq!(result.amount.amount(), dec!(4125));
        assert_eq!(result.stage, RiskStage::Stage2);
        assert_eq!(
            result.applied_rule_label,
            "Advanced PD x LGD: pd=55% lgd=75% el=41.25% baseline=22%"
        );
    }

    #[test]
    fn test_tabular_dominates_when_higher() {
        // C3, 95 days: pd 100, lgd 55 -> el 55, tabular 56.1
        let snapshot = ContractSnapshot::new(Money::brl(dec!(100000)), 95, ClassificationRisk::C3);
        let result = advanced(&snapshot);

        assert_eq!(result.percent, dec!(56.1));
        assert_eq!(result.methodology, Methodology::AdvancedExpectedLoss);
    }

    #[test]
    fn test_mark_fixes_stage_three() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(750)), 460, ClassificationRisk::C4);
        let result = advanced(&snapshot);

        assert_eq!(result.percent, dec!(100));
        assert_eq!(result.stage, RiskStage::Stage3);
        assert_eq!(result.methodology, Methodology::RegulatoryOverride);
    }

    #[test]
    fn test_estimate_forces_full_pd_under_mark() {
        let snapshot = ContractSnapshot::new(Money::brl(dec!(750)), 10, ClassificationRisk::C1);
        let estimate = estimate_loss(&snapshot, RiskStage::Stage1, true).unwrap();
        assert_eq!(estimate.pd, Rate::FULL);
        assert_eq!(estimate.lgd.as_percentage(), dec!(35));
    }
}
