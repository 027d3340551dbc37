//! Lookup of the applicable regulatory table row
//!
//! Tables are assumed sorted and non-overlapping by their publisher
//! (see [`RegulatoryTables::validate`](crate::tables::RegulatoryTables::validate));
//! when a configuration does overlap, the first matching row in table order
//! wins.

use rust_decimal::Decimal;

use crate::calibration::EXPECTED_LOSS_MAX_DAYS;
use crate::classification::ClassificationRisk;
use crate::error::ProvisioningError;
use crate::tables::{
    ExpectedLossRule, IncurredLossRule, LossCriterion, RangeRule, EXPECTED_LOSS_TABLE,
    INCURRED_LOSS_TABLE,
};

/// Finds the expected-loss row covering `days_overdue`
///
/// Only meaningful for `days_overdue <= 90`; returns `None` beyond that or
/// when the table has a gap at that day.
pub fn resolve_expected_loss(
    days_overdue: u32,
    table: &[ExpectedLossRule],
) -> Option<&ExpectedLossRule> {
    if days_overdue > EXPECTED_LOSS_MAX_DAYS {
        return None;
    }
    table.iter().find(|row| row.contains(days_overdue))
}

/// Finds the incurred-loss row of `criterion` covering `value`
///
/// `value` is expressed in the criterion's unit (whole months or days).
pub fn resolve_incurred_loss(
    value: u32,
    criterion: LossCriterion,
    table: &[IncurredLossRule],
) -> Option<&IncurredLossRule> {
    table
        .iter()
        .filter(|row| row.criterion == criterion)
        .find(|row| row.contains(value))
}

/// Percentage a row assigns to a classification, if published
pub fn percent_for<R: RangeRule>(row: &R, classification: ClassificationRisk) -> Option<Decimal> {
    row.percents().get(classification)
}

/// Expected-loss lookup that reports a missing rule or percentage as an error
pub(crate) fn expected_loss_percent(
    days_overdue: u32,
    table: &[ExpectedLossRule],
    classification: ClassificationRisk,
) -> Result<(Decimal, String), ProvisioningError> {
    let row = resolve_expected_loss(days_overdue, table).ok_or(ProvisioningError::NoRuleFound {
        table: EXPECTED_LOSS_TABLE,
        value: days_overdue,
        unit: "days",
    })?;
    require_percent(EXPECTED_LOSS_TABLE, row, classification)
}

/// Incurred-loss lookup that reports a missing rule or percentage as an error
pub(crate) fn incurred_loss_percent(
    days_overdue: u32,
    criterion: LossCriterion,
    table: &[IncurredLossRule],
    classification: ClassificationRisk,
) -> Result<(Decimal, String), ProvisioningError> {
    let value = criterion.measure(days_overdue);
    let row = resolve_incurred_loss(value, criterion, table).ok_or(ProvisioningError::NoRuleFound {
        table: INCURRED_LOSS_TABLE,
        value,
        unit: criterion.unit(),
    })?;
    require_percent(INCURRED_LOSS_TABLE, row, classification)
}

fn require_percent<R: RangeRule>(
    table: &'static str,
    row: &R,
    classification: ClassificationRisk,
) -> Result<(Decimal, String), ProvisioningError> {
    let row_label = row.describe();
    match percent_for(row, classification) {
        Some(percent) => Ok((percent, row_label)),
        None => Err(ProvisioningError::PercentUnset {
            table,
            row: row_label,
            classification,
        }),
    }
}
