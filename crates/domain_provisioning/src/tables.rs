//! Regulatory loss tables
//!
//! Two tables govern tabular provisioning:
//!
//! - the **expected-loss** table, keyed by days overdue, covering `[0, 90]`
//! - the **incurred-loss** table, keyed by days or whole months overdue
//!   (its [`LossCriterion`]), covering delinquency beyond 90 days up to the
//!   point where the regulatory mark forces a full provision
//!
//! Tables are published by the storage collaborator as JSON and validated
//! before use. Rows are inclusive on both ends and must tile their domain in
//! ascending order without gaps or overlaps.
//!
//! ```text
//! expected loss   [0-14] [15-30] [31-60] [61-90]
//! incurred loss                                 [3] [4] ... [20] [21]   (months)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::temporal::DAYS_PER_MONTH;
use core_kernel::whole_months;

use crate::calibration::{EXPECTED_LOSS_MAX_DAYS, MARK_MONTHS_LOW_RISK};
use crate::classification::ClassificationRisk;
use crate::error::ProvisioningError;

/// Table name used in diagnostics for the expected-loss table
pub const EXPECTED_LOSS_TABLE: &str = "expected loss";

/// Table name used in diagnostics for the incurred-loss table
pub const INCURRED_LOSS_TABLE: &str = "incurred loss";

/// Unit in which an incurred-loss row measures delinquency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCriterion {
    DaysOverdue,
    #[default]
    MonthsOverdue,
}

impl LossCriterion {
    /// Converts days overdue into this criterion's unit
    pub fn measure(&self, days_overdue: u32) -> u32 {
        match self {
            LossCriterion::DaysOverdue => days_overdue,
            LossCriterion::MonthsOverdue => whole_months(days_overdue),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            LossCriterion::DaysOverdue => "days",
            LossCriterion::MonthsOverdue => "months",
        }
    }
}

/// Provision percentages of one row, one slot per classification
///
/// A slot left empty by the publisher stays empty: lookups report it as
/// unset instead of reading it as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationPercents([Option<Decimal>; 5]);

impl ClassificationPercents {
    /// Creates a fully populated set of percentages (C1..C5)
    pub const fn new(percents: [Decimal; 5]) -> Self {
        Self([
            Some(percents[0]),
            Some(percents[1]),
            Some(percents[2]),
            Some(percents[3]),
            Some(percents[4]),
        ])
    }

    /// Creates a set of percentages where some tiers may be missing
    pub const fn partial(percents: [Option<Decimal>; 5]) -> Self {
        Self(percents)
    }

    /// Percentage for a classification, if published
    pub fn get(&self, classification: ClassificationRisk) -> Option<Decimal> {
        self.0[classification.index()]
    }

    fn iter(&self) -> impl Iterator<Item = (ClassificationRisk, Option<Decimal>)> + '_ {
        ClassificationRisk::ALL.into_iter().zip(self.0.iter().copied())
    }
}

/// Common view over table rows with an inclusive range
pub trait RangeRule {
    /// Inclusive `(start, end)` of the row
    fn bounds(&self) -> (u32, u32);

    fn percents(&self) -> &ClassificationPercents;

    /// Unit the bounds are expressed in
    fn unit(&self) -> &'static str;

    fn contains(&self, value: u32) -> bool {
        let (start, end) = self.bounds();
        value >= start && value <= end
    }

    /// Human-readable identity of the row, e.g. `[31-60 days]`
    fn describe(&self) -> String {
        let (start, end) = self.bounds();
        if start == end {
            format!("[{} {}]", start, self.unit())
        } else {
            format!("[{}-{} {}]", start, end, self.unit())
        }
    }
}

impl<T: RangeRule + ?Sized> RangeRule for &T {
    fn bounds(&self) -> (u32, u32) {
        (**self).bounds()
    }

    fn percents(&self) -> &ClassificationPercents {
        (**self).percents()
    }

    fn unit(&self) -> &'static str {
        (**self).unit()
    }
}

/// One row of the expected-loss table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedLossRule {
    pub days_range_start: u32,
    pub days_range_end: u32,
    pub percent_by_classification: ClassificationPercents,
}

impl ExpectedLossRule {
    pub fn new(days_range_start: u32, days_range_end: u32, percents: ClassificationPercents) -> Self {
        Self {
            days_range_start,
            days_range_end,
            percent_by_classification: percents,
        }
    }
}

impl RangeRule for ExpectedLossRule {
    fn bounds(&self) -> (u32, u32) {
        (self.days_range_start, self.days_range_end)
    }

    fn percents(&self) -> &ClassificationPercents {
        &self.percent_by_classification
    }

    fn unit(&self) -> &'static str {
        "days"
    }
}

/// One row of the incurred-loss table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncurredLossRule {
    pub criterion: LossCriterion,
    pub range_start: u32,
    pub range_end: u32,
    pub percent_by_classification: ClassificationPercents,
}

impl IncurredLossRule {
    pub fn new(
        criterion: LossCriterion,
        range_start: u32,
        range_end: u32,
        percents: ClassificationPercents,
    ) -> Self {
        Self {
            criterion,
            range_start,
            range_end,
            percent_by_classification: percents,
        }
    }
}

impl RangeRule for IncurredLossRule {
    fn bounds(&self) -> (u32, u32) {
        (self.range_start, self.range_end)
    }

    fn percents(&self) -> &ClassificationPercents {
        &self.percent_by_classification
    }

    fn unit(&self) -> &'static str {
        self.criterion.unit()
    }
}

/// A published, versioned pair of regulatory tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryTables {
    /// Regulation version identifier the figures were taken from
    pub version: String,
    pub expected_loss: Vec<ExpectedLossRule>,
    pub incurred_loss: Vec<IncurredLossRule>,
}

impl RegulatoryTables {
    pub fn new(
        version: impl Into<String>,
        expected_loss: Vec<ExpectedLossRule>,
        incurred_loss: Vec<IncurredLossRule>,
    ) -> Self {
        Self {
            version: version.into(),
            expected_loss,
            incurred_loss,
        }
    }

    /// Parses a table set from its JSON publication format
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let tables = RegulatoryTables::from_json_str(&published)?;
    /// tables.validate()?;
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ProvisioningError> {
        serde_json::from_str(json).map_err(|e| ProvisioningError::TableParse(e.to_string()))
    }

    /// Serializes the table set to its JSON publication format
    pub fn to_json_string(&self) -> Result<String, ProvisioningError> {
        serde_json::to_string_pretty(self).map_err(|e| ProvisioningError::TableParse(e.to_string()))
    }

    /// Incurred-loss rows for one criterion, in table order
    pub fn incurred_rows(&self, criterion: LossCriterion) -> impl Iterator<Item = &IncurredLossRule> {
        self.incurred_loss.iter().filter(move |r| r.criterion == criterion)
    }

    /// Checks row shape, percentage range and domain tiling
    ///
    /// The expected-loss table must tile `[0, 90]` days exactly. Each
    /// criterion present in the incurred-loss table must tile from the first
    /// value past 90 days through the last value before the C1/C2
    /// regulatory mark, so that no delinquency between the two tables and
    /// the mark is left uncovered.
    pub fn validate(&self) -> Result<(), ProvisioningError> {
        if self.version.trim().is_empty() {
            return Err(ProvisioningError::invalid_table("version must not be empty"));
        }

        validate_tiling(EXPECTED_LOSS_TABLE, &self.expected_loss, 0, EXPECTED_LOSS_MAX_DAYS)?;

        if self.incurred_loss.is_empty() {
            return Err(ProvisioningError::invalid_table("incurred loss table is empty"));
        }

        for criterion in [LossCriterion::DaysOverdue, LossCriterion::MonthsOverdue] {
            let rows: Vec<&IncurredLossRule> = self.incurred_rows(criterion).collect();
            if rows.is_empty() {
                continue;
            }
            let first = criterion.measure(EXPECTED_LOSS_MAX_DAYS + 1);
            let last = criterion.measure(MARK_MONTHS_LOW_RISK * DAYS_PER_MONTH - 1);
            validate_tiling(INCURRED_LOSS_TABLE, &rows, first, last)?;
        }

        Ok(())
    }
}

impl fmt::Display for RegulatoryTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} expected-loss rows, {} incurred-loss rows)",
            self.version,
            self.expected_loss.len(),
            self.incurred_loss.len()
        )
    }
}

/// Checks that `rows` are ordered, contiguous and cover `[first, last]`
fn validate_tiling<R: RangeRule>(
    table: &str,
    rows: &[R],
    first: u32,
    last: u32,
) -> Result<(), ProvisioningError> {
    let mut next_expected = first;

    for (position, row) in rows.iter().enumerate() {
        let (start, end) = row.bounds();

        if start > end {
            return Err(ProvisioningError::invalid_table(format!(
                "{} row {} has start after end",
                table,
                row.describe()
            )));
        }

        if position == 0 && start > first {
            return Err(ProvisioningError::invalid_table(format!(
                "{} table starts at {} but must cover {}",
                table, start, first
            )));
        }

        if position > 0 && start != next_expected {
            let problem = if start < next_expected { "overlaps" } else { "leaves a gap before" };
            return Err(ProvisioningError::invalid_table(format!(
                "{} row {} {} the previous row",
                table,
                row.describe(),
                problem
            )));
        }

        for (classification, percent) in row.percents().iter() {
            if let Some(p) = percent {
                if p < Decimal::ZERO || p > Decimal::ONE_HUNDRED {
                    return Err(ProvisioningError::invalid_table(format!(
                        "{} row {} has {} percentage {} outside [0, 100]",
                        table,
                        row.describe(),
                        classification,
                        p
                    )));
                }
            }
        }

        next_expected = end.saturating_add(1);
    }

    if rows.is_empty() || next_expected <= last {
        return Err(ProvisioningError::invalid_table(format!(
            "{} table does not cover up to {}",
            table, last
        )));
    }

    Ok(())
}
