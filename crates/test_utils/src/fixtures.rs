//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the provisioning test suite.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::{Days, NaiveDate};
use core_kernel::{Currency, Money};
use domain_provisioning::{
    ClassificationPercents, ExpectedLossRule, IncurredLossRule, LossCriterion, RegulatoryTables,
    DEFAULT_TABLES,
};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Outstanding balance used by the incurred-loss reference scenario
    pub fn brl_100k() -> Money {
        Money::brl(dec!(100000.00))
    }

    /// Outstanding balance used by the restructuring reference scenario
    pub fn brl_20k() -> Money {
        Money::brl(dec!(20000.00))
    }

    pub fn brl_1k() -> Money {
        Money::brl(dec!(1000.00))
    }

    pub fn brl_zero() -> Money {
        Money::zero(Currency::BRL)
    }

    /// Collateral in a different currency, for validation tests
    pub fn usd_collateral() -> Money {
        Money::new(dec!(5000.00), Currency::USD)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard valuation date (Jun 30, 2024)
    pub fn valuation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    /// Date `days` before the valuation date
    pub fn days_before_valuation(days: u64) -> NaiveDate {
        Self::valuation_date().checked_sub_days(Days::new(days)).unwrap()
    }

    /// Date `days` after the valuation date
    pub fn days_after_valuation(days: u64) -> NaiveDate {
        Self::valuation_date().checked_add_days(Days::new(days)).unwrap()
    }
}

/// Fixture for regulatory table sets
pub struct TableFixtures;

impl TableFixtures {
    /// Compiled table set
    pub fn defaults() -> RegulatoryTables {
        (**DEFAULT_TABLES).clone()
    }

    /// Compiled figures under another version name
    pub fn revision(version: &str) -> RegulatoryTables {
        let mut tables = Self::defaults();
        tables.version = version.to_string();
        tables
    }

    /// Table set whose expected-loss table skips day 31
    pub fn with_expected_loss_gap() -> RegulatoryTables {
        let mut tables = Self::revision("gapped");
        tables.expected_loss = vec![
            ExpectedLossRule::new(0, 30, ClassificationPercents::new([dec!(1); 5])),
            ExpectedLossRule::new(32, 90, ClassificationPercents::new([dec!(5); 5])),
        ];
        tables
    }

    /// Table set whose incurred-loss rows are keyed by days instead of months
    pub fn by_days() -> RegulatoryTables {
        let mut tables = Self::revision("by-days");
        tables.incurred_loss = vec![
            IncurredLossRule::new(
                LossCriterion::DaysOverdue,
                91,
                180,
                ClassificationPercents::new([dec!(20), dec!(35), dec!(50), dec!(60), dec!(70)]),
            ),
            IncurredLossRule::new(
                LossCriterion::DaysOverdue,
                181,
                629,
                ClassificationPercents::new([dec!(50), dec!(70), dec!(100), dec!(100), dec!(100)]),
            ),
        ];
        tables
    }

    /// JSON publication of a minimal valid table set
    pub fn published_json() -> &'static str {
        r#"{
            "version": "test-2024",
            "expected_loss": [
                { "days_range_start": 0, "days_range_end": 30, "percent_by_classification": [1.0, 2.0, 3.0, 4.0, 5.0] },
                { "days_range_start": 31, "days_range_end": 90, "percent_by_classification": [5.0, 8.0, 12.0, 18.0, 25.0] }
            ],
            "incurred_loss": [
                { "criterion": "months_overdue", "range_start": 3, "range_end": 8, "percent_by_classification": [25.0, 40.0, 60.0, 70.0, 80.0] },
                { "criterion": "months_overdue", "range_start": 9, "range_end": 20, "percent_by_classification": [60.0, 80.0, 100.0, 100.0, null] }
            ]
        }"#
    }
}
