//! Comprehensive tests for domain_provisioning

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;

use domain_provisioning::{
    calculate_advanced, calculate_basic, classify_stage, observation_status, regulatory_mark,
    resolve_expected_loss, resolve_incurred_loss, write_off_eligible, ClassificationRisk,
    ContractSnapshot, LossCriterion, Methodology, ProvisionResult, ProvisioningConfig,
    ProvisioningEngine, ProvisioningError, RegulatoryTables, RiskStage, TableRegistry,
    DEFAULT_TABLES,
};

use test_utils::{
    assert_amount_matches_percent, assert_full_provision, assert_percent_at_least,
    init_test_tracing, ContractSnapshotBuilder, MoneyFixtures, TableFixtures, TemporalFixtures,
};

fn valuation() -> NaiveDate {
    TemporalFixtures::valuation_date()
}

fn basic(snapshot: &ContractSnapshot) -> ProvisionResult {
    init_test_tracing();
    calculate_basic(
        snapshot,
        &DEFAULT_TABLES.expected_loss,
        &DEFAULT_TABLES.incurred_loss,
        valuation(),
        &ProvisioningConfig::default(),
    )
    .expect("basic provision")
}

fn advanced(snapshot: &ContractSnapshot) -> ProvisionResult {
    init_test_tracing();
    calculate_advanced(
        snapshot,
        &DEFAULT_TABLES.expected_loss,
        &DEFAULT_TABLES.incurred_loss,
        valuation(),
        &ProvisioningConfig::default(),
    )
    .expect("advanced provision")
}

// ============================================================================
// Reference Scenarios
// ============================================================================

mod reference_scenario_tests {
    use super::*;

    #[test]
    fn test_incurred_loss_at_ninety_five_days() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_100k())
            .with_days_overdue(95)
            .with_classification(ClassificationRisk::C3)
            .build();

        let result = basic(&snapshot);

        assert_eq!(result.percent, dec!(56.1));
        assert_eq!(result.amount.amount(), dec!(56100));
        assert_eq!(result.stage, RiskStage::Stage3);
        assert_eq!(result.methodology, Methodology::IncurredLoss);
        assert_eq!(result.applied_rule_label, "Incurred loss [3 months]");
        assert!(!result.observation_window_active);
    }

    #[test]
    fn test_regulatory_mark_for_low_risk() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(650)
            .with_classification(ClassificationRisk::C1)
            .build();

        let result = basic(&snapshot);

        assert_full_provision(&snapshot, &result);
        assert_eq!(result.stage, RiskStage::Stage3);
        assert_eq!(result.applied_rule_label, "Regulatory mark: C1 at 21 months (>= 21)");
    }

    #[test]
    fn test_expected_loss_within_thirty_days() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(20)
            .with_classification(ClassificationRisk::C2)
            .build();

        let result = basic(&snapshot);

        assert_eq!(result.stage, RiskStage::Stage1);
        assert_eq!(result.methodology, Methodology::ExpectedLoss);
        assert_eq!(result.percent, dec!(3.0));
        assert_eq!(result.applied_rule_label, "Expected loss [15-30 days]");
    }

    #[test]
    fn test_restructured_contract_under_observation() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_20k())
            .with_days_overdue(10)
            .with_classification(ClassificationRisk::C1)
            .restructured_days_ago(100)
            .build();

        let result = basic(&snapshot);

        assert_eq!(result.stage, RiskStage::Stage2);
        assert!(result.observation_window_active);
        assert_eq!(result.days_remaining_in_observation, 80);
        assert_eq!(result.percent, dec!(3.0));
        assert_eq!(result.amount.amount(), dec!(600));
        assert_eq!(
            result.applied_rule_label,
            "Expected loss [0-14 days] (restructured, under observation)"
        );
    }
}

// ============================================================================
// Amount Precision Tests
// ============================================================================

mod amount_precision_tests {
    use super::*;

    #[test]
    fn test_sub_centavo_amount_is_exact() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(Money::brl(dec!(0.01)))
            .with_days_overdue(95)
            .with_classification(ClassificationRisk::C3)
            .build();

        for result in [basic(&snapshot), advanced(&snapshot)] {
            assert_eq!(result.percent, dec!(56.1));
            assert_eq!(result.amount.amount(), dec!(0.00561));
            assert_amount_matches_percent(&snapshot, &result);
        }
    }

    #[test]
    fn test_fractional_percent_keeps_all_digits() {
        // C5, 45 days under the model: 41.25% of 0.03
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(Money::brl(dec!(0.03)))
            .with_days_overdue(45)
            .with_classification(ClassificationRisk::C5)
            .build();

        let result = advanced(&snapshot);

        assert_eq!(result.percent, dec!(41.25));
        assert_eq!(result.amount.amount(), dec!(0.012375));
    }

    #[test]
    fn test_amount_near_decimal_limit_under_mark() {
        let outstanding = Money::brl(Decimal::from_i128_with_scale(10_i128.pow(27), 0));
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(outstanding)
            .with_days_overdue(650)
            .with_classification(ClassificationRisk::C1)
            .build();

        for result in [basic(&snapshot), advanced(&snapshot)] {
            assert_full_provision(&snapshot, &result);
        }
    }

    #[test]
    fn test_amount_near_decimal_limit_through_tables() {
        let outstanding = Money::brl(Decimal::from_i128_with_scale(10_i128.pow(27), 0));
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(outstanding)
            .with_days_overdue(95)
            .with_classification(ClassificationRisk::C3)
            .build();

        let result = basic(&snapshot);

        assert_eq!(
            result.amount.amount(),
            Decimal::from_i128_with_scale(561 * 10_i128.pow(24), 0)
        );
    }
}

// ============================================================================
// Regulatory Mark Tests
// ============================================================================

mod regulatory_mark_tests {
    use super::*;

    #[test]
    fn test_high_risk_mark_at_fifteen_months() {
        for classification in [ClassificationRisk::C3, ClassificationRisk::C4, ClassificationRisk::C5] {
            assert!(!regulatory_mark(449, classification).applies);
            assert!(regulatory_mark(450, classification).applies);
        }
    }

    #[test]
    fn test_low_risk_mark_at_twenty_one_months() {
        for classification in [ClassificationRisk::C1, ClassificationRisk::C2] {
            assert!(!regulatory_mark(629, classification).applies);
            assert!(regulatory_mark(630, classification).applies);
        }
    }

    #[test]
    fn test_mark_dominates_both_calculators() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(460)
            .with_classification(ClassificationRisk::C4)
            .restructured_days_ago(5)
            .with_collateral(Money::brl(dec!(100000)))
            .build();

        assert_full_provision(&snapshot, &basic(&snapshot));
        assert_full_provision(&snapshot, &advanced(&snapshot));
    }

    #[test]
    fn test_last_month_before_mark_uses_table() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(629)
            .with_classification(ClassificationRisk::C1)
            .build();

        let result = basic(&snapshot);

        assert_eq!(result.methodology, Methodology::IncurredLoss);
        assert_eq!(result.percent, dec!(90.0));
    }

    #[test]
    fn test_mark_does_not_need_tables() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(700)
            .with_classification(ClassificationRisk::C2)
            .build();

        let result = calculate_basic(&snapshot, &[], &[], valuation(), &ProvisioningConfig::default())
            .unwrap();

        assert!(result.is_full_provision());
    }
}

// ============================================================================
// Observation Window Tests
// ============================================================================

mod observation_window_tests {
    use super::*;

    #[test]
    fn test_last_day_of_window_is_active() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(10)
            .restructured_days_ago(180)
            .build();

        let result = basic(&snapshot);

        assert!(result.observation_window_active);
        assert_eq!(result.days_remaining_in_observation, 0);
        assert_eq!(result.stage, RiskStage::Stage2);
    }

    #[test]
    fn test_window_closes_after_one_hundred_eighty_days() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(10)
            .restructured_days_ago(181)
            .build();

        let result = basic(&snapshot);

        assert!(!result.observation_window_active);
        assert_eq!(result.stage, RiskStage::Stage1);
        assert_eq!(result.percent, dec!(1.0));
        assert_eq!(result.applied_rule_label, "Expected loss [0-14 days]");
    }

    #[test]
    fn test_future_restructuring_date_counts_as_today() {
        let status = observation_status(
            true,
            Some(TemporalFixtures::days_after_valuation(10)),
            valuation(),
            180,
        );

        assert!(status.active);
        assert_eq!(status.days_remaining, 180);
    }

    #[test]
    fn test_restructured_without_date_is_not_observed() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(10)
            .restructured_without_date()
            .build();

        let result = basic(&snapshot);

        assert!(!result.observation_window_active);
        assert_eq!(result.stage, RiskStage::Stage1);
    }

    #[test]
    fn test_stage_three_survives_observation() {
        assert_eq!(classify_stage(120, true, true), RiskStage::Stage3);
        assert_eq!(classify_stage(0, true, true), RiskStage::Stage2);
        assert_eq!(classify_stage(0, true, false), RiskStage::Stage1);
    }

    #[test]
    fn test_configured_floor() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(10)
            .restructured_days_ago(20)
            .build();
        let config = ProvisioningConfig::default().with_observation_floor(dec!(5));

        let result = calculate_basic(
            &snapshot,
            &DEFAULT_TABLES.expected_loss,
            &DEFAULT_TABLES.incurred_loss,
            valuation(),
            &config,
        )
        .unwrap();

        assert_eq!(result.percent, dec!(5));
    }
}

// ============================================================================
// Advanced Calculator Tests
// ============================================================================

mod advanced_calculator_tests {
    use super::*;

    #[test]
    fn test_model_above_floor_under_observation() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_20k())
            .with_days_overdue(10)
            .restructured_days_ago(100)
            .build();

        let result = advanced(&snapshot);

        assert_eq!(result.percent, dec!(3.5));
        assert_eq!(result.amount.amount(), dec!(700));
        assert_eq!(result.stage, RiskStage::Stage2);
        assert_eq!(
            result.applied_rule_label,
            "Advanced PD x LGD: pd=10% lgd=35% el=3.5% baseline=3% (restructured, under observation)"
        );
    }

    #[test]
    fn test_collateral_reduces_model_but_not_below_tables() {
        let unsecured = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_1k())
            .with_days_overdue(45)
            .with_classification(ClassificationRisk::C5)
            .build();
        let secured = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_1k())
            .with_days_overdue(45)
            .with_classification(ClassificationRisk::C5)
            .with_collateral(MoneyFixtures::brl_1k())
            .build();

        let unsecured = advanced(&unsecured);
        let secured = advanced(&secured);

        // recovery 25 -> 55 with full coverage
        assert_eq!(unsecured.percent, dec!(41.25));
        assert_eq!(secured.percent, dec!(24.75));
        assert_percent_at_least(&secured, dec!(22.0));
    }

    #[test]
    fn test_zero_outstanding_with_collateral() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_zero())
            .with_days_overdue(45)
            .with_classification(ClassificationRisk::C3)
            .with_collateral(MoneyFixtures::brl_1k())
            .build();

        let result = advanced(&snapshot);

        assert!(result.amount.is_zero());
        assert_eq!(result.percent, dec!(12.0));
    }
}

// ============================================================================
// Table Tests
// ============================================================================

mod table_tests {
    use super::*;

    #[test]
    fn test_expected_loss_days_resolve_to_exactly_one_row() {
        for day in 0..=90u32 {
            let matches = DEFAULT_TABLES
                .expected_loss
                .iter()
                .filter(|row| row.days_range_start <= day && day <= row.days_range_end)
                .count();
            assert_eq!(matches, 1, "day {} matched {} rows", day, matches);
            assert!(resolve_expected_loss(day, &DEFAULT_TABLES.expected_loss).is_some());
        }
    }

    #[test]
    fn test_incurred_loss_months_resolve() {
        for month in 3..=21u32 {
            assert!(
                resolve_incurred_loss(month, LossCriterion::MonthsOverdue, &DEFAULT_TABLES.incurred_loss)
                    .is_some(),
                "month {} has no row",
                month
            );
        }
    }

    #[test]
    fn test_gap_surfaces_as_error() {
        let tables = TableFixtures::with_expected_loss_gap();
        assert!(matches!(tables.validate(), Err(ProvisioningError::InvalidTable(_))));

        let snapshot = ContractSnapshotBuilder::new().with_days_overdue(31).build();
        let err = calculate_basic(
            &snapshot,
            &tables.expected_loss,
            &tables.incurred_loss,
            valuation(),
            &ProvisioningConfig::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ProvisioningError::NoRuleFound { table: "expected loss", value: 31, unit: "days" }
        );
    }

    #[test]
    fn test_published_json_parses_and_validates() {
        let tables = RegulatoryTables::from_json_str(TableFixtures::published_json()).unwrap();
        tables.validate().unwrap();

        assert_eq!(tables.version, "test-2024");
        assert_eq!(tables.expected_loss.len(), 2);
        assert_eq!(tables.incurred_loss.len(), 2);
    }

    #[test]
    fn test_unpublished_percent_is_an_error() {
        let tables = RegulatoryTables::from_json_str(TableFixtures::published_json()).unwrap();
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(300)
            .with_classification(ClassificationRisk::C5)
            .build();

        // month 10 of C5 is published as null
        let err = calculate_basic(
            &snapshot,
            &tables.expected_loss,
            &tables.incurred_loss,
            valuation(),
            &ProvisioningConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ProvisioningError::PercentUnset { classification: ClassificationRisk::C5, .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = RegulatoryTables::from_json_str("{ \"version\": 1 }").unwrap_err();
        assert!(matches!(err, ProvisioningError::TableParse(_)));
    }

    #[test]
    fn test_json_publication_round_trip() {
        let json = DEFAULT_TABLES.to_json_string().unwrap();
        let parsed = RegulatoryTables::from_json_str(&json).unwrap();
        assert_eq!(parsed, **DEFAULT_TABLES);
    }

    #[test]
    fn test_incurred_loss_by_days() {
        let tables = TableFixtures::by_days();
        tables.validate().unwrap();

        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(200)
            .with_classification(ClassificationRisk::C2)
            .build();
        let config = ProvisioningConfig::default().with_incurred_criterion(LossCriterion::DaysOverdue);

        let result = calculate_basic(
            &snapshot,
            &tables.expected_loss,
            &tables.incurred_loss,
            valuation(),
            &config,
        )
        .unwrap();

        assert_eq!(result.percent, dec!(70));
        assert_eq!(result.applied_rule_label, "Incurred loss [181-629 days]");
    }
}

// ============================================================================
// Registry Tests
// ============================================================================

mod registry_tests {
    use super::*;

    #[test]
    fn test_in_flight_snapshot_is_stable() {
        let mut registry = TableRegistry::with_defaults();
        let in_flight = registry.current().unwrap();

        registry.register(TableFixtures::by_days()).unwrap();
        registry.activate("by-days").unwrap();

        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_100k())
            .with_days_overdue(95)
            .with_classification(ClassificationRisk::C3)
            .build();
        let result = calculate_basic(
            &snapshot,
            &in_flight.expected_loss,
            &in_flight.incurred_loss,
            valuation(),
            &ProvisioningConfig::default(),
        )
        .unwrap();

        assert_eq!(result.percent, dec!(56.1));
        assert!(Arc::ptr_eq(&in_flight, &*DEFAULT_TABLES));
        assert_eq!(registry.current().unwrap().version, "by-days");
    }

    #[test]
    fn test_gapped_tables_are_refused() {
        let mut registry = TableRegistry::with_defaults();
        assert!(registry.register(TableFixtures::with_expected_loss_gap()).is_err());
        assert!(registry.get("gapped").is_none());
    }

    #[test]
    fn test_register_from_file() {
        let path = std::env::temp_dir().join(format!("provisioning-tables-{}.json", std::process::id()));
        std::fs::write(&path, TableFixtures::published_json()).unwrap();

        let mut registry = TableRegistry::new();
        let published = registry.register_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(published.version, "test-2024");
        assert_eq!(registry.active_version(), Some("test-2024"));
    }
}

// ============================================================================
// Engine Tests
// ============================================================================

mod engine_tests {
    use super::*;

    #[test]
    fn test_assessment_of_reference_contract() {
        init_test_tracing();
        let engine = ProvisioningEngine::default();
        let snapshot = ContractSnapshotBuilder::new()
            .with_outstanding(MoneyFixtures::brl_100k())
            .with_days_overdue(95)
            .with_classification(ClassificationRisk::C3)
            .build();

        let assessment = engine.assess(&snapshot, &DEFAULT_TABLES, valuation()).unwrap();

        assert_eq!(assessment.basic.percent, dec!(56.1));
        assert_eq!(assessment.advanced.percent, dec!(56.1));
        assert_amount_matches_percent(&snapshot, &assessment.advanced);
        assert!(!assessment.write_off.eligible);
        assert_eq!(assessment.write_off.threshold_months, 24);
    }

    #[test]
    fn test_assessment_rejects_foreign_collateral() {
        let engine = ProvisioningEngine::default();
        let snapshot = ContractSnapshotBuilder::new()
            .with_collateral(MoneyFixtures::usd_collateral())
            .build();

        let err = engine.assess(&snapshot, &DEFAULT_TABLES, valuation()).unwrap_err();
        assert!(matches!(err, ProvisioningError::Validation(_)));
    }

    #[test]
    fn test_snapshot_from_due_date() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
        let snapshot = ContractSnapshot::from_due_date(
            MoneyFixtures::brl_100k(),
            due,
            valuation(),
            ClassificationRisk::C3,
        );

        assert_eq!(snapshot.days_overdue, 95);
        assert_eq!(basic(&snapshot).percent, dec!(56.1));
    }

    #[test]
    fn test_due_date_in_future_is_current() {
        let snapshot = ContractSnapshot::from_due_date(
            MoneyFixtures::brl_1k(),
            TemporalFixtures::days_after_valuation(15),
            valuation(),
            ClassificationRisk::C2,
        );
        assert_eq!(snapshot.days_overdue, 0);
    }
}

// ============================================================================
// Write-off Tests
// ============================================================================

mod write_off_tests {
    use super::*;

    #[test]
    fn test_thresholds_by_classification() {
        assert!(!write_off_eligible(539, ClassificationRisk::C5));
        assert!(write_off_eligible(540, ClassificationRisk::C5));
        assert!(!write_off_eligible(719, ClassificationRisk::C3));
        assert!(write_off_eligible(720, ClassificationRisk::C4));
        assert!(!write_off_eligible(1079, ClassificationRisk::C2));
        assert!(write_off_eligible(1080, ClassificationRisk::C1));
    }

    #[test]
    fn test_write_off_does_not_change_provision() {
        let snapshot = ContractSnapshotBuilder::new()
            .with_days_overdue(1200)
            .with_classification(ClassificationRisk::C5)
            .build();

        let result = basic(&snapshot);

        assert!(write_off_eligible(snapshot.days_overdue, snapshot.classification));
        assert_eq!(result.percent, Decimal::ONE_HUNDRED);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod configuration_tests {
    use super::*;

    #[test]
    fn test_config_from_file() {
        let path = std::env::temp_dir().join(format!("provisioning-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "observation_floor_percent = \"4.5\"\nobservation_window_days = 120\nincurred_criterion = \"days_overdue\"\n",
        )
        .unwrap();

        let config = ProvisioningConfig::from_file(&path);
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.observation_floor_percent, dec!(4.5));
        assert_eq!(config.observation_window_days, 120);
        assert_eq!(config.incurred_criterion, LossCriterion::DaysOverdue);
    }

    #[test]
    fn test_missing_config_file() {
        let path = std::env::temp_dir().join("provisioning-config-missing.toml");
        let err = ProvisioningConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ProvisioningError::Configuration(_)));
    }
}
