//! Custom Test Assertions
//!
//! Provides assertion helpers for provision results that give more
//! meaningful error messages than standard assertions.

use domain_provisioning::{ContractSnapshot, Methodology, ProvisionResult};
use rust_decimal::Decimal;

/// Asserts that a provision percentage lies within `[0, 100]`
pub fn assert_percent_in_bounds(result: &ProvisionResult) {
    assert!(
        result.percent >= Decimal::ZERO && result.percent <= Decimal::ONE_HUNDRED,
        "Provision percent {} outside [0, 100] ({})",
        result.percent,
        result.applied_rule_label
    );
}

/// Asserts that the provision amount equals outstanding x percent / 100
///
/// # Panics
///
/// Panics if the currencies differ or the amounts do not match exactly
pub fn assert_amount_matches_percent(snapshot: &ContractSnapshot, result: &ProvisionResult) {
    assert_eq!(
        result.amount.currency(),
        snapshot.outstanding_amount.currency(),
        "Provision currency differs from outstanding currency"
    );

    let expected =
        snapshot.outstanding_amount.amount() * result.percent / Decimal::ONE_HUNDRED;
    assert_eq!(
        result.amount.amount(),
        expected,
        "Provision amount {} does not match {} of {}",
        result.amount,
        result.percent,
        snapshot.outstanding_amount
    );
}

/// Asserts a full provision produced by the regulatory mark
pub fn assert_full_provision(snapshot: &ContractSnapshot, result: &ProvisionResult) {
    assert_eq!(
        result.methodology,
        Methodology::RegulatoryOverride,
        "Expected regulatory mark, got {} ({})",
        result.methodology,
        result.applied_rule_label
    );
    assert!(
        result.is_full_provision(),
        "Expected 100% provision, got {}",
        result.percent
    );
    assert_eq!(result.amount, snapshot.outstanding_amount);
}

/// Asserts that a result is at least a given percentage
pub fn assert_percent_at_least(result: &ProvisionResult, floor: Decimal) {
    assert!(
        result.percent >= floor,
        "Provision percent {} below {} ({})",
        result.percent,
        floor,
        result.applied_rule_label
    );
}
