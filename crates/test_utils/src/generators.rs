//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating contract snapshots that
//! respect the calculators' preconditions.

use core_kernel::Money;
use domain_provisioning::{ClassificationRisk, ContractSnapshot};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::TemporalFixtures;

/// Strategy for generating any classification
pub fn classification_strategy() -> impl Strategy<Value = ClassificationRisk> {
    prop::sample::select(ClassificationRisk::ALL.to_vec())
}

/// Strategy for delinquency ages, from current to well past write-off
pub fn days_overdue_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..=90u32,
        91u32..=1200u32,
    ]
}

/// Strategy for non-negative BRL outstanding amounts, in centavos
pub fn outstanding_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000_000i64).prop_map(|cents| Money::brl(Decimal::new(cents, 2)))
}

/// Strategy for restructuring ages in days; `None` means not restructured
pub fn restructuring_age_strategy() -> impl Strategy<Value = Option<u64>> {
    prop::option::of(0u64..400u64)
}

/// Strategy for collateral as a share of outstanding, in percent
pub fn collateral_share_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(1u32..300u32)
}

/// Strategy for valid contract snapshots valued at the standard valuation date
pub fn snapshot_strategy() -> impl Strategy<Value = ContractSnapshot> {
    (
        outstanding_strategy(),
        days_overdue_strategy(),
        classification_strategy(),
        restructuring_age_strategy(),
        collateral_share_strategy(),
    )
        .prop_map(|(outstanding, days, classification, restructured, collateral)| {
            let mut snapshot = ContractSnapshot::new(outstanding, days, classification);

            if let Some(age) = restructured {
                snapshot = snapshot.with_restructuring(TemporalFixtures::days_before_valuation(age));
            }

            if let Some(share) = collateral {
                let outstanding = snapshot.outstanding_amount;
                let value = Money::new(
                    outstanding.amount() * Decimal::from(share) / Decimal::ONE_HUNDRED,
                    outstanding.currency(),
                );
                if value.is_positive() {
                    snapshot = snapshot.with_collateral(value);
                }
            }

            snapshot
        })
}
