//! Test Data Builders
//!
//! Provides builder patterns for constructing contract snapshots with
//! sensible defaults. Tests specify only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{ClientId, ContractId, Money, Rate};
use domain_provisioning::{ClassificationRisk, ContractSnapshot};

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builder for constructing test contract snapshots
pub struct ContractSnapshotBuilder {
    contract_id: ContractId,
    client_id: ClientId,
    outstanding_amount: Money,
    days_overdue: u32,
    classification: ClassificationRisk,
    restructuring_date: Option<NaiveDate>,
    restructured_without_date: bool,
    collateral_value: Option<Money>,
    effective_annual_rate: Option<Rate>,
}

impl Default for ContractSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractSnapshotBuilder {
    /// Creates a builder for a current, unsecured C1 contract of BRL 1,000
    pub fn new() -> Self {
        Self {
            contract_id: ContractId::new(),
            client_id: ClientId::new(),
            outstanding_amount: MoneyFixtures::brl_1k(),
            days_overdue: 0,
            classification: ClassificationRisk::C1,
            restructuring_date: None,
            restructured_without_date: false,
            collateral_value: None,
            effective_annual_rate: None,
        }
    }

    pub fn with_contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = id;
        self
    }

    pub fn with_client_id(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    pub fn with_outstanding(mut self, amount: Money) -> Self {
        self.outstanding_amount = amount;
        self
    }

    pub fn with_days_overdue(mut self, days: u32) -> Self {
        self.days_overdue = days;
        self
    }

    pub fn with_classification(mut self, classification: ClassificationRisk) -> Self {
        self.classification = classification;
        self
    }

    /// Restructured `days` before the standard valuation date
    pub fn restructured_days_ago(mut self, days: u64) -> Self {
        self.restructuring_date = Some(TemporalFixtures::days_before_valuation(days));
        self
    }

    pub fn restructured_on(mut self, date: NaiveDate) -> Self {
        self.restructuring_date = Some(date);
        self
    }

    /// Flags the contract as restructured with no recorded date
    pub fn restructured_without_date(mut self) -> Self {
        self.restructured_without_date = true;
        self
    }

    pub fn with_collateral(mut self, value: Money) -> Self {
        self.collateral_value = Some(value);
        self
    }

    pub fn with_effective_annual_rate(mut self, rate: Rate) -> Self {
        self.effective_annual_rate = Some(rate);
        self
    }

    /// Builds the snapshot
    pub fn build(self) -> ContractSnapshot {
        let mut snapshot = ContractSnapshot::new(self.outstanding_amount, self.days_overdue, self.classification)
            .with_contract_id(self.contract_id)
            .with_client_id(self.client_id);

        if let Some(date) = self.restructuring_date {
            snapshot = snapshot.with_restructuring(date);
        } else if self.restructured_without_date {
            snapshot.is_restructured = true;
        }

        if let Some(value) = self.collateral_value {
            snapshot = snapshot.with_collateral(value);
        }

        if let Some(rate) = self.effective_annual_rate {
            snapshot = snapshot.with_effective_annual_rate(rate);
        }

        snapshot
    }
}
