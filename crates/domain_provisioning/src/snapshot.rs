//! Calculation input and output records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{days_overdue, ClientId, ContractId, Money, Rate};

use crate::classification::{ClassificationRisk, RiskStage};
use crate::error::ProvisioningError;

/// Immutable view of a contract at valuation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    /// Contract the snapshot was taken from, used for tracing only
    pub contract_id: ContractId,
    pub client_id: Option<ClientId>,
    pub outstanding_amount: Money,
    pub days_overdue: u32,
    pub classification: ClassificationRisk,
    pub is_restructured: bool,
    pub restructuring_date: Option<NaiveDate>,
    pub has_real_collateral: bool,
    pub collateral_value: Option<Money>,
    /// Carried from the contract record; not used by provisioning
    pub effective_annual_rate: Option<Rate>,
}

impl ContractSnapshot {
    /// Creates a snapshot of an unsecured, non-restructured contract
    pub fn new(outstanding_amount: Money, days_overdue: u32, classification: ClassificationRisk) -> Self {
        Self {
            contract_id: ContractId::new(),
            client_id: None,
            outstanding_amount,
            days_overdue,
            classification,
            is_restructured: false,
            restructuring_date: None,
            has_real_collateral: false,
            collateral_value: None,
            effective_annual_rate: None,
        }
    }

    /// Creates a snapshot ageing delinquency from the oldest unpaid due date
    pub fn from_due_date(
        outstanding_amount: Money,
        due_date: NaiveDate,
        today: NaiveDate,
        classification: ClassificationRisk,
    ) -> Self {
        Self::new(outstanding_amount, days_overdue(today, due_date), classification)
    }

    pub fn with_contract_id(mut self, contract_id: ContractId) -> Self {
        self.contract_id = contract_id;
        self
    }

    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Marks the contract as restructured on the given date
    pub fn with_restructuring(mut self, restructuring_date: NaiveDate) -> Self {
        self.is_restructured = true;
        self.restructuring_date = Some(restructuring_date);
        self
    }

    /// Attaches real collateral of the given value
    pub fn with_collateral(mut self, collateral_value: Money) -> Self {
        self.has_real_collateral = true;
        self.collateral_value = Some(collateral_value);
        self
    }

    pub fn with_effective_annual_rate(mut self, rate: Rate) -> Self {
        self.effective_annual_rate = Some(rate);
        self
    }

    /// Checks the caller preconditions the calculators rely on
    pub fn validate(&self) -> Result<(), ProvisioningError> {
        if self.outstanding_amount.is_negative() {
            return Err(ProvisioningError::validation(format!(
                "outstanding amount must not be negative, got {}",
                self.outstanding_amount
            )));
        }

        if let Some(collateral) = &self.collateral_value {
            if collateral.is_negative() {
                return Err(ProvisioningError::validation(format!(
                    "collateral value must not be negative, got {}",
                    collateral
                )));
            }
            if collateral.currency() != self.outstanding_amount.currency() {
                return Err(ProvisioningError::validation(format!(
                    "collateral currency {} differs from outstanding currency {}",
                    collateral.currency(),
                    self.outstanding_amount.currency()
                )));
            }
        }

        Ok(())
    }
}

/// How a provision percentage was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    /// Forced to 100% by the regulatory mark
    RegulatoryOverride,
    /// Expected-loss table, up to 90 days overdue
    ExpectedLoss,
    /// Incurred-loss table, beyond 90 days overdue
    IncurredLoss,
    /// PD x LGD estimate, floored at the tabular result
    AdvancedExpectedLoss,
}

impl Methodology {
    pub fn label(&self) -> &'static str {
        match self {
            Methodology::RegulatoryOverride => "Regulatory mark",
            Methodology::ExpectedLoss => "Expected loss",
            Methodology::IncurredLoss => "Incurred loss",
            Methodology::AdvancedExpectedLoss => "Advanced PD x LGD",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Provision computed for one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionResult {
    /// Provision percentage in `[0, 100]`
    pub percent: Decimal,
    /// `outstanding_amount * percent / 100`
    pub amount: Money,
    pub stage: RiskStage,
    pub methodology: Methodology,
    /// Provenance of the figure, for audit
    pub applied_rule_label: String,
    pub observation_window_active: bool,
    pub days_remaining_in_observation: u32,
}

impl ProvisionResult {
    /// Provision percentage as a [`Rate`]
    pub fn rate(&self) -> Rate {
        Rate::from_percentage(self.percent)
    }

    /// Returns true when the full outstanding amount is provisioned
    pub fn is_full_provision(&self) -> bool {
        self.percent == Decimal::ONE_HUNDRED
    }
}
