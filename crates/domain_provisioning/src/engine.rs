//! Provisioning engine
//!
//! Binds a [`ProvisioningConfig`] to the calculators so callers pass only
//! the contract, the table set and the valuation date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advanced::calculate_advanced;
use crate::basic::calculate_basic;
use crate::config::ProvisioningConfig;
use crate::error::ProvisioningError;
use crate::snapshot::{ContractSnapshot, ProvisionResult};
use crate::tables::RegulatoryTables;
use crate::write_off::{write_off_advice, WriteOffAdvice};

/// Both provisions and the write-off flag for one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionAssessment {
    /// Version of the tables the figures were computed from
    pub table_version: String,
    pub basic: ProvisionResult,
    pub advanced: ProvisionResult,
    pub write_off: WriteOffAdvice,
}

/// Configured entry point to the provisioning calculators
#[derive(Debug, Clone, Default)]
pub struct ProvisioningEngine {
    config: ProvisioningConfig,
}

impl ProvisioningEngine {
    /// Creates an engine with a validated configuration
    pub fn new(config: ProvisioningConfig) -> Result<Self, ProvisioningError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates an engine from environment configuration
    pub fn from_env() -> Result<Self, ProvisioningError> {
        Self::new(ProvisioningConfig::from_env()?)
    }

    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    /// Tabular provision
    pub fn basic(
        &self,
        snapshot: &ContractSnapshot,
        tables: &RegulatoryTables,
        now: NaiveDate,
    ) -> Result<ProvisionResult, ProvisioningError> {
        calculate_basic(snapshot, &tables.expected_loss, &tables.incurred_loss, now, &self.config)
    }

    /// Model-refined provision, never below the tabular one
    pub fn advanced(
        &self,
        snapshot: &ContractSnapshot,
        tables: &RegulatoryTables,
        now: NaiveDate,
    ) -> Result<ProvisionResult, ProvisioningError> {
        calculate_advanced(snapshot, &tables.expected_loss, &tables.incurred_loss, now, &self.config)
    }

    pub fn write_off(&self, snapshot: &ContractSnapshot) -> WriteOffAdvice {
        write_off_advice(snapshot.days_overdue, snapshot.classification)
    }

    pub fn write_off_eligible(&self, snapshot: &ContractSnapshot) -> bool {
        self.write_off(snapshot).eligible
    }

    /// Validates the snapshot and computes everything reported for it
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Validation`] for a malformed snapshot, or
    /// the lookup error of either calculator.
    pub fn assess(
        &self,
        snapshot: &ContractSnapshot,
        tables: &RegulatoryTables,
        now: NaiveDate,
    ) -> Result<ProvisionAssessment, ProvisioningError> {
        snapshot.validate()?;

        let basic = self.basic(snapshot, tables, now)?;
        let advanced = self.advanced(snapshot, tables, now)?;
        let write_off = self.write_off(snapshot);

        info!(
            contract = %snapshot.contract_id,
            client = ?snapshot.client_id,
            tables = %tables.version,
            basic = %basic.percent,
            advanced = %advanced.percent,
            stage = %basic.stage,
            write_off = write_off.eligible,
            "Assessed contract provision"
        );

        Ok(ProvisionAssessment {
            table_version: tables.version.clone(),
            basic,
            advanced,
            write_off,
        })
    }
}
