//! Provisioning domain errors
//!
//! The only failure internal to a calculation is the absence of a regulatory
//! figure: either no table row covers the delinquency, or the matched row has
//! no percentage for the classification. Both surface as typed errors so that
//! a missing rule is never confused with a legitimate zero provision.

use thiserror::Error;

use core_kernel::CoreError;

use crate::classification::ClassificationRisk;

/// Errors that can occur in the provisioning domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvisioningError {
    /// No row of the named table covers the delinquency value
    #[error("No {table} rule covers {value} {unit} overdue")]
    NoRuleFound {
        table: &'static str,
        value: u32,
        unit: &'static str,
    },

    /// The matched row carries no percentage for the classification
    #[error("{table} rule {row} has no percentage for classification {classification}")]
    PercentUnset {
        table: &'static str,
        row: String,
        classification: ClassificationRisk,
    },

    /// Table set failed shape or coverage validation
    #[error("Invalid regulatory table: {0}")]
    InvalidTable(String),

    /// Serialized table set could not be parsed
    #[error("Failed to parse regulatory tables: {0}")]
    TableParse(String),

    /// Requested table version is not registered
    #[error("Regulatory table version not found: {0}")]
    TableVersionNotFound(String),

    /// Configuration could not be loaded or is out of range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Contract snapshot violates a caller precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// Kernel arithmetic failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ProvisioningError {
    /// Creates an invalid table error
    pub fn invalid_table(message: impl Into<String>) -> Self {
        ProvisioningError::InvalidTable(message.into())
    }

    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ProvisioningError::Validation(message.into())
    }

    /// Returns true when the error means a regulatory figure was missing
    pub fn is_missing_rule(&self) -> bool {
        matches!(
            self,
            ProvisioningError::NoRuleFound { .. } | ProvisioningError::PercentUnset { .. }
        )
    }
}
