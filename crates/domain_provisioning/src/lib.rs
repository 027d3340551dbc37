//! Loss Provisioning Domain
//!
//! This crate computes the regulatory loss provision and risk stage of a
//! debt contract, following the prudential rules for credit portfolios.
//!
//! # Architecture
//!
//! Every calculation is a pure function of a [`ContractSnapshot`], the
//! regulatory tables in force and the valuation date:
//! - **Rules**: regulatory mark, observation window, stage classifier
//! - **Tables**: expected-loss and incurred-loss lookup with versioned sets
//! - **Calculators**: tabular (basic) and PD x LGD (advanced) provisions
//! - **Advisory**: write-off eligibility
//!
//! # Rule Priority
//!
//! ```text
//! regulatory mark ──> 100%, stop
//!        │
//!        v
//! days <= 90 ? expected-loss table : incurred-loss table
//!        │
//!        v
//! observation window active ? max(percent, floor) : percent
//!        │
//!        v
//! advanced only: max(PD x LGD, tabular)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_provisioning::{ProvisioningEngine, TableRegistry, ContractSnapshot, ClassificationRisk};
//!
//! let engine = ProvisioningEngine::from_env()?;
//! let tables = TableRegistry::with_defaults().current()?;
//!
//! let snapshot = ContractSnapshot::from_due_date(outstanding, due_date, today, ClassificationRisk::C3);
//! let assessment = engine.assess(&snapshot, &tables, today)?;
//! ```

pub mod advanced;
pub mod basic;
pub mod calibration;
pub mod classification;
pub mod config;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod observation;
pub mod registry;
pub mod regulatory_mark;
pub mod snapshot;
pub mod stage;
pub mod tables;
pub mod write_off;

pub use advanced::{calculate_advanced, estimate_loss, recovery_rate, LossEstimate};
pub use basic::{calculate_basic, PERCENT_PRECISION};
pub use calibration::{DEFAULT_TABLES, REGULATION_VERSION};
pub use classification::{ClassificationRisk, RiskStage};
pub use config::ProvisioningConfig;
pub use engine::{ProvisionAssessment, ProvisioningEngine};
pub use error::ProvisioningError;
pub use lookup::{percent_for, resolve_expected_loss, resolve_incurred_loss};
pub use observation::{observation_status, ObservationStatus};
pub use registry::TableRegistry;
pub use regulatory_mark::{regulatory_mark, MarkOverride};
pub use snapshot::{ContractSnapshot, Methodology, ProvisionResult};
pub use stage::classify_stage;
pub use tables::{
    ClassificationPercents, ExpectedLossRule, IncurredLossRule, LossCriterion, RangeRule,
    RegulatoryTables,
};
pub use write_off::{write_off_advice, write_off_eligible, WriteOffAdvice};
