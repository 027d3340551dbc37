//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! provisioning engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for amounts, dates and tables
//! - `builders`: Builder patterns for contract snapshots
//! - `assertions`: Custom assertion helpers for provision results
//! - `generators`: Property-based test data generators
//! - `logging`: Test log subscriber

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use logging::init_test_tracing;
