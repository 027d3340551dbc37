//! Core Kernel - Foundational types shared by the debt portfolio domains
//!
//! This crate provides the building blocks used by the provisioning engine:
//! - Money and rate types with precise decimal arithmetic
//! - Calendar helpers for delinquency ageing
//! - Strongly-typed identifiers

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError, Rate};
pub use temporal::{DateRange, TemporalError, days_overdue, whole_months};
pub use identifiers::{ContractId, ClientId};
pub use error::CoreError;
