//! Money types with precise decimal arithmetic
//!
//! Outstanding balances, collateral values and provision amounts are all
//! carried as [`Money`]. Input amounts are held with 4 decimal places; a
//! provision derived from them with [`Money::percent_of`] is exact and only
//! rounded when displayed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Internal precision for monetary amounts
pub const AMOUNT_PRECISION: u32 = 4;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian real, the reporting currency of the provisioning regulation
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Returns the number of decimal places used when presenting amounts
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "€",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value, rounded to internal precision
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(AMOUNT_PRECISION),
            currency,
        }
    }

    /// Creates a Money value in the regulation's reporting currency
    pub fn brl(amount: Decimal) -> Self {
        Self::new(amount, Currency::BRL)
    }

    /// Creates Money from an integer amount in minor units (centavos, cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Returns `percent`% of this amount (`amount * percent / 100`)
    ///
    /// The result is not rounded to [`AMOUNT_PRECISION`], so
    /// `percent_of(56.1)` of 0.01 is exactly 0.00561.
    pub fn percent_of(&self, percent: Decimal) -> Result<Money, MoneyError> {
        let amount = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|fraction| self.amount.checked_mul(fraction))
            .ok_or(MoneyError::Overflow)?;
        Ok(Self {
            amount,
            currency: self.currency,
        })
    }

    /// Returns `self / other` as a plain ratio
    ///
    /// Used for collateral coverage, where both sides share a currency.
    pub fn ratio_to(&self, other: &Money) -> Result<Decimal, MoneyError> {
        self.ensure_same_currency(other)?;
        if other.amount.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.amount
            .checked_div(other.amount)
            .ok_or(MoneyError::Overflow)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

/// A percentage rate (provision percent, probability of default, recovery)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate {
    /// The rate as a percentage (e.g., 56.1 for 56.1%)
    percent: Decimal,
}

impl Rate {
    /// One hundred percent
    pub const FULL: Rate = Rate { percent: Decimal::ONE_HUNDRED };

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percent: Decimal) -> Self {
        Self { percent }
    }

    /// Creates a rate from a fraction (e.g., 0.05 for 5%)
    pub fn from_fraction(fraction: Decimal) -> Self {
        Self {
            percent: fraction * dec!(100),
        }
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.percent
    }

    /// Returns the rate as a fraction of one
    pub fn as_fraction(&self) -> Decimal {
        self.percent / dec!(100)
    }

    /// Clamps the rate into `[min, max]`
    pub fn clamp(self, min: Rate, max: Rate) -> Rate {
        Rate {
            percent: self.percent.clamp(min.percent, max.percent),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent.normalize())
    }
}
