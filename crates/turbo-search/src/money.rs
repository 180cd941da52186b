//! Money type for catalog prices.
//!
//! Amounts are integers in the currency's minor unit so that price
//! comparisons in filters and sorts are exact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported catalog currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    COP,
    USD,
    EUR,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "COP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::COP => "COP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::COP => "$",
            Currency::USD => "US$",
            Currency::EUR => "\u{20ac}",
            Currency::MXN => "MX$",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        2
    }}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value in a single currency.
///
/// Ordering compares `amount_cents` first; the catalog is single-currency so
/// mixed-currency comparisons never arise in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the minor unit.
    ///
    /// ```
    /// use turbo_search::money::{Currency, Money};
    /// let price = Money::from_decimal(60000.0, Currency::COP);
    /// assert_eq!(price.amount_cents, 6_000_000);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format for display, e.g. "$60000.00".
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), self.to_decimal())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Serialize `Option<Money>` as a plain decimal number (or `null`).
pub(crate) mod decimal_opt {
    use super::Money;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(money) => serializer.serialize_f64(money.to_decimal()),
            None => serializer.serialize_none(),
        }
    }
}
