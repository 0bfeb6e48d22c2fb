//! Amount type for handling monetary values that may carry thousands separators.
//!
//! This module provides the `Amount` type which wraps an `f64` and handles parsing values that may
//! or may not include commas, e.g. `45,000` from the sales feed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::num::ParseFloatError;
use std::str::FromStr;

/// Represents a monetary amount.
///
/// Parsing strips thousands separators. Displaying always renders two decimal places with
/// thousands separators, e.g. `45,000.00`. Use [`Amount::with_symbol`] to prefix a currency
/// symbol.
///
/// # Examples
///
/// ```
/// # use sales_report::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("45,000").unwrap();
/// assert_eq!(amount.value(), 45000.0);
/// assert_eq!(amount.to_string(), "45,000.00");
/// assert_eq!(amount.with_symbol("$"), "$45,000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount {
    value: f64,
}

impl Amount {
    pub const ZERO: Amount = Amount { value: 0.0 };

    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    /// Returns the underlying value.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Renders the amount with a leading currency symbol, e.g. `-₹1,250.50`.
    pub fn with_symbol(&self, symbol: &str) -> String {
        if self.value < 0.0 {
            format!("-{symbol}{}", Amount::new(-self.value))
        } else {
            format!("{symbol}{self}")
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Clone, PartialEq, Eq)]
pub enum AmountError {
    Parse(ParseFloatError),
    NotFinite(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Parse(e) => Display::fmt(e, f),
            AmountError::NotFinite(s) => write!(f, "'{s}' is not a finite number"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            AmountError::NotFinite(_) => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Remove commas (thousand separators)
        let without_commas = s.trim().replace(',', "");
        let value = f64::from_str(&without_commas).map_err(AmountError::Parse)?;
        if !value.is_finite() {
            return Err(AmountError::NotFinite(without_commas));
        }
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.value < 0.0 {
            write!(f, "-{}", format_num::format_num!(",.2", -self.value))
        } else {
            write!(f, "{}", format_num::format_num!(",.2", self.value))
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Amount::new(value))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
