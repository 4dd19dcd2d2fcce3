//! Amount type for handling non-negative monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. User input may be written with
//! or without a currency sign and thousands separators. Serialized amounts are plain JSON
//! numbers.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Represents a non-negative monetary amount. Whether it adds to or subtracts from a balance is
/// decided by the transaction type, never by the sign of the amount.
///
/// # Examples
///
/// ```
/// # use quarter::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,250.50").unwrap();
/// let b = Amount::from_str("1250.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,250.50");
/// assert!(Amount::from_str("-3").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates an `Amount`, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The largest amount that can be entered: fifteen significant digits, two of them cents.
    pub fn max() -> Amount {
        Amount(Decimal::new(999_999_999_999_999, MAX_DECIMAL_PLACES))
    }

    /// Checks that the amount fits in cents and within [`Amount::max`]. Such amounts are stored
    /// as JSON numbers and read back unchanged.
    pub fn check_storable(&self) -> Result<(), AmountError> {
        if self.0.normalize().scale() > MAX_DECIMAL_PLACES {
            return Err(AmountError::TooPrecise(self.0.to_string()));
        }
        if *self > Self::max() {
            return Err(AmountError::TooLarge(self.0.to_string()));
        }
        Ok(())
    }
}

const MAX_DECIMAL_PLACES: u32 = 2;

/// An error that can occur when parsing or constructing an `Amount`.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("an amount is required")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("the amount cannot be negative, got {0}")]
    Negative(String),
    #[error("the amount can have at most two decimal places, got {0}")]
    TooPrecise(String),
    #[error("the amount cannot be more than 9,999,999,999,999.99, got {0}")]
    TooLarge(String),
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let without_symbol = trimmed.strip_prefix(DEFAULT_CURRENCY_SYMBOL).unwrap_or(trimmed);
        let without_commas = without_symbol.replace(',', "");

        let value = Decimal::from_str(without_commas.trim())
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0, DEFAULT_CURRENCY_SYMBOL))
    }
}

/// Formats `value` with the currency `symbol`, thousands separators and two decimal places,
/// e.g. `-$1,234.50`.
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let num = value.abs().round_dp(2).to_f64().unwrap_or_default();
    format!("{sign}{symbol}{}", format_num::format_num!(",.2", num))
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Parsing the decimal text rounds correctly, `to_f64` may not.
        match self.0.normalize().to_string().parse::<f64>() {
            Ok(n) if n.is_finite() => serializer.serialize_f64(n),
            _ => Err(serde::ser::Error::custom(format!(
                "the amount {} cannot be represented as a number",
                self.0
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Accepts JSON numbers and, for leniency with hand-edited files, numeric strings.
struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        // The shortest text that reads back as `v` is the number that was written.
        let value = Decimal::from_str(&v.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(v))
            .ok_or_else(|| E::custom(format!("{v} is not a finite amount")))?;
        Amount::new(value.normalize()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}
