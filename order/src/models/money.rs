// order/src/models/money.rs

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{AppError, Result};

/// A monetary amount in a single ISO currency, e.g. `EUR 8.90`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
  #[serde(deserialize_with = "deserialize_currency")]
  pub currency: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub amount: Decimal,
}

impl Money {
  pub fn new(currency: impl Into<String>, amount: Decimal) -> Self {
    Self {
      currency: currency.into().to_ascii_uppercase(),
      amount,
    }
  }

  /// Parses the `"<CUR> <amount>"` form, e.g. `"EUR 1.23"`.
  pub fn parse(text: &str) -> Result<Self> {
    let mut parts = text.split_whitespace();
    let (Some(currency), Some(amount), None) = (parts.next(), parts.next(), parts.next()) else {
      return Err(AppError::Validation(format!("Expected '<CURRENCY> <amount>', got '{}'", text)));
    };
    let currency = currency_code(currency)?;
    let amount = Decimal::from_str(amount)
      .map_err(|e| AppError::Validation(format!("Invalid amount '{}': {}", amount, e)))?;
    Ok(Self { currency, amount })
  }

  pub fn times(&self, factor: i32) -> Result<Self> {
    let amount = self
      .amount
      .checked_mul(Decimal::from(factor))
      .ok_or_else(|| AppError::Validation(format!("{} times {} is out of range", self, factor)))?;
    Ok(Self {
      currency: self.currency.clone(),
      amount,
    })
  }

  pub fn checked_add(&self, other: &Money) -> Result<Self> {
    if self.currency != other.currency {
      return Err(AppError::Validation(format!(
        "Cannot add {} to {}: currencies differ",
        other, self
      )));
    }
    let amount = self
      .amount
      .checked_add(other.amount)
      .ok_or_else(|| AppError::Validation(format!("{} plus {} is out of range", self, other)))?;
    Ok(Self {
      currency: self.currency.clone(),
      amount,
    })
  }
}

/// Three ASCII letters, normalized to upper case.
fn currency_code(code: &str) -> Result<String> {
  if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
    return Err(AppError::Validation(format!("Invalid currency code '{}'", code)));
  }
  Ok(code.to_ascii_uppercase())
}

fn deserialize_currency<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let code = String::deserialize(deserializer)?;
  currency_code(code.trim()).map_err(serde::de::Error::custom)
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.currency, self.amount)
  }
}
