// order/src/models/order.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, Money};
use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
  New,
  Baking,
  ReadyForDelivery,
  Delivering,
  Delivered,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::New => "NEW",
      OrderStatus::Baking => "BAKING",
      OrderStatus::ReadyForDelivery => "READY_FOR_DELIVERY",
      OrderStatus::Delivering => "DELIVERING",
      OrderStatus::Delivered => "DELIVERED",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "NEW" => Ok(OrderStatus::New),
      "BAKING" => Ok(OrderStatus::Baking),
      "READY_FOR_DELIVERY" => Ok(OrderStatus::ReadyForDelivery),
      "DELIVERING" => Ok(OrderStatus::Delivering),
      "DELIVERED" => Ok(OrderStatus::Delivered),
      other => Err(AppError::Internal(format!("Unknown order status '{}'", other))),
    }
  }
}

/// A priced line of an order. `price` is the line total (unit price times amount).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
  pub id: i64,
  pub pizza_id: i64,
  pub amount: i32,
  pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
  pub pizza_id: i64,
  pub amount: i32,
  pub price: Money,
}

/// Order aggregate before the repository has assigned identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub status: OrderStatus,
  pub ordered_at: DateTime<Utc>,
  pub comment: Option<String>,
  pub delivery_address: Address,
  pub order_items: Vec<NewLineItem>,
  pub estimated_time_of_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
  pub id: i64,
  pub status: OrderStatus,
  pub ordered_at: DateTime<Utc>,
  pub comment: Option<String>,
  pub delivery_address: Address,
  pub order_items: Vec<LineItem>,
  pub estimated_time_of_delivery: Option<DateTime<Utc>>,
}

impl Order {
  /// Sum of the line prices. Fails when lines carry different currencies or the order is empty.
  pub fn total_price(&self) -> Result<Money> {
    total_of(self.order_items.iter().map(|item| &item.price))
  }
}

impl NewOrder {
  pub fn total_price(&self) -> Result<Money> {
    total_of(self.order_items.iter().map(|item| &item.price))
  }
}

fn total_of<'a>(mut prices: impl Iterator<Item = &'a Money>) -> Result<Money> {
  let first = prices
    .next()
    .ok_or_else(|| AppError::Validation("An order needs at least one item".to_string()))?;
  prices.try_fold(first.clone(), |acc, price| acc.checked_add(price))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  fn address() -> Address {
    Address {
      firstname: "Mathias".into(),
      lastname: "Dpunkt".into(),
      street: "Pilatuspool 2".into(),
      city: "Hamburg".into(),
      postal_code: "22222".into(),
      telephone: "+4908154711".into(),
      email: None,
    }
  }

  fn order_with(prices: &[&str]) -> Order {
    Order {
      id: 1,
      status: OrderStatus::New,
      ordered_at: Utc::now(),
      comment: None,
      delivery_address: address(),
      order_items: prices
        .iter()
        .enumerate()
        .map(|(i, p)| LineItem {
          id: i as i64 + 1,
          pizza_id: 1,
          amount: 1,
          price: Money::parse(p).unwrap(),
        })
        .collect(),
      estimated_time_of_delivery: None,
    }
  }

  #[test]
  fn total_sums_line_prices() {
    let total = order_with(&["EUR 17.80", "EUR 1.23"]).total_price().unwrap();
    assert_eq!(total, Money::new("EUR", Decimal::new(1903, 2)));
  }

  #[test]
  fn total_of_mixed_currencies_fails() {
    assert!(order_with(&["EUR 1.00", "CHF 1.00"]).total_price().is_err());
  }

  #[test]
  fn total_of_empty_order_fails() {
    assert!(order_with(&[]).total_price().is_err());
  }

  #[test]
  fn status_round_trips_through_its_name() {
    for status in [
      OrderStatus::New,
      OrderStatus::Baking,
      OrderStatus::ReadyForDelivery,
      OrderStatus::Delivering,
      OrderStatus::Delivered,
    ] {
      assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
      assert_eq!(serde_json::to_value(status).unwrap(), serde_json::json!(status.as_str()));
    }
    assert!("SHIPPED".parse::<OrderStatus>().is_err());
  }
}
