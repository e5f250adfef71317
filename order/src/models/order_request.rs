// order/src/models/order_request.rs

use serde::Deserialize;

use super::{Address, PizzaRef};
use crate::errors::{AppError, Result};

/// Body of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
  #[serde(default)]
  pub comment: Option<String>,
  #[serde(default)]
  pub delivery_address: Option<Address>,
  #[serde(default)]
  pub order_items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
  pub amount: i32,
  pub pizza: PizzaRef,
}

impl OrderRequest {
  /// Checks the shape of the request and hands back the delivery address.
  pub fn validate(&self) -> Result<&Address> {
    let address = self
      .delivery_address
      .as_ref()
      .ok_or_else(|| AppError::Validation("deliveryAddress is required".to_string()))?;
    address.validate()?;

    if self.order_items.is_empty() {
      return Err(AppError::Validation("orderItems must contain at least one item".to_string()));
    }
    if let Some((index, item)) = self.order_items.iter().enumerate().find(|(_, item)| item.amount < 1) {
      return Err(AppError::Validation(format!(
        "orderItems[{}].amount must be at least 1, got {}",
        index, item.amount
      )));
    }
    Ok(address)
  }
}
