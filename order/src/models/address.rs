// order/src/models/address.rs

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub firstname: String,
  pub lastname: String,
  pub street: String,
  pub city: String,
  pub postal_code: String,
  pub telephone: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl Address {
  /// Every field except `email` must carry a non-blank value.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("firstname", &self.firstname),
      ("lastname", &self.lastname),
      ("street", &self.street),
      ("city", &self.city),
      ("postalCode", &self.postal_code),
      ("telephone", &self.telephone),
    ];
    let missing: Vec<&str> = required
      .iter()
      .filter(|(_, value)| value.trim().is_empty())
      .map(|(name, _)| *name)
      .collect();
    if !missing.is_empty() {
      return Err(AppError::Validation(format!(
        "deliveryAddress is missing: {}",
        missing.join(", ")
      )));
    }
    if let Some(email) = &self.email {
      if !email.contains('@') {
        return Err(AppError::Validation(format!("deliveryAddress.email is not an address: '{}'", email)));
      }
    }
    Ok(())
  }
}
