// order/src/models/pizza.rs

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use super::money::Money;
use crate::errors::{AppError, Result};

/// Pizza as described by the catalog service. The order service never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
  #[serde(default)]
  pub id: i64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
  pub price: Money,
}

/// Reference to a catalog pizza as posted by clients: either a link whose last
/// path segment is the id (`http://host/catalog/1`) or the bare id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PizzaRef(pub i64);

impl PizzaRef {
  pub fn id(self) -> i64 {
    self.0
  }

  pub fn parse(reference: &str) -> Result<Self> {
    let reference = reference.trim();
    if reference.is_empty() {
      return Err(AppError::Validation("pizza reference is empty".to_string()));
    }
    let candidate = match Url::parse(reference) {
      Ok(url) => url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("pizza link '{}' has no id segment", reference)))?,
      Err(_) => reference.to_string(),
    };
    let id = candidate
      .parse::<i64>()
      .map_err(|_| AppError::Validation(format!("'{}' does not reference a pizza id", reference)))?;
    Self::from_id(id)
  }

  pub fn from_id(id: i64) -> Result<Self> {
    if id <= 0 {
      return Err(AppError::Validation(format!("pizza id must be positive, got {}", id)));
    }
    Ok(Self(id))
  }
}

impl<'de> Deserialize<'de> for PizzaRef {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Id(i64),
      Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
      Raw::Id(id) => PizzaRef::from_id(id),
      Raw::Text(text) => PizzaRef::parse(&text),
    };
    parsed.map_err(serde::de::Error::custom)
  }
}
