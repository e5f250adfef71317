// order/src/services/pizza_client.rs

//! Client for the catalog service that owns pizza details and prices.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Pizza;

#[async_trait]
pub trait PizzaCatalog: Send + Sync {
  async fn get_pizza(&self, id: i64) -> Result<Pizza>;

  /// Link to the pizza resource, rendered into order line items.
  fn pizza_link(&self, id: i64) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpPizzaCatalogClient {
  http: reqwest::Client,
  base_url: String,
}

impl HttpPizzaCatalogClient {
  pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
    Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  pub fn from_config(config: &AppConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.catalog_timeout)
      .build()
      .map_err(|e| AppError::Config(format!("Cannot build catalog HTTP client: {}", e)))?;
    Ok(Self::new(config.catalog_base_url.clone(), http))
  }
}

#[async_trait]
impl PizzaCatalog for HttpPizzaCatalogClient {
  #[instrument(name = "pizza_client::get_pizza", skip(self), err(Display))]
  async fn get_pizza(&self, id: i64) -> Result<Pizza> {
    let url = self.pizza_link(id);
    debug!(%url, "Resolving pizza from catalog.");

    let response = self.http.get(&url).header(reqwest::header::ACCEPT, "application/json").send().await?;
    match response.status() {
      status if status.is_success() => {
        let mut pizza: Pizza = response
          .json()
          .await
          .map_err(|e| AppError::Catalog(format!("Unreadable pizza {} from catalog: {}", id, e)))?;
        pizza.id = id;
        Ok(pizza)
      }
      StatusCode::NOT_FOUND => {
        warn!(pizza_id = id, "Catalog does not know the pizza.");
        Err(AppError::Validation(format!("unknown pizza {}", id)))
      }
      status => Err(AppError::Catalog(format!("Catalog answered {} for pizza {}", status, id))),
    }
  }

  fn pizza_link(&self, id: i64) -> String {
    format!("{}/catalog/{}", self.base_url, id)
  }
}
