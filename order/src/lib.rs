// order/src/lib.rs

//! Pizza order service.
//!
//! Orders are accepted over a HAL+JSON HTTP API. The pizzas they reference are priced
//! through the catalog service, and every placed order is announced to the
//! registered [`services::OrderEventPublisher`].

pub mod config;
pub mod errors;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod web;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::repository::{InMemoryOrderRepository, OrderRepository, PgOrderRepository};
use crate::services::{
  BroadcastOrderEventPublisher, CompositeOrderEventPublisher, HttpPizzaCatalogClient, LoggingOrderEventPublisher,
  OrderEventPublisher, OrderService,
};
use crate::state::AppState;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Production wiring: Postgres when `DATABASE_URL` is set, memory otherwise; the HTTP
/// catalog client; and a publisher that logs and broadcasts each event.
pub async fn bootstrap(config: Arc<AppConfig>) -> Result<(AppState, BroadcastOrderEventPublisher)> {
  let repository: Arc<dyn OrderRepository> = match &config.database_url {
    Some(url) => {
      let repo = PgOrderRepository::connect(url).await?;
      repo.initialize_schema().await?;
      Arc::new(repo)
    }
    None => {
      warn!("DATABASE_URL is not set; orders are kept in memory and lost on restart.");
      Arc::new(InMemoryOrderRepository::new())
    }
  };

  let catalog = Arc::new(HttpPizzaCatalogClient::from_config(&config)?);
  let broadcast = BroadcastOrderEventPublisher::new(EVENT_CHANNEL_CAPACITY);
  let publishers: Vec<Arc<dyn OrderEventPublisher>> =
    vec![Arc::new(LoggingOrderEventPublisher), Arc::new(broadcast.clone())];
  let publisher = Arc::new(CompositeOrderEventPublisher::new(publishers));

  let order_service = OrderService::new(repository, catalog, publisher, config.delivery_estimate);
  info!("Order service wired.");
  Ok((AppState::new(config, order_service), broadcast))
}
