// order/src/services/order_service.rs

//! Order use cases: placing, fetching and listing orders.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{debug, error, info, instrument, warn};

use super::event_publisher::OrderEventPublisher;
use super::pizza_client::PizzaCatalog;
use crate::errors::{AppError, Result};
use crate::models::{NewLineItem, NewOrder, Order, OrderRequest, OrderStatus, Page, PageRequest};
use crate::repository::OrderRepository;

#[derive(Clone)]
pub struct OrderService {
  repository: Arc<dyn OrderRepository>,
  catalog: Arc<dyn PizzaCatalog>,
  publisher: Arc<dyn OrderEventPublisher>,
  delivery_estimate: chrono::Duration,
}

impl OrderService {
  pub fn new(
    repository: Arc<dyn OrderRepository>,
    catalog: Arc<dyn PizzaCatalog>,
    publisher: Arc<dyn OrderEventPublisher>,
    delivery_estimate: chrono::Duration,
  ) -> Self {
    Self {
      repository,
      catalog,
      publisher,
      delivery_estimate,
    }
  }

  pub fn catalog(&self) -> &dyn PizzaCatalog {
    self.catalog.as_ref()
  }

  /// Prices the requested items against the catalog, stores the order and announces it.
  ///
  /// Nothing is stored or published when validation or a catalog lookup fails. A failed
  /// publication is logged and does not undo the stored order.
  #[instrument(
    name = "order_service::create",
    skip(self, request),
    fields(items = request.order_items.len()),
    err(Display)
  )]
  pub async fn create(&self, request: OrderRequest) -> Result<Order> {
    let delivery_address = request.validate()?.clone();

    let mut order_items = Vec::with_capacity(request.order_items.len());
    for item in &request.order_items {
      let pizza = self.catalog.get_pizza(item.pizza.id()).await?;
      debug!(pizza_id = pizza.id, name = %pizza.name, unit_price = %pizza.price, "Pizza resolved.");
      order_items.push(NewLineItem {
        pizza_id: pizza.id,
        amount: item.amount,
        price: pizza.price.times(item.amount)?,
      });
    }

    // Postgres keeps microseconds.
    let ordered_at = Utc::now().trunc_subsecs(6);
    let new_order = NewOrder {
      status: OrderStatus::New,
      ordered_at,
      comment: request.comment.filter(|c| !c.trim().is_empty()),
      delivery_address,
      order_items,
      estimated_time_of_delivery: Some(ordered_at + self.delivery_estimate),
    };
    // Mixed catalog currencies cannot be totalled; refuse before storing.
    let total = new_order.total_price()?;

    let order = self.repository.save(new_order).await?;
    info!(order_id = order.id, total_price = %total, "Order created.");

    if let Err(e) = self.publisher.send_order_created_event(&order).await {
      error!(order_id = order.id, error = %e, "Failed to publish order created event.");
    }
    Ok(order)
  }

  #[instrument(name = "order_service::get", skip(self), err(Display))]
  pub async fn get(&self, id: i64) -> Result<Order> {
    match self.repository.find_by_id(id).await? {
      Some(order) => Ok(order),
      None => {
        warn!(order_id = id, "Order not found.");
        Err(AppError::NotFound(format!("Order with ID {} not found.", id)))
      }
    }
  }

  #[instrument(name = "order_service::get_all", skip(self), err(Display))]
  pub async fn get_all(&self, page: PageRequest) -> Result<Page<Order>> {
    let result = self.repository.find_page(page).await?;
    debug!(
      returned = result.content.len(),
      total = result.total_elements,
      "Orders page loaded."
    );
    Ok(result)
  }

  #[instrument(name = "order_service::delete_all", skip(self), err(Display))]
  pub async fn delete_all(&self) -> Result<()> {
    self.repository.delete_all().await
  }
}
