// order/src/services/event_publisher.rs

//! Notifies interested parties that an order was placed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::Order;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreatedEvent {
  pub order: Order,
}

#[async_trait]
pub trait OrderEventPublisher: Send + Sync {
  async fn send_order_created_event(&self, order: &Order) -> Result<()>;
}

/// Fans events out to in-process subscribers over a bounded broadcast channel.
/// Slow subscribers lag and lose the oldest events.
#[derive(Debug, Clone)]
pub struct BroadcastOrderEventPublisher {
  sender: broadcast::Sender<OrderCreatedEvent>,
}

impl BroadcastOrderEventPublisher {
  pub fn new(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity.max(1));
    Self { sender }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<OrderCreatedEvent> {
    self.sender.subscribe()
  }
}

#[async_trait]
impl OrderEventPublisher for BroadcastOrderEventPublisher {
  #[instrument(name = "event_publisher::broadcast", skip(self, order), fields(order_id = order.id))]
  async fn send_order_created_event(&self, order: &Order) -> Result<()> {
    match self.sender.send(OrderCreatedEvent { order: order.clone() }) {
      Ok(receivers) => debug!(receivers, "Order created event broadcast."),
      // No subscriber yet.
      Err(_) => debug!("Order created event dropped: nobody is subscribed."),
    }
    Ok(())
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderCreatedLogLine<'a> {
  order_id: i64,
  status: &'a str,
  items: usize,
  total_price: String,
}

/// Writes each event as one structured log line.
#[derive(Debug, Clone, Default)]
pub struct LoggingOrderEventPublisher;

#[async_trait]
impl OrderEventPublisher for LoggingOrderEventPublisher {
  async fn send_order_created_event(&self, order: &Order) -> Result<()> {
    let line = OrderCreatedLogLine {
      order_id: order.id,
      status: order.status.as_str(),
      items: order.order_items.len(),
      total_price: order.total_price()?.to_string(),
    };
    let payload = serde_json::to_string(&line).map_err(|e| AppError::Publish(e.to_string()))?;
    info!(target: "order_events", event = "order_created", %payload);
    Ok(())
  }
}

/// Publishes every event to each inner publisher in turn. A failing publisher does not keep
/// the event from the others; the first failure is returned once all have been tried.
pub struct CompositeOrderEventPublisher {
  publishers: Vec<Arc<dyn OrderEventPublisher>>,
}

impl CompositeOrderEventPublisher {
  pub fn new(publishers: Vec<Arc<dyn OrderEventPublisher>>) -> Self {
    Self { publishers }
  }
}

#[async_trait]
impl OrderEventPublisher for CompositeOrderEventPublisher {
  async fn send_order_created_event(&self, order: &Order) -> Result<()> {
    let mut first_error = None;
    for publisher in &self.publishers {
      if let Err(e) = publisher.send_order_created_event(order).await {
        warn!(order_id = order.id, error = %e, "Order created event not delivered by one publisher.");
        first_error.get_or_insert(e);
      }
    }
    first_error.map_or(Ok(()), Err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Address, LineItem, Money, OrderStatus};
  use chrono::Utc;

  fn order() -> Order {
    Order {
      id: 7,
      status: OrderStatus::New,
      ordered_at: Utc::now(),
      comment: None,
      delivery_address: Address {
        firstname: "Mathias".into(),
        lastname: "Dpunkt".into(),
        street: "Pilatuspool 2".into(),
        city: "Hamburg".into(),
        postal_code: "22222".into(),
        telephone: "+4908154711".into(),
        email: None,
      },
      order_items: vec![LineItem {
        id: 1,
        pizza_id: 1,
        amount: 2,
        price: Money::parse("EUR 17.80").unwrap(),
      }],
      estimated_time_of_delivery: None,
    }
  }

  #[tokio::test]
  async fn subscribers_receive_the_created_order() {
    let publisher = BroadcastOrderEventPublisher::new(8);
    let mut receiver = publisher.subscribe();

    publisher.send_order_created_event(&order()).await.unwrap();

    let event = receiver.recv().await.unwrap();
    assert_eq!(event.order.id, 7);
  }

  #[tokio::test]
  async fn publishing_without_subscribers_succeeds() {
    let publisher = BroadcastOrderEventPublisher::new(8);
    assert!(publisher.send_order_created_event(&order()).await.is_ok());
  }

  #[tokio::test]
  async fn composite_reaches_every_publisher() {
    let broadcast = BroadcastOrderEventPublisher::new(8);
    let mut receiver = broadcast.subscribe();
    let publishers: Vec<Arc<dyn OrderEventPublisher>> =
      vec![Arc::new(LoggingOrderEventPublisher), Arc::new(broadcast.clone())];
    let composite = CompositeOrderEventPublisher::new(publishers);

    let sent = order();
    composite.send_order_created_event(&sent).await.unwrap();
    assert_eq!(receiver.recv().await.unwrap().order, sent);
  }

  struct FailingPublisher(&'static str);

  #[async_trait]
  impl OrderEventPublisher for FailingPublisher {
    async fn send_order_created_event(&self, _order: &Order) -> Result<()> {
      Err(AppError::Publish(self.0.to_string()))
    }
  }

  #[tokio::test]
  async fn composite_keeps_going_after_a_failure() {
    let broadcast = BroadcastOrderEventPublisher::new(8);
    let mut receiver = broadcast.subscribe();
    let publishers: Vec<Arc<dyn OrderEventPublisher>> = vec![
      Arc::new(FailingPublisher("first")),
      Arc::new(FailingPublisher("second")),
      Arc::new(broadcast.clone()),
    ];
    let composite = CompositeOrderEventPublisher::new(publishers);

    let sent = order();
    let err = composite.send_order_created_event(&sent).await.unwrap_err();
    assert!(matches!(err, AppError::Publish(ref msg) if msg == "first"));
    assert_eq!(receiver.recv().await.unwrap().order, sent);
  }
}
