// order/src/services/mod.rs

pub mod event_publisher;
pub mod order_service;
pub mod pizza_client;

pub use event_publisher::{
  BroadcastOrderEventPublisher, CompositeOrderEventPublisher, LoggingOrderEventPublisher, OrderCreatedEvent,
  OrderEventPublisher,
};
pub use order_service::OrderService;
pub use pizza_client::{HttpPizzaCatalogClient, PizzaCatalog};
