// order/src/repository/mod.rs

//! Persistence for the order aggregate.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{NewOrder, Order, Page, PageRequest};

pub use in_memory::InMemoryOrderRepository;
pub use postgres::PgOrderRepository;

/// Stores orders together with their line items as one unit.
#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Persists a new order, assigning ids to the order and each of its line items.
  async fn save(&self, order: NewOrder) -> Result<Order>;

  async fn find_by_id(&self, id: i64) -> Result<Option<Order>>;

  /// Orders in ascending id order.
  async fn find_page(&self, page: PageRequest) -> Result<Page<Order>>;

  async fn delete_all(&self) -> Result<()>;
}
