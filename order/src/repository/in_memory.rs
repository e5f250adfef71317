// order/src/repository/in_memory.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::OrderRepository;
use crate::errors::Result;
use crate::models::{LineItem, NewOrder, Order, Page, PageRequest};

/// Process-local order store. Ids keep increasing across `delete_all`.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
  orders: RwLock<BTreeMap<i64, Order>>,
  order_seq: AtomicI64,
  line_item_seq: AtomicI64,
}

impl Default for InMemoryOrderRepository {
  fn default() -> Self {
    Self {
      orders: RwLock::new(BTreeMap::new()),
      order_seq: AtomicI64::new(1),
      line_item_seq: AtomicI64::new(1),
    }
  }
}

impl InMemoryOrderRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.orders.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.read().is_empty()
  }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
  async fn save(&self, order: NewOrder) -> Result<Order> {
    let id = self.order_seq.fetch_add(1, Ordering::SeqCst);
    let order_items = order
      .order_items
      .into_iter()
      .map(|item| LineItem {
        id: self.line_item_seq.fetch_add(1, Ordering::SeqCst),
        pizza_id: item.pizza_id,
        amount: item.amount,
        price: item.price,
      })
      .collect();
    let saved = Order {
      id,
      status: order.status,
      ordered_at: order.ordered_at,
      comment: order.comment,
      delivery_address: order.delivery_address,
      order_items,
      estimated_time_of_delivery: order.estimated_time_of_delivery,
    };
    self.orders.write().insert(id, saved.clone());
    debug!(order_id = id, "Stored order in memory.");
    Ok(saved)
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
    Ok(self.orders.read().get(&id).cloned())
  }

  async fn find_page(&self, page: PageRequest) -> Result<Page<Order>> {
    let guard = self.orders.read();
    let total = guard.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let content = guard.values().skip(offset).take(page.size as usize).cloned().collect();
    Ok(Page::new(content, page, total))
  }

  async fn delete_all(&self) -> Result<()> {
    let mut guard = self.orders.write();
    debug!(count = guard.len(), "Deleting all orders from memory.");
    guard.clear();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Address, Money, NewLineItem, OrderStatus};
  use chrono::Utc;

  fn new_order(comment: &str) -> NewOrder {
    NewOrder {
      status: OrderStatus::New,
      ordered_at: Utc::now(),
      comment: Some(comment.to_string()),
      delivery_address: Address {
        firstname: "Mathias".into(),
        lastname: "Dpunkt".into(),
        street: "Pilatuspool 2".into(),
        city: "Hamburg".into(),
        postal_code: "22222".into(),
        telephone: "+4908154711".into(),
        email: None,
      },
      order_items: vec![
        NewLineItem {
          pizza_id: 1,
          amount: 2,
          price: Money::parse("EUR 17.80").unwrap(),
        },
        NewLineItem {
          pizza_id: 2,
          amount: 1,
          price: Money::parse("EUR 7.50").unwrap(),
        },
      ],
      estimated_time_of_delivery: None,
    }
  }

  #[tokio::test]
  async fn save_assigns_ids_and_find_returns_the_order() {
    let repo = InMemoryOrderRepository::new();
    let first = repo.save(new_order("first")).await.unwrap();
    let second = repo.save(new_order("second")).await.unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.order_items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(second.order_items[0].id, 3);

    let found = repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(found, second);
    assert!(repo.find_by_id(99).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn pages_in_id_order() {
    let repo = InMemoryOrderRepository::new();
    for i in 0..5 {
      repo.save(new_order(&format!("order {}", i))).await.unwrap();
    }

    let page = repo.find_page(PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.content.iter().map(|o| o.id).collect::<Vec<_>>(), vec![3, 4]);

    let beyond = repo.find_page(PageRequest::new(10, 2)).await.unwrap();
    assert!(beyond.content.is_empty());
    assert_eq!(beyond.total_elements, 5);
  }

  #[tokio::test]
  async fn delete_all_empties_the_store_but_keeps_the_sequence() {
    let repo = InMemoryOrderRepository::new();
    repo.save(new_order("a")).await.unwrap();
    repo.delete_all().await.unwrap();
    assert!(repo.is_empty());

    let next = repo.save(new_order("b")).await.unwrap();
    assert_eq!(next.id, 2);
    assert_eq!(repo.len(), 1);
  }
}
