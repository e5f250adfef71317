// order/src/models/mod.rs

//! Data structures for the order aggregate and the values it references.

pub mod address;
pub mod money;
pub mod order;
pub mod order_request;
pub mod page;
pub mod pizza;

pub use address::Address;
pub use money::Money;
pub use order::{LineItem, NewLineItem, NewOrder, Order, OrderStatus};
pub use order_request::{OrderItemRequest, OrderRequest};
pub use page::{Page, PageMetadata, PageRequest};
pub use pizza::{Pizza, PizzaRef};
