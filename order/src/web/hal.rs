// order/src/web/hal.rs

//! HAL+JSON representations of orders and the links between them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::models::{Address, LineItem, Money, Order, OrderStatus, Page, PageMetadata, PageRequest};
use crate::services::PizzaCatalog;

pub const HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
  pub href: String,
}

impl Link {
  pub fn new(href: impl Into<String>) -> Self {
    Self { href: href.into() }
  }
}

pub type Links = BTreeMap<&'static str, Link>;

/// Builds absolute URIs of this service's resources from its public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
  base_url: String,
}

impl LinkBuilder {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  pub fn root(&self) -> String {
    format!("{}/", self.base_url)
  }

  pub fn orders(&self) -> String {
    format!("{}/orders", self.base_url)
  }

  pub fn order(&self, id: i64) -> String {
    format!("{}/orders/{}", self.base_url, id)
  }

  pub fn orders_page(&self, number: u32, size: u32) -> String {
    format!("{}?page={}&size={}", self.orders(), number, size)
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResource {
  pub amount: i32,
  pub price: Money,
  #[serde(rename = "_links")]
  pub links: Links,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResource {
  pub status: OrderStatus,
  pub ordered_at: DateTime<Utc>,
  pub total_price: Money,
  pub estimated_time_of_delivery: Option<DateTime<Utc>>,
  pub comment: Option<String>,
  pub order_items: Vec<LineItemResource>,
  pub delivery_address: Address,
  #[serde(rename = "_links")]
  pub links: Links,
}

impl OrderResource {
  pub fn from_order(order: &Order, links: &LinkBuilder, catalog: &dyn PizzaCatalog) -> Result<Self> {
    let self_href = links.order(order.id);
    Ok(Self {
      status: order.status,
      ordered_at: order.ordered_at,
      total_price: order.total_price()?,
      estimated_time_of_delivery: order.estimated_time_of_delivery,
      comment: order.comment.clone(),
      order_items: order
        .order_items
        .iter()
        .map(|item| line_item_resource(item, catalog))
        .collect(),
      delivery_address: order.delivery_address.clone(),
      links: BTreeMap::from([("self", Link::new(self_href.clone())), ("order", Link::new(self_href))]),
    })
  }
}

fn line_item_resource(item: &LineItem, catalog: &dyn PizzaCatalog) -> LineItemResource {
  LineItemResource {
    amount: item.amount,
    price: item.price.clone(),
    links: BTreeMap::from([("pizza", Link::new(catalog.pizza_link(item.pizza_id)))]),
  }
}

#[derive(Debug, Serialize)]
pub struct EmbeddedOrders {
  pub orders: Vec<OrderResource>,
}

#[derive(Debug, Serialize)]
pub struct OrderCollectionResource {
  #[serde(rename = "_embedded")]
  pub embedded: EmbeddedOrders,
  #[serde(rename = "_links")]
  pub links: Links,
  pub page: PageMetadata,
}

impl OrderCollectionResource {
  pub fn from_page(page: Page<Order>, links: &LinkBuilder, catalog: &dyn PizzaCatalog) -> Result<Self> {
    let orders = page
      .content
      .iter()
      .map(|order| OrderResource::from_order(order, links, catalog))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self {
      embedded: EmbeddedOrders { orders },
      links: paging_links(&page, links),
      page: page.metadata(),
    })
  }
}

fn paging_links<T>(page: &Page<T>, links: &LinkBuilder) -> Links {
  let PageRequest { number, size } = page.request;
  let mut out = BTreeMap::from([
    ("self", Link::new(links.orders_page(number, size))),
    ("first", Link::new(links.orders_page(0, size))),
    ("last", Link::new(links.orders_page(page.last_page_number(), size))),
  ]);
  if page.has_previous() {
    // Past the end, "prev" points at the last real page.
    let prev = (number - 1).min(page.last_page_number());
    out.insert("prev", Link::new(links.orders_page(prev, size)));
  }
  if page.has_next() {
    out.insert("next", Link::new(links.orders_page(number + 1, size)));
  }
  out
}

/// Entry point of the API: links to the top-level collections.
#[derive(Debug, Serialize)]
pub struct RootResource {
  #[serde(rename = "_links")]
  pub links: Links,
}

impl RootResource {
  pub fn new(links: &LinkBuilder) -> Self {
    Self {
      links: BTreeMap::from([("self", Link::new(links.root())), ("orders", Link::new(links.orders()))]),
    }
  }
}
