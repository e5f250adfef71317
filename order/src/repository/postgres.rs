// order/src/repository/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, error, info, instrument};

use super::OrderRepository;
use crate::errors::{AppError, Result};
use crate::models::{Address, LineItem, Money, NewOrder, Order, OrderStatus, Page, PageRequest};

const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS orders (
    id BIGSERIAL PRIMARY KEY,
    status TEXT NOT NULL,
    ordered_at TIMESTAMPTZ NOT NULL,
    comment TEXT,
    firstname TEXT NOT NULL,
    lastname TEXT NOT NULL,
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    postal_code TEXT NOT NULL,
    telephone TEXT NOT NULL,
    email TEXT,
    estimated_time_of_delivery TIMESTAMPTZ
  )
  "#,
  r#"
  CREATE TABLE IF NOT EXISTS order_line_items (
    id BIGSERIAL PRIMARY KEY,
    order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    pizza_id BIGINT NOT NULL,
    amount INTEGER NOT NULL CHECK (amount > 0),
    price_currency TEXT NOT NULL,
    price_amount NUMERIC NOT NULL
  )
  "#,
  "ALTER TABLE order_line_items ALTER COLUMN price_currency TYPE TEXT",
  "ALTER TABLE order_line_items ALTER COLUMN price_amount TYPE NUMERIC",
  "CREATE INDEX IF NOT EXISTS order_line_items_order_id_idx ON order_line_items (order_id, position)",
];

const ORDER_COLUMNS: &str = "id, status, ordered_at, comment, firstname, lastname, street, city, postal_code, \
                             telephone, email, estimated_time_of_delivery";

const LINE_ITEM_COLUMNS: &str = "id, order_id, pizza_id, amount, price_currency, price_amount";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: i64,
  status: String,
  ordered_at: DateTime<Utc>,
  comment: Option<String>,
  firstname: String,
  lastname: String,
  street: String,
  city: String,
  postal_code: String,
  telephone: String,
  email: Option<String>,
  estimated_time_of_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
  id: i64,
  order_id: i64,
  pizza_id: i64,
  amount: i32,
  price_currency: String,
  price_amount: Decimal,
}

impl LineItemRow {
  fn into_line_item(self) -> LineItem {
    LineItem {
      id: self.id,
      pizza_id: self.pizza_id,
      amount: self.amount,
      price: Money::new(self.price_currency.trim(), self.price_amount),
    }
  }
}

impl OrderRow {
  fn into_order(self, order_items: Vec<LineItem>) -> Result<Order> {
    Ok(Order {
      id: self.id,
      status: self.status.parse::<OrderStatus>()?,
      ordered_at: self.ordered_at,
      comment: self.comment,
      delivery_address: Address {
        firstname: self.firstname,
        lastname: self.lastname,
        street: self.street,
        city: self.city,
        postal_code: self.postal_code,
        telephone: self.telephone,
        email: self.email,
      },
      order_items,
      estimated_time_of_delivery: self.estimated_time_of_delivery,
    })
  }
}

/// Order repository backed by two Postgres tables: `orders` and `order_line_items`.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
  pool: PgPool,
}

impl PgOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPool::connect(database_url).await.map_err(|e| {
      error!(error = %e, "Failed to connect to the database.");
      AppError::Sqlx(e)
    })?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  #[instrument(name = "pg_order_repository::initialize_schema", skip(self), err(Display))]
  pub async fn initialize_schema(&self) -> Result<()> {
    for statement in SCHEMA {
      sqlx::query(statement).execute(&self.pool).await?;
    }
    info!("Order schema is ready.");
    Ok(())
  }

  async fn load_line_items(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<LineItem>>> {
    if order_ids.is_empty() {
      return Ok(HashMap::new());
    }
    let rows: Vec<LineItemRow> = sqlx::query_as(&format!(
      "SELECT {} FROM order_line_items WHERE order_id = ANY($1) ORDER BY order_id, position",
      LINE_ITEM_COLUMNS
    ))
    .bind(order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<LineItem>> = HashMap::new();
    for row in rows {
      by_order.entry(row.order_id).or_default().push(row.into_line_item());
    }
    Ok(by_order)
  }

  /// Returns the rows as stored, so callers see the same values a later read does.
  async fn insert_line_items(tx: &mut Transaction<'_, Postgres>, order_id: i64, order: &NewOrder) -> Result<Vec<LineItem>> {
    let mut saved = Vec::with_capacity(order.order_items.len());
    for (position, item) in order.order_items.iter().enumerate() {
      let row: LineItemRow = sqlx::query_as(&format!(
        "INSERT INTO order_line_items (order_id, position, pizza_id, amount, price_currency, price_amount) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        LINE_ITEM_COLUMNS
      ))
      .bind(order_id)
      .bind(position as i32)
      .bind(item.pizza_id)
      .bind(item.amount)
      .bind(&item.price.currency)
      .bind(item.price.amount)
      .fetch_one(&mut **tx)
      .await?;
      saved.push(row.into_line_item());
    }
    Ok(saved)
  }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
  #[instrument(name = "pg_order_repository::save", skip(self, order), err(Display))]
  async fn save(&self, order: NewOrder) -> Result<Order> {
    let mut tx = self.pool.begin().await?;

    let row: OrderRow = sqlx::query_as(&format!(
      "INSERT INTO orders (status, ordered_at, comment, firstname, lastname, street, city, postal_code, telephone, \
       email, estimated_time_of_delivery) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(order.status.as_str())
    .bind(order.ordered_at)
    .bind(&order.comment)
    .bind(&order.delivery_address.firstname)
    .bind(&order.delivery_address.lastname)
    .bind(&order.delivery_address.street)
    .bind(&order.delivery_address.city)
    .bind(&order.delivery_address.postal_code)
    .bind(&order.delivery_address.telephone)
    .bind(&order.delivery_address.email)
    .bind(order.estimated_time_of_delivery)
    .fetch_one(&mut *tx)
    .await?;

    let order_items = Self::insert_line_items(&mut tx, row.id, &order).await?;
    let saved = row.into_order(order_items)?;
    tx.commit().await?;
    debug!(order_id = saved.id, items = saved.order_items.len(), "Order persisted.");
    Ok(saved)
  }

  #[instrument(name = "pg_order_repository::find_by_id", skip(self), err(Display))]
  async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    let Some(row) = row else {
      return Ok(None);
    };
    let mut items = self.load_line_items(&[id]).await?;
    row.into_order(items.remove(&id).unwrap_or_default()).map(Some)
  }

  #[instrument(name = "pg_order_repository::find_page", skip(self), err(Display))]
  async fn find_page(&self, page: PageRequest) -> Result<Page<Order>> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(&self.pool).await?;
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders ORDER BY id ASC LIMIT $1 OFFSET $2",
      ORDER_COLUMNS
    ))
    .bind(i64::from(page.size))
    .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
    .fetch_all(&self.pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut items = self.load_line_items(&ids).await?;
    let content = rows
      .into_iter()
      .map(|row| {
        let order_items = items.remove(&row.id).unwrap_or_default();
        row.into_order(order_items)
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(content, page, total.max(0) as u64))
  }

  #[instrument(name = "pg_order_repository::delete_all", skip(self), err(Display))]
  async fn delete_all(&self) -> Result<()> {
    let result = sqlx::query("DELETE FROM orders").execute(&self.pool).await?;
    info!(deleted = result.rows_affected(), "Deleted all orders.");
    Ok(())
  }
}
