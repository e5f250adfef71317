// order/src/web/handlers/order_handlers.rs

use actix_web::{http::header, web, FromRequest, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{OrderRequest, PageRequest};
use crate::state::AppState;
use crate::web::hal::{OrderCollectionResource, OrderResource, HAL_JSON};

// --- Paging Extractor ---

#[derive(Deserialize, Debug, Default)]
struct PageQuery {
  page: Option<u32>,
  size: Option<u32>,
}

/// `?page=&size=` resolved against the configured default and maximum page size.
#[derive(Debug, Clone, Copy)]
pub struct Paging(pub PageRequest);

impl FromRequest for Paging {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    futures_util::future::ready(resolve_paging(req))
  }
}

fn resolve_paging(req: &HttpRequest) -> Result<Paging, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
  let query = web::Query::<PageQuery>::from_query(req.query_string())
    .map_err(|e| AppError::Validation(format!("Invalid paging parameters: {}", e)))?
    .into_inner();

  let size = match query.size {
    Some(0) => return Err(AppError::Validation("size must be at least 1".to_string())),
    Some(size) => size.min(state.config.max_page_size),
    None => state.config.default_page_size,
  };
  Ok(Paging(PageRequest::new(query.page.unwrap_or(0), size)))
}

// --- Handler Implementation ---

#[instrument(
  name = "handler::create_order",
  skip(app_state, req_payload),
  fields(items = req_payload.order_items.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.order_service.create(req_payload.into_inner()).await?;
  let location = app_state.links.order(order.id);
  info!(order_id = order.id, %location, "Order placed.");

  let body = OrderResource::from_order(&order, &app_state.links, app_state.order_service.catalog())?;
  Ok(
    HttpResponse::Created()
      .insert_header((header::LOCATION, location))
      .content_type(HAL_JSON)
      .json(body),
  )
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.order_service.get(order_id).await?;
  let body = OrderResource::from_order(&order, &app_state.links, app_state.order_service.catalog())?;
  Ok(HttpResponse::Ok().content_type(HAL_JSON).json(body))
}

#[instrument(name = "handler::list_orders", skip(app_state, paging), fields(page = paging.0.number, size = paging.0.size))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, paging: Paging) -> Result<HttpResponse, AppError> {
  let page = app_state.order_service.get_all(paging.0).await?;
  if page.content.is_empty() && page.total_elements > 0 {
    warn!(total = page.total_elements, "Requested page lies beyond the last page.");
  }
  let body = OrderCollectionResource::from_page(page, &app_state.links, app_state.order_service.catalog())?;
  Ok(HttpResponse::Ok().content_type(HAL_JSON).json(body))
}
