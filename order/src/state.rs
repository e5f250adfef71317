// order/src/state.rs
use crate::config::AppConfig;
use crate::services::OrderService;
use crate::web::hal::LinkBuilder;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub order_service: OrderService,
  pub links: LinkBuilder,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, order_service: OrderService) -> Self {
    let links = LinkBuilder::new(config.app_base_url.clone());
    Self {
      config,
      order_service,
      links,
    }
  }
}
