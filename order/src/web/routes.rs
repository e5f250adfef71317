// order/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{order_handlers, root_handlers};

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  let message = match &err {
    JsonPayloadError::ContentType => "Expected a JSON request body (Content-Type: application/json).".to_string(),
    JsonPayloadError::Deserialize(e) => format!("Malformed order: {}", e),
    other => format!("Unreadable request body: {}", other),
  };
  AppError::Validation(message).into()
}

/// Registers every route of the service on the Actix `App`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/", web::get().to(root_handlers::index_handler))
    .route("/health", web::get().to(root_handlers::health_check_handler))
    .service(
      web::resource("/orders")
        .route(web::get().to(order_handlers::list_orders_handler))
        .route(web::post().to(order_handlers::create_order_handler)),
    )
    .service(web::resource("/orders/{order_id}").route(web::get().to(order_handlers::get_order_handler)));
}
