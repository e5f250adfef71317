// order/src/web/handlers/root_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::AppState;
use crate::web::hal::{RootResource, HAL_JSON};

pub async fn index_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok()
    .content_type(HAL_JSON)
    .json(RootResource::new(&app_state.links))
}

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}
