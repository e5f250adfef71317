// order/src/web/mod.rs

pub mod hal;
pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;
