// order/src/web/handlers/mod.rs

pub mod order_handlers;
pub mod root_handlers;
