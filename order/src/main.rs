// order/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use order_service::config::AppConfig;
use order_service::web::configure_app_routes;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting pizza order service...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let (app_state, events) = match order_service::bootstrap(app_config.clone()).await {
    Ok(wired) => wired,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize the order service.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  // Keeps a subscriber alive so order events show up at debug level.
  let mut receiver = events.subscribe();
  actix_rt::spawn(async move {
    loop {
      match receiver.recv().await {
        Ok(event) => tracing::debug!(order_id = event.order.id, "Observed order created event."),
        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
          tracing::warn!(skipped, "Order event observer lagged behind.")
        }
        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
      }
    }
  });

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
