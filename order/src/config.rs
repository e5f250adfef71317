// order/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Public base URL of this service, used to build hypermedia links.
  pub app_base_url: String,
  /// `None` selects the in-memory order repository.
  pub database_url: Option<String>,

  pub catalog_base_url: String,
  pub catalog_timeout: Duration,

  pub delivery_estimate: chrono::Duration,

  pub default_page_size: u32,
  pub max_page_size: u32,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };
    let parse_num = |var_name: &str, default: &str| -> Result<u64> {
      get_env(var_name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));
    let database_url = get_env("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

    let catalog_base_url = get_env("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());
    let catalog_timeout = Duration::from_millis(parse_num("CATALOG_TIMEOUT_MS", "2000")?);

    let delivery_minutes = parse_num("DELIVERY_ESTIMATE_MINUTES", "30")?;
    let delivery_estimate = i64::try_from(delivery_minutes)
      .ok()
      .and_then(chrono::Duration::try_minutes)
      .ok_or_else(|| AppError::Config(format!("DELIVERY_ESTIMATE_MINUTES out of range: {}", delivery_minutes)))?;

    let default_page_size = to_page_size("DEFAULT_PAGE_SIZE", parse_num("DEFAULT_PAGE_SIZE", "20")?)?;
    let max_page_size = to_page_size("MAX_PAGE_SIZE", parse_num("MAX_PAGE_SIZE", "100")?)?;
    if default_page_size > max_page_size {
      return Err(AppError::Config(format!(
        "DEFAULT_PAGE_SIZE ({}) exceeds MAX_PAGE_SIZE ({})",
        default_page_size, max_page_size
      )));
    }

    tracing::info!(
      database = if database_url.is_some() { "postgres" } else { "in-memory" },
      %catalog_base_url,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      app_base_url: trim_base(app_base_url),
      database_url,
      catalog_base_url: trim_base(catalog_base_url),
      catalog_timeout,
      delivery_estimate,
      default_page_size,
      max_page_size,
    })
  }

  /// Defaults for everything except the two base URLs. Used by tests and embedders.
  pub fn for_base_urls(app_base_url: impl Into<String>, catalog_base_url: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      app_base_url: trim_base(app_base_url.into()),
      database_url: None,
      catalog_base_url: trim_base(catalog_base_url.into()),
      catalog_timeout: Duration::from_secs(2),
      delivery_estimate: chrono::Duration::minutes(30),
      default_page_size: 20,
      max_page_size: 100,
    }
  }
}

fn to_page_size(var_name: &str, value: u64) -> Result<u32> {
  match u32::try_from(value) {
    Ok(size) if size > 0 => Ok(size),
    _ => Err(AppError::Config(format!("{} must be between 1 and {}", var_name, u32::MAX))),
  }
}

fn trim_base(url: String) -> String {
  url.trim_end_matches('/').to_string()
}
