// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use std::net::TcpListener;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use mockall::mock;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::Level;

use order_service::config::AppConfig;
use order_service::errors::Result as AppResult;
use order_service::models::{Address, Order, OrderItemRequest, OrderRequest, PizzaRef};
use order_service::repository::InMemoryOrderRepository;
use order_service::services::{HttpPizzaCatalogClient, OrderEventPublisher, OrderService};
use order_service::state::AppState;

pub const APP_BASE_URL: &str = "http://localhost";

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Event Publisher Mock ---
mock! {
  pub Publisher {}

  #[async_trait]
  impl OrderEventPublisher for Publisher {
    async fn send_order_created_event(&self, order: &Order) -> AppResult<()>;
  }
}

/// A publisher mock expecting exactly `times` events, recording each published order.
pub fn recording_publisher(times: usize) -> (MockPublisher, Arc<Mutex<Vec<Order>>>) {
  let published = Arc::new(Mutex::new(Vec::new()));
  let sink = published.clone();
  let mut publisher = MockPublisher::new();
  publisher
    .expect_send_order_created_event()
    .times(times)
    .returning(move |order| {
      sink.lock().push(order.clone());
      Ok(())
    });
  (publisher, published)
}

// --- Fake Catalog Service ---

/// Sample catalog answer for pizza 1.
pub fn pizza_salami() -> Value {
  json!({
    "name": "Pizza Salami",
    "description": "The classic - Pizza Salami",
    "imageUrl": "http://www.sardegna-rustica.de/images/pizza.jpg",
    "price": {"amount": 8.90, "currency": "EUR"}
  })
}

async fn catalog_pizza_handler(hits: web::Data<AtomicUsize>, path: web::Path<i64>) -> HttpResponse {
  hits.fetch_add(1, Ordering::SeqCst);
  match path.into_inner() {
    1 => HttpResponse::Ok().json(pizza_salami()),
    2 => HttpResponse::Ok().json(json!({
      "name": "Pizza Margherita",
      "description": "Tomato and mozzarella",
      "imageUrl": "http://www.sardegna-rustica.de/images/margherita.jpg",
      "price": {"amount": 7.50, "currency": "EUR"}
    })),
    3 => HttpResponse::Ok().json(json!({
      "name": "Pizza Zurigo",
      "price": {"amount": 21.00, "currency": "CHF"}
    })),
    4 => HttpResponse::Ok().content_type("application/json").body("{not json"),
    5 => HttpResponse::Ok().json(json!({
      "name": "Pizza Funghi",
      "price": {"amount": 7.00, "currency": "eur"}
    })),
    6 => HttpResponse::Ok().json(json!({
      "name": "Pizza d'Oro",
      "price": {"amount": 40000000000000000000.0, "currency": "EUR"}
    })),
    7 => HttpResponse::Ok().json(json!({
      "name": "Pizza Euro",
      "price": {"amount": 9.00, "currency": "EURO"}
    })),
    500 => HttpResponse::InternalServerError().finish(),
    _ => HttpResponse::NotFound().finish(),
  }
}

/// Real HTTP server on an ephemeral port that answers `GET /catalog/{id}`.
pub struct FakeCatalog {
  pub base_url: String,
  hits: web::Data<AtomicUsize>,
  handle: ServerHandle,
}

impl FakeCatalog {
  pub fn start() -> Self {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake catalog");
    let base_url = format!("http://{}", listener.local_addr().expect("fake catalog address"));
    let hits = web::Data::new(AtomicUsize::new(0));
    let server_hits = hits.clone();

    let server = HttpServer::new(move || {
      App::new()
        .app_data(server_hits.clone())
        .route("/catalog/{id}", web::get().to(catalog_pizza_handler))
    })
    .workers(1)
    .listen(listener)
    .expect("listen fake catalog")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    Self { base_url, hits, handle }
  }

  pub fn hits(&self) -> usize {
    self.hits.load(Ordering::SeqCst)
  }

  pub async fn stop(self) {
    self.handle.stop(false).await;
  }
}

// --- Application Wiring ---

pub struct TestApp {
  pub state: AppState,
  pub repository: Arc<InMemoryOrderRepository>,
  pub catalog: FakeCatalog,
}

impl TestApp {
  pub fn new(publisher: impl OrderEventPublisher + 'static) -> Self {
    setup_tracing();
    let catalog = FakeCatalog::start();
    let config = Arc::new(AppConfig::for_base_urls(APP_BASE_URL, catalog.base_url.clone()));
    let repository = Arc::new(InMemoryOrderRepository::new());
    let catalog_client = HttpPizzaCatalogClient::from_config(&config).expect("catalog client");
    let order_service = OrderService::new(
      repository.clone(),
      Arc::new(catalog_client),
      Arc::new(publisher),
      config.delivery_estimate,
    );
    Self {
      state: AppState::new(config, order_service),
      repository,
      catalog,
    }
  }

  pub fn data(&self) -> web::Data<AppState> {
    web::Data::new(self.state.clone())
  }

  pub fn service(&self) -> &OrderService {
    &self.state.order_service
  }
}

// --- Fixtures ---

pub fn hamburg_address() -> Address {
  Address {
    firstname: "Mathias".into(),
    lastname: "Dpunkt".into(),
    street: "Pilatuspool 2".into(),
    city: "Hamburg".into(),
    postal_code: "22222".into(),
    telephone: "+4908154711".into(),
    email: None,
  }
}

/// Two of pizza 1, as an existing order fixture.
pub fn existing_order_request() -> OrderRequest {
  OrderRequest {
    comment: Some("some comment".into()),
    delivery_address: Some(hamburg_address()),
    order_items: vec![OrderItemRequest {
      amount: 2,
      pizza: PizzaRef(1),
    }],
  }
}

/// JSON body of a client placing one pizza 1 by link.
pub fn order_input_json() -> Value {
  json!({
    "comment": "Some comment",
    "deliveryAddress": {
      "firstname": "Mathias",
      "lastname": "Dpunkt",
      "street": "Somestreet 1",
      "city": "Hamburg",
      "telephone": "+49404321343",
      "postalCode": "22305",
      "email": "your@email.address"
    },
    "orderItems": [
      {"amount": 1, "pizza": "http://localhost/com.epages.microservice.handson.catalog/1"}
    ]
  })
}
