//! Test helpers: build the router around an in-memory remote store.
//!
//! Run from workspace root: `cargo test -p mediagate-api`.

pub mod store;

use axum_test::TestServer;
use mediagate_api::setup::routes;
use mediagate_api::AppState;
use mediagate_core::Config;
use std::collections::HashMap;
use std::sync::Arc;

pub use store::InMemoryStore;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const FOREIGN_ORIGIN: &str = "https://evil.example.com";

/// Test configuration; `overrides` replace or add environment variables.
pub fn create_test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("CLOUDINARY_CLOUD_NAME", "test-cloud"),
        ("CLOUDINARY_API_KEY", "test-key"),
        ("CLOUDINARY_API_SECRET", "test-secret"),
        ("MAX_UPLOAD_SIZE_MB", "1"),
    ]);
    vars.extend(overrides.iter().copied());
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("Failed to build test config")
}

/// Test application: server plus the store double it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_store(Arc::new(InMemoryStore::new())).await
}

pub async fn setup_test_app_with_store(store: Arc<InMemoryStore>) -> TestApp {
    setup_test_app_with_config(store, create_test_config(&[])).await
}

pub async fn setup_test_app_with_config(store: Arc<InMemoryStore>, config: Config) -> TestApp {
    let state = AppState::new(config.clone(), store.clone());
    let router = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, store }
}
