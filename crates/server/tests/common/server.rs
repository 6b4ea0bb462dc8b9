//! Server test utilities.

use exhibit_core::config::AppConfig;
use exhibit_extract::{ExtensionClassifier, ImageParser};
use exhibit_server::{AppState, create_router};
use exhibit_stores::StoreRegistry;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with no store backends and the degraded-mode
    /// extension classifier.
    pub async fn new() -> Self {
        Self::build(StoreRegistry::new(), Arc::new(ExtensionClassifier), |_| {}).await
    }

    /// Create a test server with the given store registry.
    pub async fn with_stores(stores: StoreRegistry) -> Self {
        Self::build(stores, Arc::new(ExtensionClassifier), |_| {}).await
    }

    /// Create a test server with a custom image parser.
    pub async fn with_parser(parser: Arc<dyn ImageParser>) -> Self {
        Self::build(StoreRegistry::new(), parser, |_| {}).await
    }

    /// Create a test server with full control over stores, parser, and config.
    pub async fn build<F>(stores: StoreRegistry, parser: Arc<dyn ImageParser>, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        // Safe to call from every test; registration is idempotent.
        exhibit_server::metrics::register_metrics();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let mut config = AppConfig::for_testing(temp_dir.path());
        modifier(&mut config);

        let state = AppState::new(config, stores, parser);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }
}
