//! Test server harness for E2E testing
//!
//! Provides `TestPostServer` for spawning real Post service instances in tests.

use metrics_exporter_prometheus::PrometheusBuilder;
use post_service::config::Config;
use post_service::repositories::{MemoryPostStore, PostStore};
use post_service::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// API key accepted by every test server.
pub const TEST_API_KEY: &str = "ELITE";

/// Test harness for spawning the Post service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ping_e2e() -> Result<()> {
///     let server = TestPostServer::spawn().await?;
///
///     let response = reqwest::Client::new()
///         .get(format!("{}/ping", server.url()))
///         .header("SPITFIRE-API-KEY", TEST_API_KEY)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestPostServer {
    addr: SocketAddr,
    store: Arc<dyn PostStore>,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestPostServer {
    /// Spawn a server backed by a fresh in-memory store.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(MemoryPostStore::new())).await
    }

    /// Spawn a server backed by the given store.
    pub async fn spawn_with_store(store: Arc<dyn PostStore>) -> Result<Self, anyhow::Error> {
        Self::spawn_with(store, HashMap::new()).await
    }

    /// Spawn a server with a store and extra configuration variables.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Accept `TEST_API_KEY` unless `API_KEYS` is overridden
    /// - Start the HTTP server in the background
    pub async fn spawn_with(
        store: Arc<dyn PostStore>,
        overrides: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("API_KEYS".to_string(), TEST_API_KEY.to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(AppState {
            store: store.clone(),
            config: config.clone(),
        });

        // A recorder that is not installed globally, so many servers can
        // coexist in one test binary.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the store the server writes to.
    pub fn store(&self) -> &Arc<dyn PostStore> {
        &self.store
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestPostServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
