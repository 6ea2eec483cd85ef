use mockito::{Mock, Server, ServerGuard};
use serde_json::Value;
use storage_api_client::{ClientConfig, StorageApiClient};

/// Initialize tracing for tests
fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// A mock storage API server and a client pointed at it
pub struct TestContext {
    pub server: ServerGuard,
    pub client: StorageApiClient,
}

impl TestContext {
    pub async fn new() -> Self {
        setup_test_env();

        let server = Server::new_async().await;
        let client = StorageApiClient::new(ClientConfig::new(server.url()))
            .expect("Failed to create storage API client");

        Self { server, client }
    }

    /// Registers a mock answering `method path` with a JSON body
    pub async fn mock_json(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: Value,
    ) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}

/// Client pointed at a port nothing listens on
pub fn unreachable_client() -> StorageApiClient {
    setup_test_env();
    StorageApiClient::new(ClientConfig::new("http://127.0.0.1:1"))
        .expect("Failed to create storage API client")
}

pub fn image_json(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "size": 1024,
        "content_type": "image/png",
        "updated": "2024-05-01T12:30:00+00:00",
        "public_url": format!("https://storage.googleapis.com/photos/{name}"),
    })
}
