//! Shared helpers for vault client tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use vizivault_client::{VaultClient, VaultConfig};
use wiremock::MockServer;

pub const API_KEY: &str = "12345";
pub const ENCRYPTION_KEY: &str = "test-encryption-key";
pub const DECRYPTION_KEY: &str = "test-decryption-key";

/// Routes client logs to the test harness. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn mock_config(server: &MockServer) -> VaultConfig {
    VaultConfig::new(server.uri(), API_KEY)
        .with_encryption_key(ENCRYPTION_KEY)
        .with_decryption_key(DECRYPTION_KEY)
}

/// Starts a mock vault and a client pointed at it.
pub async fn mock_vault() -> (MockServer, VaultClient) {
    init_tracing();
    let server = MockServer::start().await;
    let client = VaultClient::new(mock_config(&server)).unwrap();
    (server, client)
}

/// `"METHOD /path"` for every request the mock received, in arrival order.
pub async fn request_log(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

/// A server-side attribute record as the vault returns it.
pub fn remote_attribute(id: i64, user_id: &str, key: &str, value: Value) -> Value {
    json!({
        "dataPointId": id,
        "userId": user_id,
        "attribute": key,
        "sensitivity": null,
        "value": value,
        "regulations": [],
        "tags": [],
        "createdDate": "2024-05-01T10:00:00Z",
        "modifiedDate": "2024-05-01T10:00:00Z"
    })
}
