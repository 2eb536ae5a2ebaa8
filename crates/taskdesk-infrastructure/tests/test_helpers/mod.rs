use std::sync::Arc;
use std::time::Duration;

use taskdesk_infrastructure::config::{ApiConfig, TimeoutConfig};
use taskdesk_infrastructure::http::{HttpClient, RetryConfig};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Client pointed at `<mock>/api` with fast retries.
pub fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = ApiConfig::new(&format!("{}/api", server.uri()))
        .expect("mock server URL is valid")
        .with_retry(RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 10,
            max_backoff_ms: 20,
            backoff_multiplier: 2.0,
        })
        .with_timeouts(TimeoutConfig::new().with_http_request(Duration::from_secs(5)));

    Arc::new(HttpClient::new(config).expect("client builds"))
}

#[allow(dead_code)]
pub fn checklist_payload() -> serde_json::Value {
    serde_json::json!([
        {"TaskID": 1, "Task": "Daily stand-up notes", "Freq": "D", "Planned": "13/03/2024", "Actual": null},
        {"TaskID": 2, "Task": "Weekly stock count", "Freq": "W", "Planned": "11/03/2024", "Actual": ""},
        {"TaskID": 3, "Task": "Monthly payroll check", "Freq": "M", "Planned": "2024-02-20", "Actual": null},
        {"TaskID": 4, "Task": "Daily backup", "Freq": "D", "Planned": "13/03/2024", "Actual": "13/03/2024 18:01:12"},
        {"TaskID": 5, "Task": "Broken row", "Freq": "D", "Planned": "", "Actual": null}
    ])
}
