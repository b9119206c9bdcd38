#![allow(dead_code)]

use heatmap_service::config::HeatmapConfig;
use heatmap_service::startup::Application;
use serde_json::Value;
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = HeatmapConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer health checks
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }

    pub async fn query(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/heatmap-data", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Ids of the hazards returned for `body`, in response order.
    pub async fn query_ids(&self, body: &Value) -> Vec<String> {
        let response: Value = self
            .query(body)
            .await
            .json()
            .await
            .expect("Failed to parse JSON");

        response["hazards"]
            .as_array()
            .expect("hazards is not an array")
            .iter()
            .map(|h| h["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
