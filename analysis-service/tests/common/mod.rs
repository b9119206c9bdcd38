#![allow(dead_code)]

use analysis_service::config::{AnalysisConfig, GatewayConfig};
use analysis_service::startup::Application;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-gateway-key";
pub const TEST_MODEL: &str = "google/gemini-2.5-flash";

/// Chat-completion envelope carrying `content` as the first choice.
pub fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

struct GatewayState {
    status: StatusCode,
    body: String,
    hits: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

/// In-process stand-in for the AI gateway.
pub struct MockGateway {
    pub url: String,
    state: Arc<GatewayState>,
}

impl MockGateway {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let state = Arc::new(GatewayState {
            status,
            body: body.into(),
            hits: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock gateway");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        MockGateway {
            url: format!("http://127.0.0.1:{}/v1/chat/completions", port),
            state,
        }
    }

    pub async fn replying(content: &str) -> Self {
        Self::start(StatusCode::OK, completion(content)).await
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(body);
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(gateway_url: &str, api_key: Option<&str>) -> Self {
        let config = AnalysisConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
            gateway: GatewayConfig {
                url: gateway_url.to_string(),
                api_key: api_key.map(|k| Secret::new(k.to_string())),
                model: TEST_MODEL.to_string(),
                timeout_secs: Some(10),
            },
            max_request_bytes: 1024 * 1024,
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

    pub async fn analyze(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/analyze-photo", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
