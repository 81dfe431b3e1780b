//! In-process stubs shared by the unit tests.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{AuthMode, GeminiConfig, GenerationParams};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub action: String,
    pub query_key: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// A fake `generateContent` endpoint with a fixed reply
pub struct StubUpstream {
    status: StatusCode,
    body: String,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubUpstream {
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("stub received no requests")
    }
}

async fn stub_handler(
    State(stub): State<Arc<StubUpstream>>,
    Path(action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    stub.requests.lock().unwrap().push(RecordedRequest {
        action,
        query_key: query.get("key").cloned(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let delay = *stub.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    (stub.status, stub.body.clone())
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_gemini_stub(status: StatusCode, body: impl Into<String>) -> (String, Arc<StubUpstream>) {
    let stub = Arc::new(StubUpstream {
        status,
        body: body.into(),
        delay: Mutex::new(None),
        requests: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/models/:action", post(stub_handler))
        .with_state(stub.clone());

    (serve(router).await, stub)
}

/// Wrap completion text in a `generateContent` response envelope.
pub fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub fn gemini_config(api_base: &str, auth_mode: AuthMode) -> GeminiConfig {
    GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        api_base: api_base.to_string(),
        auth_mode,
        generation: GenerationParams::default(),
        timeout: Duration::from_secs(10),
    }
}

pub const SAMPLE_ANALYSIS: &str = r#"{
  "ingredients": [
    {"name": "L-Citrulline", "quantity": "6g", "effects": ["Increases nitric oxide production", "Improves blood flow to working muscles"]},
    {"name": "Caffeine Anhydrous", "quantity": "350mg", "effects": ["Stimulates the central nervous system"]}
  ],
  "qualities": {"pump": 82, "energy": 88, "focus": 61, "recovery": 24, "endurance": 57}
}"#;
