#![allow(dead_code)]

use async_trait::async_trait;
use recruitment_client::config::Config;
use recruitment_client::error::Result;
use recruitment_client::services::gateway::{ApiRequest, RawResponse, Transport};
use recruitment_client::services::session_store::SessionStore;
use recruitment_client::AppState;
use reqwest::{Method, StatusCode};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const TOKEN: &str = "test-token";

#[derive(Clone)]
struct Scripted {
    status: StatusCode,
    body: String,
    delay: Duration,
}

/// Answers requests from per-route queues. The last scripted answer for a route repeats.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: StatusCode, body: JsonValue) -> &Self {
        self.on_delayed(method, path, Duration::ZERO, status, body)
    }

    pub fn on_delayed(
        &self,
        method: Method,
        path: &str,
        delay: Duration,
        status: StatusCode,
        body: JsonValue,
    ) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted {
                status,
                body: body.to_string(),
                delay,
            });
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let key = (request.method.clone(), request.path.clone());
        self.requests.lock().unwrap().push(request);

        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            routes.get_mut(&key).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match scripted {
            Some(answer) => {
                if !answer.delay.is_zero() {
                    tokio::time::sleep(answer.delay).await;
                }
                Ok(RawResponse::new(answer.status, answer.body))
            }
            None => Ok(RawResponse::new(
                StatusCode::NOT_FOUND,
                r#"{"message":"No scripted route"}"#,
            )),
        }
    }
}

pub struct Harness {
    pub state: AppState,
    pub transport: Arc<FakeTransport>,
}

pub fn config() -> Config {
    let mut config = Config::with_base_url(Url::parse("http://api.test").expect("url"));
    config.request_timeout = Duration::from_secs(2);
    config
}

/// App state over a fake transport, already signed in.
pub fn signed_in() -> Harness {
    let session = SessionStore::new();
    session.set(TOKEN);
    build(session)
}

pub fn signed_out() -> Harness {
    build(SessionStore::new())
}

fn build(session: SessionStore) -> Harness {
    let transport = FakeTransport::new();
    let state = AppState::with_session(&config(), transport.clone(), session);
    Harness { state, transport }
}

pub fn candidate(id: i64, name: &str, domain: &str, position: &str) -> JsonValue {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "domain": domain,
        "position": position,
        "exp_years": 3,
        "skills": "[\"Rust\",\"SQL\"]",
        "uploaded_at": "2025-03-01T10:00:00"
    })
}

pub fn job(id: i64, title: &str) -> JsonValue {
    serde_json::json!({
        "id": id,
        "title": title,
        "field": "tech",
        "position": title,
        "requiredSkills": ["Rust"],
        "minExpYears": 2,
        "description": "Build things",
        "matchResults": []
    })
}

pub fn envelope(data: JsonValue) -> JsonValue {
    serde_json::json!({"success": true, "message": "OK", "data": data, "timestamp": "2025-03-01T10:00:00Z"})
}
