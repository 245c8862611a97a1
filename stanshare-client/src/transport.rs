//! HTTP transport abstraction
//!
//! The client never talks to reqwest directly; it hands an [`ApiRequest`] to
//! an [`HttpTransport`]. Production uses [`ReqwestTransport`], tests use
//! [`MockTransport`] with canned responses.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// HTTP methods used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// A fully resolved request against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub request_id: Uuid,
    pub method: Method,
    pub base_url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, base_url: &str, path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method,
            base_url: base_url.to_string(),
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Key used by [`MockTransport`]: `"GET /api/health"`
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Absolute URL with the percent-encoded query string
    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

/// Raw response: status code and buffered body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response with a JSON body
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests against the backend.
///
/// Implementations report network failures as [`ClientError::Transport`] and
/// return every received response, successful or not, as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync + Clone + 'static {
    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production transport backed by a shared `reqwest::Client`.
///
/// No timeout is set: a hung call only stalls its own caller.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(request_id = %request.request_id, method = %request.method, path = %request.path))]
    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let url = request.url();
        tracing::debug!(url = %url, "Executing API request");

        let mut req = self
            .client
            .request(request.method.into(), &url)
            .header("X-Request-Id", request.request_id.to_string());

        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "API request failed");
            ClientError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::info!(status, response_len = body.len(), "API request completed");

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

enum MockResponse {
    Immediate(Result<HttpResponse>),
    Delayed(Duration, Result<HttpResponse>),
}

/// Mock transport with per-route FIFO response queues.
///
/// ```ignore
/// let mock = MockTransport::new();
/// mock.add_json("GET /api/health", serde_json::json!({"status": "ok"}));
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `"{METHOD} {path}"`
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(MockResponse::Immediate(response));
    }

    /// Queue a 200 JSON response
    pub fn add_json(&self, key: &str, value: serde_json::Value) {
        self.add_response(key, Ok(HttpResponse::json(&value)));
    }

    /// Queue a response that completes only after `delay`
    pub fn add_delayed(&self, key: &str, delay: Duration, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(MockResponse::Delayed(delay, response));
    }

    /// All requests seen so far
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of requests made to one route key
    pub fn calls_to(&self, key: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.key() == key).count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        self.calls.lock().push(request.clone());

        let key = request.key();
        let next = self
            .responses
            .lock()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match next {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                response
            }
            None => Err(ClientError::Transport(format!(
                "no mock response configured for {key}"
            ))),
        }
    }
}
