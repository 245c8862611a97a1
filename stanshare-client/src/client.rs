//! StanShareAI backend API client
//!
//! One method per backend endpoint:
//! - Health check
//! - Extraction start, status and polling
//! - Fund and annotation listings
//! - Quality metrics and stats
//! - Scheduler control
//! - Delta detection, report and stale data
//!
//! Every call is made exactly once; retries are the caller's business.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::endpoints::{ApiVersion, Endpoint, EndpointMap};
use crate::error::{ClientError, Result};
use crate::poll::PollHandle;
use crate::transport::{ApiRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::{
    ExtractionRequest, ExtractionStarted, ExtractionStatus, FormType, HealthStatus, Page, PageQuery,
};

/// StanShareAI API client.
///
/// Cheap to clone; clones share the last batch id and the poll registry.
#[derive(Clone)]
pub struct StanShareClient<T: HttpTransport = ReqwestTransport> {
    base_url: String,
    endpoints: Arc<EndpointMap>,
    transport: T,
    poll_interval: Duration,
    last_batch_id: Arc<Mutex<Option<String>>>,
    polls: Arc<Mutex<Vec<CancellationToken>>>,
}

impl StanShareClient<ReqwestTransport> {
    /// Create a client using the production reqwest transport
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> StanShareClient<T> {
    /// Create a client over any transport
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.resolved_base_url(),
            endpoints: Arc::new(EndpointMap::for_version(config.api_version)),
            transport,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            last_batch_id: Arc::new(Mutex::new(None)),
            polls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Point the client at another backend
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> ApiVersion {
        self.endpoints.version()
    }

    pub fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Batch id recorded by the last successful `start_extraction`
    pub fn last_batch_id(&self) -> Option<String> {
        self.last_batch_id.lock().clone()
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    /// Check API health
    pub async fn check_health(&self) -> Result<HealthStatus> {
        self.call(Endpoint::Health, None, Vec::new(), None).await
    }

    // ------------------------------------------------------------------
    // Extraction
    // ------------------------------------------------------------------

    /// Start a new extraction.
    ///
    /// `fund_count` is clamped into the endpoint table's range before sending.
    pub async fn start_extraction(
        &self,
        fund_count: u32,
        form_type: FormType,
        batch_name: Option<&str>,
    ) -> Result<ExtractionStarted> {
        self.start(&ExtractionRequest {
            fund_count,
            form_type,
            batch_name: batch_name.map(String::from),
        })
        .await
    }

    /// Start a new extraction from a request value
    pub async fn start(&self, request: &ExtractionRequest) -> Result<ExtractionStarted> {
        let fund_count = self.endpoints.clamp_fund_count(request.fund_count);
        if fund_count != request.fund_count {
            tracing::debug!(
                requested = request.fund_count,
                sent = fund_count,
                "Clamped fund count into accepted range"
            );
        }

        let keys = self.endpoints.extract_keys();
        let mut body = Map::new();
        body.insert(keys.fund_count.to_string(), Value::from(fund_count));
        body.insert(keys.form_type.to_string(), Value::from(request.form_type.as_str()));
        if let Some(name) = request.batch_name.as_deref().filter(|n| !n.is_empty()) {
            body.insert(keys.batch_name.to_string(), Value::from(name));
        }

        let started: ExtractionStarted = self
            .call(Endpoint::StartExtraction, None, Vec::new(), Some(Value::Object(body)))
            .await?;

        tracing::info!(
            batch_id = %started.batch_id,
            fund_count,
            form_type = %request.form_type,
            "Extraction started"
        );
        *self.last_batch_id.lock() = Some(started.batch_id.clone());

        Ok(started)
    }

    /// Get extraction status
    pub async fn get_extraction_status(&self, batch_id: &str) -> Result<ExtractionStatus> {
        self.call(Endpoint::ExtractionStatus, Some(batch_id), Vec::new(), None)
            .await
    }

    /// Poll extraction status until the batch completes or fails.
    ///
    /// `interval` defaults to the configured poll interval and must be
    /// non-zero. The returned handle resolves once; see [`PollHandle::wait`].
    pub fn poll_extraction_status<F>(
        &self,
        batch_id: &str,
        on_progress: F,
        interval: Option<Duration>,
    ) -> Result<PollHandle>
    where
        F: FnMut(&ExtractionStatus) + Send + 'static,
    {
        let interval = interval.unwrap_or(self.poll_interval);
        if interval.is_zero() {
            return Err(ClientError::Config("poll interval must be positive".into()));
        }

        let token = CancellationToken::new();
        {
            let mut polls = self.polls.lock();
            polls.retain(|t| !t.is_cancelled());
            polls.push(token.clone());
        }

        Ok(PollHandle::start(
            self.clone(),
            batch_id.to_string(),
            interval,
            token,
            on_progress,
        ))
    }

    /// Stop every poll started from this client or its clones.
    ///
    /// Returns how many were still active. Safe to call at any time.
    pub fn stop_polling(&self) -> usize {
        let tokens: Vec<_> = self.polls.lock().drain(..).collect();
        let active = tokens.iter().filter(|t| !t.is_cancelled()).count();
        for token in tokens {
            token.cancel();
        }
        if active > 0 {
            tracing::debug!(active, "Stopped polling");
        }
        active
    }

    /// Number of polls still scheduled
    pub fn active_polls(&self) -> usize {
        self.polls.lock().iter().filter(|t| !t.is_cancelled()).count()
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Get a page of funds, optionally filtered by fund type
    pub async fn list_funds(&self, query: &PageQuery) -> Result<Page<Value>> {
        self.list(Endpoint::Funds, query, "fund_type").await
    }

    /// Get a page of annotations, optionally filtered by batch id
    pub async fn list_annotations(&self, query: &PageQuery) -> Result<Page<Value>> {
        self.list(Endpoint::Annotations, query, "batch_id").await
    }

    async fn list(&self, endpoint: Endpoint, query: &PageQuery, filter_key: &str) -> Result<Page<Value>> {
        let mut params = vec![
            ("limit".to_string(), query.limit.to_string()),
            ("offset".to_string(), query.offset.to_string()),
        ];
        if let Some(filter) = &query.filter {
            params.push((filter_key.to_string(), filter.clone()));
        }

        let body: Value = self.call(endpoint, None, params, None).await?;
        Ok(Page::from_body(body, query))
    }

    // ------------------------------------------------------------------
    // Quality
    // ------------------------------------------------------------------

    /// Get quality metrics, for one batch or overall.
    ///
    /// `Ok(None)` means the backend has not computed them yet (404).
    pub async fn get_quality_metrics(&self, batch_id: Option<&str>) -> Result<Option<Value>> {
        match self.call(Endpoint::QualityMetrics, batch_id, Vec::new(), None).await {
            Ok(metrics) => Ok(Some(metrics)),
            Err(ClientError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get quality statistics
    pub async fn get_quality_stats(&self) -> Result<Value> {
        self.call(Endpoint::QualityStats, None, Vec::new(), None).await
    }

    // ------------------------------------------------------------------
    // Scheduler
    // ------------------------------------------------------------------

    pub async fn get_scheduler_status(&self) -> Result<Value> {
        self.call(Endpoint::SchedulerStatus, None, Vec::new(), None).await
    }

    pub async fn start_scheduler(&self) -> Result<Value> {
        self.call(Endpoint::SchedulerStart, None, Vec::new(), None).await
    }

    pub async fn stop_scheduler(&self) -> Result<Value> {
        self.call(Endpoint::SchedulerStop, None, Vec::new(), None).await
    }

    pub async fn get_scheduler_jobs(&self) -> Result<Value> {
        self.call(Endpoint::SchedulerJobs, None, Vec::new(), None).await
    }

    // ------------------------------------------------------------------
    // Delta detection
    // ------------------------------------------------------------------

    /// Run delta detection
    pub async fn run_delta_detection(&self) -> Result<Value> {
        self.call(Endpoint::DeltaDetect, None, Vec::new(), None).await
    }

    pub async fn get_delta_report(&self) -> Result<Value> {
        self.call(Endpoint::DeltaReport, None, Vec::new(), None).await
    }

    pub async fn get_stale_data(&self) -> Result<Value> {
        self.call(Endpoint::StaleData, None, Vec::new(), None).await
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Resolve, send and decode one call
    async fn call<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        batch_id: Option<&str>,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<R> {
        let response = self.send(endpoint, batch_id, query, body).await?;
        Self::handle_response(&response)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        batch_id: Option<&str>,
        mut query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<HttpResponse> {
        let route = self.endpoints.resolve(endpoint, batch_id)?;
        query.extend(route.query);

        let mut request = ApiRequest::new(route.method, &self.base_url, route.path).with_query(query);
        if let Some(body) = body {
            request = request.with_body(body);
        }

        tracing::debug!(
            %endpoint,
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            "Calling backend"
        );

        self.transport.execute(&request).await
    }

    /// Map non-2xx to `Http`, then decode the JSON body
    fn handle_response<R: DeserializeOwned>(response: &HttpResponse) -> Result<R> {
        if !response.is_success() {
            return Err(ClientError::from_response(response.status, &response.body));
        }
        serde_json::from_str(&response.body).map_err(ClientError::from)
    }
}
