//! Endpoint tables per backend API version
//!
//! Two generations of the backend expose the same operations under different
//! paths, body keys and fund-count limits. Instead of two clients, the client
//! resolves every operation through an [`EndpointMap`] selected by
//! [`ApiVersion`]. `Current` is the canonical contract; `Legacy` is a
//! compatibility shim with a smaller surface.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::transport::Method;

/// Backend API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    Current,
    Legacy,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Current => write!(f, "current"),
            ApiVersion::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "current" | "v2" => Ok(ApiVersion::Current),
            "legacy" | "v1" => Ok(ApiVersion::Legacy),
            other => Err(ClientError::Config(format!("unknown API version '{other}'"))),
        }
    }
}

/// Client operations that map to a backend route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    StartExtraction,
    ExtractionStatus,
    Funds,
    Annotations,
    QualityMetrics,
    QualityStats,
    SchedulerStatus,
    SchedulerStart,
    SchedulerStop,
    SchedulerJobs,
    DeltaDetect,
    DeltaReport,
    StaleData,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Health => "health",
            Endpoint::StartExtraction => "start_extraction",
            Endpoint::ExtractionStatus => "extraction_status",
            Endpoint::Funds => "funds",
            Endpoint::Annotations => "annotations",
            Endpoint::QualityMetrics => "quality_metrics",
            Endpoint::QualityStats => "quality_stats",
            Endpoint::SchedulerStatus => "scheduler_status",
            Endpoint::SchedulerStart => "scheduler_start",
            Endpoint::SchedulerStop => "scheduler_stop",
            Endpoint::SchedulerJobs => "scheduler_jobs",
            Endpoint::DeltaDetect => "delta_detect",
            Endpoint::DeltaReport => "delta_report",
            Endpoint::StaleData => "stale_data",
        };
        f.write_str(name)
    }
}

/// Where a batch identifier goes when a route takes one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchIdPlacement {
    None,
    /// `?{name}=<batch_id>`, omitted when no id is given
    Query(&'static str),
    /// Substituted for `{batch_id}` in the path; required
    Path,
}

/// A single backend route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub batch_id: BatchIdPlacement,
}

impl Route {
    const fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            batch_id: BatchIdPlacement::None,
        }
    }

    const fn post(path: &'static str) -> Self {
        Self {
            method: Method::Post,
            path,
            batch_id: BatchIdPlacement::None,
        }
    }

    const fn with_batch_id(mut self, placement: BatchIdPlacement) -> Self {
        self.batch_id = placement;
        self
    }
}

/// JSON keys of the start-extraction body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractBodyKeys {
    pub fund_count: &'static str,
    pub form_type: &'static str,
    pub batch_name: &'static str,
}

/// A route with its batch id resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Mapping from client operation to backend route for one API version
#[derive(Debug, Clone)]
pub struct EndpointMap {
    version: ApiVersion,
    routes: HashMap<Endpoint, Route>,
    fund_count: RangeInclusive<u32>,
    default_base_url: &'static str,
    extract_keys: ExtractBodyKeys,
}

impl EndpointMap {
    /// Build the table for an API version
    pub fn for_version(version: ApiVersion) -> Self {
        match version {
            ApiVersion::Current => Self::current(),
            ApiVersion::Legacy => Self::legacy(),
        }
    }

    fn current() -> Self {
        let routes = HashMap::from([
            (Endpoint::Health, Route::get("/api/health")),
            (Endpoint::StartExtraction, Route::post("/api/extract")),
            (
                Endpoint::ExtractionStatus,
                Route::get("/api/extract/status").with_batch_id(BatchIdPlacement::Query("batch_id")),
            ),
            (Endpoint::Funds, Route::get("/api/funds")),
            (Endpoint::Annotations, Route::get("/api/annotations")),
            (
                Endpoint::QualityMetrics,
                Route::get("/api/quality/metrics").with_batch_id(BatchIdPlacement::Query("batch_id")),
            ),
            (Endpoint::QualityStats, Route::get("/api/quality/stats")),
            (Endpoint::SchedulerStatus, Route::get("/api/scheduler/status")),
            (Endpoint::SchedulerStart, Route::post("/api/scheduler/start")),
            (Endpoint::SchedulerStop, Route::post("/api/scheduler/stop")),
            (Endpoint::SchedulerJobs, Route::get("/api/scheduler/jobs")),
            (Endpoint::DeltaDetect, Route::post("/api/delta/detect")),
            (Endpoint::DeltaReport, Route::get("/api/delta/report")),
            (Endpoint::StaleData, Route::get("/api/delta/stale-data")),
        ]);

        Self {
            version: ApiVersion::Current,
            routes,
            fund_count: 1..=500,
            default_base_url: "http://localhost:5000",
            extract_keys: ExtractBodyKeys {
                fund_count: "fund_count",
                form_type: "form_type",
                batch_name: "batch_name",
            },
        }
    }

    // No scheduler, delta or quality-stats surface on the old backend.
    fn legacy() -> Self {
        let routes = HashMap::from([
            (Endpoint::Health, Route::get("/health")),
            (Endpoint::StartExtraction, Route::post("/api/extract")),
            (
                Endpoint::ExtractionStatus,
                Route::get("/api/extraction-status/{batch_id}").with_batch_id(BatchIdPlacement::Path),
            ),
            (Endpoint::Funds, Route::get("/api/funds")),
            (Endpoint::Annotations, Route::get("/api/annotations")),
            (
                Endpoint::QualityMetrics,
                Route::get("/api/quality-metrics/{batch_id}").with_batch_id(BatchIdPlacement::Path),
            ),
        ]);

        Self {
            version: ApiVersion::Legacy,
            routes,
            fund_count: 1..=1000,
            default_base_url: "http://localhost:8080",
            extract_keys: ExtractBodyKeys {
                fund_count: "count",
                form_type: "fund_type",
                batch_name: "batch_name",
            },
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn default_base_url(&self) -> &'static str {
        self.default_base_url
    }

    pub fn extract_keys(&self) -> ExtractBodyKeys {
        self.extract_keys
    }

    /// Inclusive `(min, max)` fund count accepted by the start-extraction route
    pub fn fund_count_bounds(&self) -> (u32, u32) {
        (*self.fund_count.start(), *self.fund_count.end())
    }

    /// Clamp a requested fund count into the accepted range
    pub fn clamp_fund_count(&self, requested: u32) -> u32 {
        requested.clamp(*self.fund_count.start(), *self.fund_count.end())
    }

    pub fn supports(&self, endpoint: Endpoint) -> bool {
        self.routes.contains_key(&endpoint)
    }

    /// Look up a route, failing with `Unsupported` when this version lacks it
    pub fn route(&self, endpoint: Endpoint) -> Result<&Route> {
        self.routes.get(&endpoint).ok_or(ClientError::Unsupported {
            endpoint,
            version: self.version,
        })
    }

    /// Resolve a route and place the batch id where the route wants it
    pub fn resolve(&self, endpoint: Endpoint, batch_id: Option<&str>) -> Result<ResolvedRoute> {
        let route = self.route(endpoint)?;
        let mut query = Vec::new();

        let path = match (route.batch_id, batch_id) {
            (BatchIdPlacement::Path, Some(id)) => {
                route.path.replace("{batch_id}", &urlencoding::encode(id))
            }
            (BatchIdPlacement::Path, None) => {
                return Err(ClientError::Unsupported {
                    endpoint,
                    version: self.version,
                });
            }
            (BatchIdPlacement::Query(name), Some(id)) => {
                query.push((name.to_string(), id.to_string()));
                route.path.to_string()
            }
            _ => route.path.to_string(),
        };

        Ok(ResolvedRoute {
            method: route.method,
            path,
            query,
        })
    }
}

impl Default for EndpointMap {
    fn default() -> Self {
        Self::for_version(ApiVersion::default())
    }
}
