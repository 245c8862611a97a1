//! Request and response shapes
//!
//! The backend owns most payloads, so only the fields the client acts on are
//! typed; everything else is kept in a flattened `extra` map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// SEC form types the extraction backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    #[serde(rename = "485APOS")]
    Form485Apos,
    #[serde(rename = "10-K")]
    Form10K,
    #[serde(rename = "10-Q")]
    Form10Q,
    #[serde(rename = "N-1A")]
    FormN1A,
    #[serde(rename = "N-PORT")]
    FormNPort,
}

impl FormType {
    pub const ALL: [FormType; 5] = [
        FormType::Form485Apos,
        FormType::Form10K,
        FormType::Form10Q,
        FormType::FormN1A,
        FormType::FormNPort,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Form485Apos => "485APOS",
            FormType::Form10K => "10-K",
            FormType::Form10Q => "10-Q",
            FormType::FormN1A => "N-1A",
            FormType::FormNPort => "N-PORT",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FormType::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClientError::Config(format!("unknown form type '{wanted}'")))
    }
}

/// Parameters for a new extraction batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub fund_count: u32,
    pub form_type: FormType,
    pub batch_name: Option<String>,
}

/// Batch lifecycle as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchState {
    Pending,
    Processing,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl BatchState {
    /// `Completed` and `Failed` end a batch; everything else keeps polling
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Completed | BatchState::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BatchState::Pending => "pending",
            BatchState::Processing => "processing",
            BatchState::Running => "running",
            BatchState::Completed => "completed",
            BatchState::Failed => "failed",
            BatchState::Other(s) => s,
        }
    }
}

impl From<String> for BatchState {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => BatchState::Pending,
            "processing" => BatchState::Processing,
            "running" => BatchState::Running,
            "completed" => BatchState::Completed,
            "failed" => BatchState::Failed,
            _ => BatchState::Other(s),
        }
    }
}

impl From<BatchState> for String {
    fn from(state: BatchState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to a start-extraction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStarted {
    pub batch_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Status of an extraction batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub status: BatchState,
    /// Progress fields defined by the backend
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtractionStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Liveness probe response; any JSON object is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pagination and filter for list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
    /// `fund_type` for funds, `batch_id` for annotations
    pub filter: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            filter: None,
        }
    }
}

impl PageQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub offset: u32,
    pub total: Option<u64>,
}

const ITEM_KEYS: [&str; 5] = ["items", "data", "funds", "annotations", "results"];

impl Page<Value> {
    /// Build a page from whatever list shape the backend returned.
    ///
    /// A bare array is the item list. For an object, the first array under a
    /// known key is used and `total`/`count` becomes the total.
    pub fn from_body(body: Value, query: &PageQuery) -> Self {
        let (items, total) = match body {
            Value::Array(items) => (items, None),
            Value::Object(mut obj) => {
                let total = ["total", "count"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(Value::as_u64));
                let items = ITEM_KEYS
                    .iter()
                    .find_map(|k| match obj.remove(*k) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default();
                (items, total)
            }
            _ => (Vec::new(), None),
        };

        Self {
            items,
            limit: query.limit,
            offset: query.offset,
            total,
        }
    }
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
