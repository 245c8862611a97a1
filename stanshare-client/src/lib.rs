//! StanShareAI Client - typed access to the SEC EDGAR fund extraction API
//!
//! A thin client over the extraction backend. The backend owns extraction,
//! scheduling, quality scoring and delta detection; this crate only speaks
//! its HTTP contract.
//!
//! # Architecture
//! - `client`: one method per backend endpoint, uniform error mapping
//! - `endpoints`: per-version route tables (canonical and legacy backends)
//! - `transport`: reqwest transport plus a mock for tests
//! - `poll`: owned, cancellable extraction status polls
//! - `format`: currency/date/status/score display helpers
//!
//! # Example
//! ```ignore
//! let client = StanShareClient::new(&ClientConfig::from_env());
//! let started = client.start_extraction(50, FormType::FormNPort, None).await?;
//! let outcome = client
//!     .poll_extraction_status(&started.batch_id, |s| println!("{}", s.status), None)?
//!     .wait()
//!     .await?;
//! ```

#![allow(clippy::cast_possible_truncation)] // Durations and cents fit in u64
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]

mod client;
mod config;
mod endpoints;
mod error;
pub mod format;
mod poll;
mod transport;
mod types;

pub use client::StanShareClient;
pub use config::{ClientConfig, DEFAULT_POLL_INTERVAL_MS};
pub use endpoints::{ApiVersion, BatchIdPlacement, Endpoint, EndpointMap, ExtractBodyKeys, ResolvedRoute, Route};
pub use error::{ClientError, Result};
pub use format::{ScoreCategory, ScoreThresholds, StatusCategory};
pub use poll::{PollHandle, PollOutcome};
pub use transport::{ApiRequest, HttpResponse, HttpTransport, Method, MockTransport, ReqwestTransport};
pub use types::*;
