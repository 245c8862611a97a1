//! StanShareAI Dashboard - navigation, session and page rendering
//!
//! Renders the StanShareAI dashboard as HTML from the typed API client.
//!
//! # Architecture
//! - `session`: signed-in identity loaded from an explicit store
//! - `views`: one statically registered view per page
//! - `controller`: navigation, sidebar, modal and logout state
//! - `markup`: page chrome and styles

#![allow(clippy::doc_markdown)]

mod controller;
mod error;
pub mod markup;
pub mod session;
pub mod views;

pub use controller::{DashboardController, DashboardState, LOGIN_PAGE};
pub use error::{DashboardError, Result};
pub use session::{FileStore, MemoryStore, Session, SessionStore, UserInfo};
pub use views::{PageId, View, ViewContext, ViewRegistry};
