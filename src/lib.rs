//! rekono-tools - client for the Rekono tools API
//!
//! `ToolsClient` reads the `/api/tools/` collection in its canonical order
//! (stage, most liked, name) through an injected `RekonoApi` base client.

pub mod api;
pub mod error;
pub mod tools;

pub use api::{ApiConfig, Filter, HttpRekonoApi, MockRekonoApi, PageResponse, RekonoApi};
pub use error::{RekonoError, Result};
pub use tools::{Tool, ToolsClient};
