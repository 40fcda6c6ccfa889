//! Facade over the `/api/tools/` collection

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::api::{ApiConfig, Filter, HttpRekonoApi, RekonoApi};
use crate::error::{RekonoError, Result};

/// Collection path for tools
pub const TOOLS_PATH: &str = "/api/tools/";

/// Stage ascending, most liked first, then by name
pub const TOOLS_ORDERING: &str = "stage,-likes_count,name";

/// Read-only accessors for tool records.
///
/// Holds no state besides the injected base client, so one instance can be
/// built at startup and shared across tasks.
#[derive(Clone)]
pub struct ToolsClient {
    api: Arc<dyn RekonoApi>,
    endpoint: String,
}

impl ToolsClient {
    pub fn new(api: Arc<dyn RekonoApi>) -> Self {
        Self {
            api,
            endpoint: format!("{}?o={}", TOOLS_PATH, TOOLS_ORDERING),
        }
    }

    /// Build a client backed by HTTP
    pub fn from_config(config: ApiConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpRekonoApi::new(config)?)))
    }

    /// Path plus ordering query sent on every request
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Every tool, aggregated across all pages
    pub async fn fetch_all_tools(&self, filter: Option<&Filter>) -> Result<Vec<Value>> {
        debug!(endpoint = %self.endpoint, filtered = filter.is_some(), "fetching all tools");
        self.api.get_all_pages(&self.endpoint, filter).await
    }

    /// One page of tools; pagination metadata is dropped
    pub async fn fetch_tools_page(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>> {
        debug!(endpoint = %self.endpoint, ?page, ?limit, "fetching tools page");
        let response = self.api.get(&self.endpoint, page, limit, filter).await?;
        response.data.ok_or_else(|| RekonoError::MissingData {
            path: self.endpoint.clone(),
        })
    }
}

impl std::fmt::Debug for ToolsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
