//! Rekono REST client implementation
//!
//! This module implements the RekonoApi trait over HTTP with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::client::{Filter, PageResponse, RekonoApi};
use crate::error::{RekonoError, Result};

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV: &str = "REKONO_TOKEN";

/// Default Rekono backend address
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Largest page the backend will serve
const DEFAULT_PAGE_SIZE: u32 = 1000;

/// DRF TokenAuthentication keyword
const DEFAULT_AUTH_SCHEME: &str = "Token";

/// Default request timeout
const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Fallback when a 429 carries no usable Retry-After
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the HTTP client
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Authorization keyword placed before the token
    pub auth_scheme: String,
    pub page_size: u32,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    /// Create a config pointing at a specific server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_scheme", &self.auth_scheme)
            .field("page_size", &self.page_size)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// DRF list body: `{count, next, previous, results}`
#[derive(Debug, Deserialize)]
struct RawPage {
    results: Option<Vec<Value>>,
    count: Option<u64>,
    next: Option<String>,
    previous: Option<String>,
}

impl From<RawPage> for PageResponse {
    fn from(raw: RawPage) -> Self {
        Self {
            data: raw.results,
            count: raw.count,
            next: raw.next,
            previous: raw.previous,
        }
    }
}

/// HTTP implementation of the Rekono base client
pub struct HttpRekonoApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
    auth_scheme: String,
    page_size: u32,
}

impl HttpRekonoApi {
    /// Create a new client
    ///
    /// Falls back to REKONO_TOKEN when the config carries no token
    pub fn new(config: ApiConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()));

        Self::with_token(token, config)
    }

    /// Create a client with an explicit token (or none)
    pub fn with_token(token: Option<String>, config: ApiConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| RekonoError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RekonoError::InvalidUrl(config.base_url.clone()));
        }

        // Endpoint paths resolve under the base path, so it must end in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if config.page_size == 0 {
            return Err(RekonoError::Config("page_size must be positive".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RekonoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token,
            auth_scheme: config.auth_scheme,
            page_size: config.page_size,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve `path` under the base URL and append page, limit and filter pairs
    fn build_url(
        &self,
        path: &str,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<&Filter>,
    ) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RekonoError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(page) = page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(filter) = filter {
            pairs.extend(filter.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        }

        // query_pairs_mut leaves a dangling '?' when nothing is appended
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Issue a GET and decode the JSON body
    async fn send_request(&self, url: Url) -> Result<Value> {
        debug!(url = %url, "GET");

        let mut request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("{} {}", self.auth_scheme, token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(url = %url, status = status.as_u16(), "request rejected");
            return Err(RekonoError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(url = %url, retry_after, "rate limited");
            return Err(RekonoError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(url = %url, status = status.as_u16(), "request failed");
            return Err(RekonoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| RekonoError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

/// Map a response body onto the page envelope
///
/// Unpaginated endpoints answer with a bare array; that becomes a single
/// complete page.
fn parse_page(body: Value) -> Result<PageResponse> {
    match body {
        Value::Array(items) => Ok(PageResponse::new(items)),
        Value::Object(_) => serde_json::from_value::<RawPage>(body)
            .map(PageResponse::from)
            .map_err(|e| RekonoError::InvalidResponse(format!("unexpected page body: {}", e))),
        other => Err(RekonoError::InvalidResponse(format!(
            "expected object or array, got {}",
            other
        ))),
    }
}

#[async_trait]
impl RekonoApi for HttpRekonoApi {
    async fn get_all_pages(&self, path: &str, filter: Option<&Filter>) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.build_url(path, Some(page), Some(self.page_size), filter)?;
            let mut response = parse_page(self.send_request(url).await?)?;
            let data = response.data.take().ok_or_else(|| RekonoError::MissingData {
                path: path.to_string(),
            })?;

            let fetched = data.len();
            records.extend(data);

            let complete = fetched == 0
                || !response.has_next()
                || response.count.is_some_and(|c| records.len() as u64 >= c);
            if complete {
                break;
            }
            page += 1;
        }

        debug!(path, pages = page, records = records.len(), "collected all pages");
        Ok(records)
    }

    async fn get(
        &self,
        path: &str,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<&Filter>,
    ) -> Result<PageResponse> {
        let url = self.build_url(path, page, limit, filter)?;
        parse_page(self.send_request(url).await?)
    }
}

impl std::fmt::Debug for HttpRekonoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRekonoApi")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .field("auth_scheme", &self.auth_scheme)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOOLS: &str = "/api/tools/?o=stage,-likes_count,name";

    fn client() -> HttpRekonoApi {
        HttpRekonoApi::with_token(Some("test-token".to_string()), ApiConfig::default()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.auth_scheme, "Token");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_config_with_base_url() {
        let config = ApiConfig::with_base_url("https://rekono.example");
        assert_eq!(config.base_url, "https://rekono.example");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_config_partial() {
        let config: ApiConfig = serde_json::from_value(json!({"page_size": 50})).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_new_prefers_configured_token() {
        let config = ApiConfig {
            token: Some("from-config".to_string()),
            page_size: 20,
            ..Default::default()
        };
        let client = HttpRekonoApi::new(config).unwrap();
        assert!(client.is_authenticated());
        assert_eq!(client.page_size, 20);
        assert_eq!(client.auth_scheme, "Token");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpRekonoApi::with_token(None, ApiConfig::with_base_url("not a url"));
        assert!(matches!(result, Err(RekonoError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = ApiConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            HttpRekonoApi::with_token(None, config),
            Err(RekonoError::Config(_))
        ));
    }

    #[test]
    fn test_build_url_keeps_ordering() {
        let url = client().build_url(TOOLS, None, None, None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/tools/?o=stage,-likes_count,name");
    }

    #[test]
    fn test_build_url_appends_page_limit_filter() {
        let filter = Filter::new().with("stage", "2").with("name", "nmap");
        let url = client().build_url(TOOLS, Some(2), Some(25), Some(&filter)).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("o".to_string(), "stage,-likes_count,name".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("stage".to_string(), "2".to_string()),
                ("name".to_string(), "nmap".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_keeps_base_path_prefix() {
        for base in ["https://host/rekono", "https://host/rekono/"] {
            let client = HttpRekonoApi::with_token(None, ApiConfig::with_base_url(base)).unwrap();
            let url = client.build_url(TOOLS, Some(1), None, None).unwrap();
            assert_eq!(
                url.as_str(),
                "https://host/rekono/api/tools/?o=stage,-likes_count,name&page=1"
            );
        }
    }

    #[test]
    fn test_build_url_without_query() {
        let url = client().build_url("/api/tools/", None, None, None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/tools/");
    }

    #[test]
    fn test_parse_page_drf_body() {
        let page = parse_page(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();
        assert_eq!(page.data.unwrap().len(), 2);
        assert_eq!(page.count, Some(2));
        assert!(page.next.is_none());
    }

    #[test]
    fn test_parse_page_bare_array() {
        let page = parse_page(json!([{"id": 1}])).unwrap();
        assert_eq!(page.data, Some(vec![json!({"id": 1})]));
        assert_eq!(page.count, Some(1));
    }

    #[test]
    fn test_parse_page_without_results() {
        let page = parse_page(json!({"detail": "odd"})).unwrap();
        assert!(page.data.is_none());
    }

    #[test]
    fn test_parse_page_malformed_object() {
        assert!(matches!(
            parse_page(json!({"results": "x"})),
            Err(RekonoError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_page_scalar_rejected() {
        assert!(matches!(
            parse_page(json!("nope")),
            Err(RekonoError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_debug_impl_hides_token() {
        let debug_str = format!("{:?}", client());
        assert!(debug_str.contains("HttpRekonoApi"));
        assert!(debug_str.contains("authenticated: true"));
        assert!(!debug_str.contains("test-token"));

        let config = ApiConfig {
            token: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpRekonoApi>();
    }
}
