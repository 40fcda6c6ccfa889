//! Core base-client trait and request/response types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RekonoError, Result};

/// Stateless REST client - each call is independent
#[async_trait]
pub trait RekonoApi: Send + Sync {
    /// Fetch every page of a collection and concatenate the records in page order
    async fn get_all_pages(&self, path: &str, filter: Option<&Filter>) -> Result<Vec<Value>>;

    /// Fetch a single page of a collection
    async fn get(
        &self,
        path: &str,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<&Filter>,
    ) -> Result<PageResponse>;
}

/// Query constraints passed through to the server as-is.
///
/// Pairs keep insertion order and repeated keys are allowed, since the
/// backend accepts multi-valued parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(Vec<(String, String)>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Parse a `key=value` pair as typed on the command line
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(RekonoError::Config(format!(
                "filter must be key=value, got '{}'",
                pair
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Envelope for a single page.
///
/// `data` holds the records; the rest is pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub data: Option<Vec<Value>>,
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageResponse {
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            count: Some(data.len() as u64),
            data: Some(data),
            next: None,
            previous: None,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_builder_keeps_order() {
        let filter = Filter::new().with("stage", "1").with("name", "nmap").with("stage", "2");
        let pairs: Vec<_> = filter.iter().collect();
        assert_eq!(pairs, vec![("stage", "1"), ("name", "nmap"), ("stage", "2")]);
        assert_eq!(filter.len(), 3);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_filter_from_iter() {
        let filter: Filter = vec![("liked", "true")].into_iter().collect();
        assert_eq!(filter, Filter::new().with("liked", "true"));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            Filter::parse_pair("stage=3").unwrap(),
            ("stage".to_string(), "3".to_string())
        );
        assert_eq!(
            Filter::parse_pair("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert_eq!(
            Filter::parse_pair("search=").unwrap(),
            ("search".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_pair_rejects_malformed() {
        assert!(matches!(Filter::parse_pair("stage"), Err(RekonoError::Config(_))));
        assert!(matches!(Filter::parse_pair("=3"), Err(RekonoError::Config(_))));
    }

    #[test]
    fn test_page_response_deserialize_partial() {
        let response: PageResponse =
            serde_json::from_value(json!({"data": [{"id": 3, "name": "sqlmap"}], "count": 1})).unwrap();
        assert_eq!(response.data, Some(vec![json!({"id": 3, "name": "sqlmap"})]));
        assert_eq!(response.count, Some(1));
        assert!(!response.has_next());
    }

    #[test]
    fn test_page_response_without_data() {
        let response: PageResponse = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(response.data.is_none());
    }

    #[test]
    fn test_page_response_builders() {
        let response = PageResponse::new(vec![json!({"id": 1})])
            .with_count(40)
            .with_next("http://rekono/api/tools/?page=2");
        assert_eq!(response.count, Some(40));
        assert!(response.has_next());
    }
}
