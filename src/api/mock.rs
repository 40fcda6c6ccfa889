//! Scripted RekonoApi for tests
//!
//! Results are queued per method and consumed in order; every call is
//! recorded so tests can assert on the exact path, page window and filter.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::client::{Filter, PageResponse, RekonoApi};
use crate::error::{RekonoError, Result};

/// Which base-client method was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    AllPages,
    Page,
}

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub path: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub filter: Option<Filter>,
}

#[derive(Debug, Default)]
pub struct MockRekonoApi {
    all_pages: Mutex<VecDeque<Result<Vec<Value>>>>,
    pages: Mutex<VecDeque<Result<PageResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockRekonoApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result for `get_all_pages`
    pub fn with_all_pages(self, records: Vec<Value>) -> Self {
        lock(&self.all_pages).push_back(Ok(records));
        self
    }

    /// Queue a successful result for `get`
    pub fn with_page(self, response: PageResponse) -> Self {
        lock(&self.pages).push_back(Ok(response));
        self
    }

    /// Queue a failure for `get_all_pages`
    pub fn failing_all_pages(self, error: RekonoError) -> Self {
        lock(&self.all_pages).push_back(Err(error));
        self
    }

    /// Queue a failure for `get`
    pub fn failing_page(self, error: RekonoError) -> Self {
        lock(&self.pages).push_back(Err(error));
        self
    }

    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, kind: CallKind, path: &str, page: Option<u32>, limit: Option<u32>, filter: Option<&Filter>) {
        lock(&self.calls).push(RecordedCall {
            kind,
            path: path.to_string(),
            page,
            limit,
            filter: filter.cloned(),
        });
    }
}

fn exhausted(method: &str) -> RekonoError {
    RekonoError::InvalidResponse(format!("mock has no scripted result for {}", method))
}

#[async_trait]
impl RekonoApi for MockRekonoApi {
    async fn get_all_pages(&self, path: &str, filter: Option<&Filter>) -> Result<Vec<Value>> {
        self.record(CallKind::AllPages, path, None, None, filter);
        lock(&self.all_pages)
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("get_all_pages")))
    }

    async fn get(
        &self,
        path: &str,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<&Filter>,
    ) -> Result<PageResponse> {
        self.record(CallKind::Page, path, page, limit, filter);
        lock(&self.pages).pop_front().unwrap_or_else(|| Err(exhausted("get")))
    }
}
