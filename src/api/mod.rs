//! Base REST client layer for the Rekono API
//!
//! This module provides:
//! - RekonoApi trait for transport abstraction
//! - Filter and PageResponse types
//! - HttpRekonoApi implementation over reqwest
//! - MockRekonoApi for tests

pub mod client;
pub mod http;
pub mod mock;

pub use client::{Filter, PageResponse, RekonoApi};
pub use http::{ApiConfig, HttpRekonoApi};
pub use mock::{CallKind, MockRekonoApi, RecordedCall};
