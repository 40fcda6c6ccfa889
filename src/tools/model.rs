//! Typed view of a tool record
//!
//! The client hands records back untouched; this is for callers that want
//! named fields. Decoding is lenient: only `id` and `name` are required and
//! unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Intensity level a tool supports and the argument that enables it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intensity {
    #[serde(default)]
    pub argument: String,
    /// Display name, e.g. "Normal"
    pub value: String,
}

/// A named argument set for a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub tool: Option<u64>,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub default: bool,
}

/// A security tool as served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub command: Option<String>,
    /// Stage display name, e.g. "Enumeration"
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub for_each_target_port: bool,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub intensities: Vec<Intensity>,
    #[serde(default)]
    pub configurations: Vec<Configuration>,
}

impl Tool {
    /// Decode a single record
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(serde_json::from_value(record.clone())?)
    }
}

/// Decode a sequence of records, failing on the first malformed one
pub fn decode_tools(records: &[Value]) -> Result<Vec<Tool>> {
    records.iter().map(Tool::from_record).collect()
}
