//! Tools collection - client facade and record model

mod client;
mod model;

pub use client::{TOOLS_ORDERING, TOOLS_PATH, ToolsClient};
pub use model::{Configuration, Intensity, Tool, decode_tools};
