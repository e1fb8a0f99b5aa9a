//! Read-only client for the server's public statistics API.
//!
//! - `client`: authenticated HTTP transport
//! - `queries`: one function per menu query, returning display-ready output

use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;

mod client;
pub mod queries;

pub use client::ApiClient;

/// Minimal API interface used by the session loop.
///
/// Tests provide canned JSON bodies; production uses [`ApiClient`].
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// GET `path` (relative to the API base URL) and return the JSON body.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
}
