pub mod http;

use crate::endpoint::Request;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use http::SurfRemoteCaller;

/// Transport used by the user manager to reach the remote service.
///
/// Implementations keep the target application id and the request headers
/// as interior state; both apply to every request issued after they change.
#[async_trait]
pub trait RemoteCaller: Send + Sync {
    fn set_app_id(&self, app_id: &str);

    fn set_headers(&self, headers: Vec<(String, String)>);

    /// Sends the request and decodes the response body into `R`.
    async fn request<R>(&self, request: Request<R>) -> Result<R, TransportError>
    where
        R: DeserializeOwned + Send + 'static;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Request limiter closed")]
    Closed,
}
