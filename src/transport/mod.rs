//! HTTP transport layer
//!
//! The pipeline never talks to `reqwest` directly. Every request goes through
//! the [`HttpTransport`] trait so the catalog client and the asset fetcher can
//! be driven by an in-memory fake in tests, and so response caching can be
//! layered on top without the pipeline noticing.
mod cached;

pub use cached::CachedTransport;

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while issuing an HTTP request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The server answered with a non-success status code
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Issues blocking GET requests on behalf of the pipeline.
///
/// Implementations must treat any non-success status as an error; callers
/// never inspect status codes themselves.
pub trait HttpTransport {
    /// Fetches `url` and returns the response body as text.
    fn get_text(&self, url: &str) -> Result<String, TransportError>;

    /// Fetches `url` and returns the raw response body.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        (**self).get_text(url)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get_bytes(url)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        (**self).get_text(url)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get_bytes(url)
    }
}

/// Blocking `reqwest` transport used in production.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sportarr-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    fn send(&self, url: &str) -> Result<reqwest::blocking::Response, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

impl HttpTransport for ReqwestTransport {
    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        self.send(url)?
            .text()
            .map_err(|e| TransportError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let bytes = self
            .send(url)?
            .bytes()
            .map_err(|e| TransportError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}
