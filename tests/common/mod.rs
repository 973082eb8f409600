//! In-memory transport shared by the integration tests

#![allow(dead_code)]

use sportarr_agent::{HttpTransport, SportarrAgent, TransportError};
use std::cell::RefCell;
use std::collections::HashMap;

pub const BASE: &str = "https://sportarr.test";

/// Smallest byte sequence `infer` recognises as a PNG
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

enum Reply {
    Text(String),
    Bytes(Vec<u8>),
    Status(u16),
}

/// Serves canned replies by URL and records every requested URL.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON reply for an API path below `{BASE}/api/metadata/plex`
    pub fn json(mut self, path: &str, body: &str) -> Self {
        self.replies.insert(api_url(path), Reply::Text(body.to_string()));
        self
    }

    /// Error status for an API path below `{BASE}/api/metadata/plex`
    pub fn api_status(mut self, path: &str, status: u16) -> Self {
        self.replies.insert(api_url(path), Reply::Status(status));
        self
    }

    /// Valid PNG reply for an absolute image URL
    pub fn image(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Bytes(PNG.to_vec()));
        self
    }

    /// Arbitrary bytes for an absolute URL
    pub fn bytes(mut self, url: &str, bytes: &[u8]) -> Self {
        self.replies.insert(url.to_string(), Reply::Bytes(bytes.to_vec()));
        self
    }

    /// Error status for an absolute URL
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|r| r == url)
    }

    fn reply(&self, url: &str) -> Result<&Reply, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Status(status)) => Err(TransportError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(reply) => Ok(reply),
            None => Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

impl HttpTransport for FakeTransport {
    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        match self.reply(url)? {
            Reply::Text(body) => Ok(body.clone()),
            Reply::Bytes(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Reply::Status(_) => unreachable!(),
        }
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        match self.reply(url)? {
            Reply::Text(body) => Ok(body.as_bytes().to_vec()),
            Reply::Bytes(bytes) => Ok(bytes.clone()),
            Reply::Status(_) => unreachable!(),
        }
    }
}

pub fn api_url(path: &str) -> String {
    format!("{BASE}/api/metadata/plex/{path}")
}

pub fn agent(transport: FakeTransport) -> SportarrAgent<FakeTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    SportarrAgent::with_transport(BASE, transport)
}
