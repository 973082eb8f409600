//! Cached transport implementation
//!
//! This module provides a caching wrapper for HTTP transports that stores
//! text responses in a local cache for a fixed freshness window. Binary
//! downloads (images) always go to the wrapped transport.

use super::{HttpTransport, TransportError};
use crate::cache::{CacheError, CacheStorage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A cached response body together with the URL it was fetched from.
///
/// Cache identifiers are sanitized, so the exact URL is kept to reject
/// entries that merely collide after sanitizing.
#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    body: String,
}

/// A caching wrapper for HTTP transports
///
/// Successful text responses are stored and served again until they are
/// older than the configured TTL. Failed requests are never cached, and
/// cache failures never fail a request.
pub struct CachedTransport<T>
where
    T: HttpTransport,
{
    /// The underlying transport
    transport: T,
    /// Cache storage for response bodies
    cache: CacheStorage<CachedResponse>,
}

impl<T> CachedTransport<T>
where
    T: HttpTransport,
{
    /// Wraps `transport` with a cache in the system's standard cache directory
    ///
    /// Expired entries left by earlier runs are removed.
    pub fn open(transport: T, ttl: Duration) -> Result<Self, CacheError> {
        let cache = CacheStorage::open("responses", Some(ttl))?;
        log::debug!("Response cache at {}", cache.cache_dir().display());
        Ok(Self::with_storage(transport, cache))
    }

    /// Wraps `transport` with a cache below an explicit directory
    pub fn open_in(transport: T, root: &Path, ttl: Duration) -> Result<Self, CacheError> {
        let cache = CacheStorage::open_in(root, "responses", Some(ttl))?;
        Ok(Self::with_storage(transport, cache))
    }

    fn with_storage(transport: T, cache: CacheStorage<CachedResponse>) -> Self {
        match cache.prune() {
            Ok(0) => {}
            Ok(removed) => log::debug!("Removed {removed} expired cache entries"),
            Err(e) => log::debug!("Failed to prune response cache: {e}"),
        }
        Self { transport, cache }
    }

    /// Returns the wrapped transport
    pub fn inner(&self) -> &T {
        &self.transport
    }
}

impl<T> HttpTransport for CachedTransport<T>
where
    T: HttpTransport,
{
    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        match self.cache.load(url) {
            Ok(Some(cached)) if cached.url == url => {
                log::debug!("Cache hit for {url}");
                return Ok(cached.body);
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Ignoring unreadable cache entry for {url}: {e}");
            }
        }

        let body = self.transport.get_text(url)?;

        let entry = CachedResponse {
            url: url.to_string(),
            body,
        };
        if let Err(e) = self.cache.store(url, &entry) {
            log::debug!("Failed to cache response for {url}: {e}");
        }

        Ok(entry.body)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.transport.get_bytes(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CountingTransport {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl CountingTransport {
        fn new(fail: bool) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl HttpTransport for CountingTransport {
        fn get_text(&self, url: &str) -> Result<String, TransportError> {
            self.calls.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok(format!("body of {url}"))
        }

        fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            self.calls.borrow_mut().push(url.to_string());
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn test_second_text_request_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CachedTransport::open_in(
            CountingTransport::new(false),
            dir.path(),
            Duration::from_secs(3600),
        )
        .unwrap();

        let first = transport.get_text("https://example.test/a").unwrap();
        let second = transport.get_text("https://example.test/a").unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.inner().calls.borrow().len(), 1);
    }

    #[test]
    fn test_colliding_identifiers_do_not_share_entries() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CachedTransport::open_in(
            CountingTransport::new(false),
            dir.path(),
            Duration::from_secs(3600),
        )
        .unwrap();

        // Both sanitize to the same file name
        let a = transport.get_text("https://example.test/a?b").unwrap();
        let b = transport.get_text("https://example.test/a/b").unwrap();

        assert_eq!(a, "body of https://example.test/a?b");
        assert_eq!(b, "body of https://example.test/a/b");
        assert_eq!(transport.inner().calls.borrow().len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CachedTransport::open_in(
            CountingTransport::new(true),
            dir.path(),
            Duration::from_secs(3600),
        )
        .unwrap();

        assert!(transport.get_text("https://example.test/a").is_err());
        assert!(transport.get_text("https://example.test/a").is_err());
        assert_eq!(transport.inner().calls.borrow().len(), 2);
    }

    #[test]
    fn test_opening_removes_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let expired =
            CachedTransport::open_in(CountingTransport::new(false), dir.path(), Duration::ZERO)
                .unwrap();
        expired.get_text("https://example.test/a").unwrap();
        expired.get_text("https://example.test/b").unwrap();
        let cache_dir = dir.path().join("responses");
        assert_eq!(std::fs::read_dir(&cache_dir).unwrap().count(), 2);

        let _reopened =
            CachedTransport::open_in(CountingTransport::new(false), dir.path(), Duration::ZERO)
                .unwrap();
        assert_eq!(std::fs::read_dir(&cache_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_bytes_bypass_cache() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CachedTransport::open_in(
            CountingTransport::new(false),
            dir.path(),
            Duration::from_secs(3600),
        )
        .unwrap();

        transport.get_bytes("https://example.test/img.png").unwrap();
        transport.get_bytes("https://example.test/img.png").unwrap();
        assert_eq!(transport.inner().calls.borrow().len(), 2);
    }
}
