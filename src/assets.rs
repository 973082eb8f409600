//! Artwork retrieval
//!
//! Downloads posters, banners, fanart and thumbnails and stores them in the
//! host's image slots keyed by source URL. Every download is isolated: a
//! failure is logged and reported to the caller, never propagated.

use crate::host::ImageSlot;
use crate::transport::{HttpTransport, TransportError};
use thiserror::Error;

/// Errors that can occur while fetching a single image
#[derive(Debug, Error)]
pub enum AssetError {
    /// The download itself failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned an empty body
    #[error("Empty response body from {0}")]
    EmptyBody(String),

    /// The body is not in a recognised image format
    #[error("Response from {url} is not an image (detected: {detected})")]
    NotAnImage { url: String, detected: String },
}

/// Fetches images through a borrowed transport.
pub struct AssetFetcher<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: HttpTransport + ?Sized> AssetFetcher<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Downloads `url` and checks that the body is an image.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        log::debug!("Fetching image: {url}");

        let bytes = self.transport.get_bytes(url)?;

        if bytes.is_empty() {
            return Err(AssetError::EmptyBody(url.to_string()));
        }

        if !infer::is_image(&bytes) {
            let detected = infer::get(&bytes)
                .map(|kind| kind.mime_type().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(AssetError::NotAnImage {
                url: url.to_string(),
                detected,
            });
        }

        Ok(bytes)
    }

    /// Downloads `url` into `slot` under the key `url`.
    ///
    /// Returns whether the image was attached. On failure a warning naming
    /// `kind` (e.g. "poster") is logged and `slot` is left untouched.
    pub fn fetch_and_attach(&self, url: &str, slot: &mut ImageSlot, kind: &str) -> bool {
        match self.fetch(url) {
            Ok(bytes) => {
                slot.attach(url, bytes);
                true
            }
            Err(e) => {
                log::warn!("Failed to fetch {kind}: {e}");
                false
            }
        }
    }
}
