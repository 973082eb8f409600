/// Data structures and traits for sports catalog metadata retrieval.
///
/// This module provides structures to represent the catalog's series, seasons
/// and episodes after they have been validated and defaulted, as well as the
/// trait implemented by catalog clients.
mod sportarr;
mod sportarr_types;

pub use sportarr::SportarrCatalog;

use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur during catalog retrieval operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the catalog service failed
    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response from {url}: {reason}")]
    ParseError { url: String, reason: String },

    /// The API returned invalid or unexpected data
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// A single hit from a catalog search, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Catalog identifier of the series
    pub remote_id: String,
    /// Series title (empty if the catalog sent none)
    pub title: String,
    pub year: Option<i32>,
}

/// Search hits in response order. Each hit is decoded on its own, so a
/// malformed hit shows up as an `Err` entry without affecting its neighbours.
pub type SearchHits = Vec<Result<SearchHit, CatalogError>>;

/// Series-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesRecord {
    pub remote_id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    /// Release year as sent by the catalog, not yet validated
    pub year: Option<String>,
    pub studio: Option<String>,
    pub content_rating: Option<String>,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
    pub banner_url: Option<String>,
    pub fanart_url: Option<String>,
}

/// A season of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonRecord {
    pub season_number: u32,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub poster_url: Option<String>,
}

/// An episode within a season.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpisodeRecord {
    pub episode_number: u32,
    pub title: Option<String>,
    /// Non-empty part label for multi-part events
    pub part_name: Option<String>,
    pub summary: Option<String>,
    /// Air date as sent by the catalog, not yet validated
    pub air_date: Option<String>,
    pub duration_minutes: Option<f64>,
    pub thumb_url: Option<String>,
}

/// Trait for catalog clients that can answer the agent's queries.
///
/// All URL-valued fields on returned records are either absent or non-empty.
pub trait CatalogProvider {
    /// Searches the catalog for series matching `title`, optionally
    /// restricted to `year`.
    fn search(&self, title: &str, year: Option<i32>) -> Result<SearchHits, CatalogError>;

    /// Fetches one series. `Ok(None)` means the catalog has no record.
    fn fetch_series(&self, remote_id: &str) -> Result<Option<SeriesRecord>, CatalogError>;

    /// Fetches every season of a series in one request.
    fn fetch_seasons(&self, remote_id: &str) -> Result<Vec<SeasonRecord>, CatalogError>;

    /// Fetches every episode of one season in one request.
    fn fetch_episodes(
        &self,
        remote_id: &str,
        season_number: u32,
    ) -> Result<Vec<EpisodeRecord>, CatalogError>;
}
