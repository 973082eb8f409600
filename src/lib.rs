//! Sportarr agent - sports-event metadata for series/season/episode libraries
//!
//! This library answers a media library's metadata queries from the Sportarr
//! catalog: it scores search candidates for a free-text title and writes
//! series, season and episode metadata plus artwork into the library's own
//! objects. It only updates seasons and episodes the library already knows
//! about and never raises errors to the library; failures are logged.

mod assets;
mod cache;
mod catalog;
mod config;
mod host;
mod resolver;
mod sync;
mod transport;

// Re-export error types
pub use assets::AssetError;
pub use cache::CacheError;
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use transport::TransportError;

pub use assets::AssetFetcher;
pub use catalog::{
    CatalogProvider, EpisodeRecord, SearchHit, SearchHits, SeasonRecord, SeriesRecord,
    SportarrCatalog,
};
pub use config::{AgentConfig, config_path};
pub use host::{HostEpisode, HostSeason, HostSeries, ImageSlot};
pub use resolver::{Candidate, MAX_CANDIDATES, position_score};
pub use sync::{ArtworkKind, SyncEvent, compose_episode_title, duration_millis};
pub use transport::{CachedTransport, HttpTransport, ReqwestTransport};

use thiserror::Error;

/// Top-level error type for setting up an agent
///
/// Only construction can fail. Once built, the agent's entry points log
/// their failures instead of returning them.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while creating the HTTP client
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Transport used by agents built from configuration
pub type DefaultTransport = Box<dyn HttpTransport>;

/// The host-facing agent
///
/// Wraps a catalog client and exposes the three calls a media library makes:
/// `search` to find candidates, `update` to write metadata into a series the
/// library selected, and (through `update`) image attachment into the
/// library's image slots.
pub struct SportarrAgent<T: HttpTransport = DefaultTransport> {
    catalog: SportarrCatalog<T>,
}

impl SportarrAgent {
    /// Creates an agent from configuration, with a blocking HTTP client and,
    /// unless disabled, an on-disk response cache.
    ///
    /// A cache that cannot be opened is logged and skipped; the agent then
    /// talks to the catalog directly.
    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        log::info!("Agent starting...");
        log::info!("API URL: {}", config.base_url);

        let transport = build_transport(config, |http| {
            CachedTransport::open(http, config.cache_ttl)
        })?;

        Ok(Self::with_transport(config.base_url.clone(), transport))
    }

    /// Creates an agent from [`AgentConfig::load`].
    pub fn from_env() -> Result<Self, AgentError> {
        let config = AgentConfig::load()?;
        Self::from_config(&config)
    }
}

/// Builds the HTTP client and wraps it with the cache `open_cache` returns,
/// falling back to the bare client when the cache is disabled or unavailable.
fn build_transport<O>(config: &AgentConfig, open_cache: O) -> Result<DefaultTransport, AgentError>
where
    O: FnOnce(ReqwestTransport) -> Result<CachedTransport<ReqwestTransport>, CacheError>,
{
    let http = ReqwestTransport::new(config.request_timeout)?;
    if !config.cache_enabled {
        return Ok(Box::new(http));
    }

    match open_cache(http) {
        Ok(cached) => Ok(Box::new(cached)),
        Err(e) => {
            log::warn!("Response cache unavailable, continuing without it: {e}");
            Ok(Box::new(ReqwestTransport::new(config.request_timeout)?))
        }
    }
}

impl<T: HttpTransport> SportarrAgent<T> {
    /// Creates an agent for the catalog at `base_url` using `transport` for
    /// every request.
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            catalog: SportarrCatalog::new(base_url, transport),
        }
    }

    /// Searches for series matching `query`, optionally filtered by `year`.
    ///
    /// Returns at most ten candidates in the catalog's order. An empty list
    /// is a normal result, including when the catalog could not be reached.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sportarr_agent::SportarrAgent;
    ///
    /// let agent = SportarrAgent::from_env().unwrap();
    /// for candidate in agent.search("UFC", None) {
    ///     println!("{} ({}): {}", candidate.title, candidate.remote_id, candidate.rank_score);
    /// }
    /// ```
    pub fn search(&self, query: &str, year: Option<i32>) -> Vec<Candidate> {
        resolver::resolve_candidates(&self.catalog, query, year)
    }

    /// Writes the catalog's metadata for `remote_id` into `host`.
    ///
    /// Safe to repeat: scalar fields are overwritten, genres replaced and
    /// images keyed by URL. Only seasons and episodes already present in
    /// `host` are written.
    pub fn update(&self, remote_id: &str, host: &mut HostSeries) {
        self.update_with_progress(remote_id, host, |_| {});
    }

    /// Like [`update`](Self::update), reporting progress through `on_event`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sportarr_agent::{HostSeries, SportarrAgent, SyncEvent};
    ///
    /// let agent = SportarrAgent::from_env().unwrap();
    /// let mut series = HostSeries::new();
    /// series.add_season(2024).add_episode(1);
    ///
    /// agent.update_with_progress("ufc", &mut series, |event| {
    ///     if let SyncEvent::ImageFailed { kind, url } = event {
    ///         eprintln!("missing {kind}: {url}");
    ///     }
    /// });
    /// ```
    pub fn update_with_progress<F>(&self, remote_id: &str, host: &mut HostSeries, on_event: F)
    where
        F: FnMut(SyncEvent),
    {
        sync::synchronize(
            &self.catalog,
            self.catalog.transport(),
            remote_id,
            host,
            on_event,
        );
    }

    /// The underlying catalog client.
    pub fn catalog(&self) -> &SportarrCatalog<T> {
        &self.catalog
    }
}
