//! Host media-library object model
//!
//! These are the mutable targets the hosting library owns. The library's own
//! scan decides which seasons and episodes exist; the sync pipeline only ever
//! writes into entries that are already present and never inserts new ones.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// A collection of images for one artwork kind, keyed by source URL.
///
/// Holding several images is normal; the host picks which one to display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlot {
    images: BTreeMap<String, Vec<u8>>,
}

impl ImageSlot {
    /// Stores `bytes` under `url`, replacing any image previously stored
    /// under the same URL.
    pub fn attach(&mut self, url: &str, bytes: Vec<u8>) {
        self.images.insert(url.to_string(), bytes);
    }

    /// Returns the image stored under `url`, if any.
    pub fn get(&self, url: &str) -> Option<&[u8]> {
        self.images.get(url).map(Vec::as_slice)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.images.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Source URLs of all stored images in sorted order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }
}

/// Series-level record in the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSeries {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub originally_available_at: Option<NaiveDate>,
    pub studio: Option<String>,
    pub content_rating: Option<String>,
    pub genres: BTreeSet<String>,
    pub posters: ImageSlot,
    pub banners: ImageSlot,
    pub art: ImageSlot,
    seasons: BTreeMap<u32, HostSeason>,
}

impl HostSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a season discovered by the host's scan.
    ///
    /// This is the host's entry point; the sync pipeline never calls it.
    pub fn add_season(&mut self, season_number: u32) -> &mut HostSeason {
        self.seasons.entry(season_number).or_default()
    }

    /// Season numbers known to the host, ascending.
    pub fn season_numbers(&self) -> BTreeSet<u32> {
        self.seasons.keys().copied().collect()
    }

    pub fn season(&self, season_number: u32) -> Option<&HostSeason> {
        self.seasons.get(&season_number)
    }

    pub fn season_mut(&mut self, season_number: u32) -> Option<&mut HostSeason> {
        self.seasons.get_mut(&season_number)
    }
}

/// Season record in the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSeason {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub posters: ImageSlot,
    episodes: BTreeMap<u32, HostEpisode>,
}

impl HostSeason {
    /// Registers an episode discovered by the host's scan.
    pub fn add_episode(&mut self, episode_number: u32) -> &mut HostEpisode {
        self.episodes.entry(episode_number).or_default()
    }

    /// Episode numbers known to the host, ascending.
    pub fn episode_numbers(&self) -> BTreeSet<u32> {
        self.episodes.keys().copied().collect()
    }

    pub fn episode(&self, episode_number: u32) -> Option<&HostEpisode> {
        self.episodes.get(&episode_number)
    }

    pub fn episode_mut(&mut self, episode_number: u32) -> Option<&mut HostEpisode> {
        self.episodes.get_mut(&episode_number)
    }
}

/// Episode record in the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEpisode {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub originally_available_at: Option<NaiveDate>,
    /// Runtime in milliseconds
    pub duration: Option<u64>,
    pub thumbs: ImageSlot,
}
