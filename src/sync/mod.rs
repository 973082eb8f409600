//! Metadata synchronization
//!
//! Writes catalog metadata into a host series in three stages: series fields,
//! then season fields, then episode fields per season. Each stage only touches
//! entries the host already knows about, and a later failure never rolls back
//! what an earlier stage wrote.

mod dates;
mod seasons;
mod series;

pub use seasons::{compose_episode_title, duration_millis};

use crate::assets::AssetFetcher;
use crate::catalog::CatalogProvider;
use crate::host::{HostSeries, ImageSlot};
use crate::transport::HttpTransport;
use std::fmt;

/// Kind of artwork being attached, used in events and log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkKind {
    Poster,
    Banner,
    Fanart,
    SeasonPoster,
    EpisodeThumb,
}

impl fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtworkKind::Poster => "poster",
            ArtworkKind::Banner => "banner",
            ArtworkKind::Fanart => "fanart",
            ArtworkKind::SeasonPoster => "season poster",
            ArtworkKind::EpisodeThumb => "episode thumb",
        };
        f.write_str(name)
    }
}

/// Progress event emitted during an update
///
/// These events allow the host to track what an update wrote and what it
/// skipped. They are informational only.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Series-level fields were written
    SeriesUpdated {
        remote_id: String,
        title: Option<String>,
    },

    /// The catalog has no record for the series; series fields are untouched
    SeriesMissing { remote_id: String },

    /// Season fields were written
    SeasonUpdated { season_number: u32, title: String },

    /// The catalog lists a season the host doesn't have
    SeasonSkipped { season_number: u32 },

    /// Episode fields were written
    EpisodeUpdated {
        season_number: u32,
        episode_number: u32,
        title: String,
    },

    /// The catalog lists an episode the host doesn't have
    EpisodeSkipped {
        season_number: u32,
        episode_number: u32,
    },

    /// The episode list of one season could not be fetched
    EpisodesFailed { season_number: u32, reason: String },

    /// An image was downloaded and attached
    ImageAttached { kind: ArtworkKind, url: String },

    /// An image download failed; nothing was attached
    ImageFailed { kind: ArtworkKind, url: String },

    /// The update stopped early; everything written so far is kept
    Aborted { reason: String },

    /// The update ran to the end
    Complete {
        seasons_updated: usize,
        episodes_updated: usize,
    },
}

/// State shared by the stages of one update call.
struct SyncContext<'a, P: ?Sized, T: ?Sized, F> {
    catalog: &'a P,
    assets: AssetFetcher<'a, T>,
    remote_id: &'a str,
    on_event: F,
    seasons_updated: usize,
    episodes_updated: usize,
}

impl<'a, P, T, F> SyncContext<'a, P, T, F>
where
    P: CatalogProvider + ?Sized,
    T: HttpTransport + ?Sized,
    F: FnMut(SyncEvent),
{
    fn emit(&mut self, event: SyncEvent) {
        (self.on_event)(event);
    }

    /// Attaches the image at `url` if there is one; failures only emit an event.
    fn attach(&mut self, url: Option<&str>, slot: &mut ImageSlot, kind: ArtworkKind) {
        let Some(url) = url else {
            return;
        };

        let event = if self.assets.fetch_and_attach(url, slot, &kind.to_string()) {
            SyncEvent::ImageAttached {
                kind,
                url: url.to_string(),
            }
        } else {
            SyncEvent::ImageFailed {
                kind,
                url: url.to_string(),
            }
        };
        self.emit(event);
    }
}

/// Runs a full update of `host` from the catalog record `remote_id`.
///
/// Series fields are written first, then seasons and their episodes. A failed
/// series or season-list request is logged and ends the update; nothing is
/// returned to the caller.
pub fn synchronize<P, T, F>(
    catalog: &P,
    images: &T,
    remote_id: &str,
    host: &mut HostSeries,
    on_event: F,
) where
    P: CatalogProvider + ?Sized,
    T: HttpTransport + ?Sized,
    F: FnMut(SyncEvent),
{
    log::info!("Updating metadata for ID: {remote_id}");

    let mut ctx = SyncContext {
        catalog,
        assets: AssetFetcher::new(images),
        remote_id,
        on_event,
        seasons_updated: 0,
        episodes_updated: 0,
    };

    let result = series::sync_series(&mut ctx, host)
        .and_then(|()| seasons::sync_seasons(&mut ctx, host));

    match result {
        Ok(()) => {
            let event = SyncEvent::Complete {
                seasons_updated: ctx.seasons_updated,
                episodes_updated: ctx.episodes_updated,
            };
            ctx.emit(event);
        }
        Err(e) => {
            log::error!("Update error: {e}");
            ctx.emit(SyncEvent::Aborted {
                reason: e.to_string(),
            });
        }
    }
}
