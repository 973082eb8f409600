//! Season and episode field mapping

use super::dates::parse_air_date;
use super::{ArtworkKind, SyncContext, SyncEvent};
use crate::catalog::{CatalogError, CatalogProvider, EpisodeRecord, SeasonRecord};
use crate::host::{HostEpisode, HostSeason, HostSeries};
use crate::transport::HttpTransport;

/// Builds the display title of an episode.
///
/// Falls back to `"Episode {n}"` when the catalog sends no title, and appends
/// the part name of multi-part events after `" - "`.
///
/// # Examples
///
/// ```
/// use sportarr_agent::compose_episode_title;
///
/// assert_eq!(compose_episode_title(1, Some("Main Card"), None), "Main Card");
/// assert_eq!(compose_episode_title(3, None, None), "Episode 3");
/// assert_eq!(compose_episode_title(2, Some("Prelims"), Some("pt1")), "Prelims - pt1");
/// ```
pub fn compose_episode_title(
    episode_number: u32,
    title: Option<&str>,
    part_name: Option<&str>,
) -> String {
    let base = match title {
        Some(title) => title.to_string(),
        None => format!("Episode {episode_number}"),
    };

    match part_name {
        Some(part) if !part.is_empty() => format!("{base} - {part}"),
        _ => base,
    }
}

/// Converts a runtime in minutes to milliseconds.
///
/// Returns `None` for zero, negative or non-finite values.
pub fn duration_millis(minutes: f64) -> Option<u64> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    Some((minutes * 60.0 * 1000.0).round() as u64)
}

/// Fetches all seasons and updates those the host already has.
///
/// Fails only if the season list itself cannot be fetched. Episode failures
/// are contained per season.
pub(super) fn sync_seasons<P, T, F>(
    ctx: &mut SyncContext<'_, P, T, F>,
    host: &mut HostSeries,
) -> Result<(), CatalogError>
where
    P: CatalogProvider + ?Sized,
    T: HttpTransport + ?Sized,
    F: FnMut(SyncEvent),
{
    let seasons = ctx.catalog.fetch_seasons(ctx.remote_id)?;
    let known = host.season_numbers();

    for record in seasons {
        let season_number = record.season_number;

        if !known.contains(&season_number) {
            log::debug!("Skipping season {season_number}: not in library");
            ctx.emit(SyncEvent::SeasonSkipped { season_number });
            continue;
        }

        let Some(season) = host.season_mut(season_number) else {
            continue;
        };

        let title = apply_season_fields(&record, season);
        ctx.attach(
            record.poster_url.as_deref(),
            &mut season.posters,
            ArtworkKind::SeasonPoster,
        );
        ctx.seasons_updated += 1;
        ctx.emit(SyncEvent::SeasonUpdated {
            season_number,
            title,
        });

        sync_episodes(ctx, season_number, season);
    }

    Ok(())
}

/// Writes title and summary of a season and returns the title written.
fn apply_season_fields(record: &SeasonRecord, season: &mut HostSeason) -> String {
    let title = record
        .title
        .clone()
        .unwrap_or_else(|| format!("Season {}", record.season_number));

    season.title = Some(title.clone());
    season.summary = Some(record.summary.clone().unwrap_or_default());

    title
}

/// Fetches the episodes of one season and updates those the host already has.
///
/// A failed request is logged and reported as an event; it does not stop the
/// remaining seasons.
fn sync_episodes<P, T, F>(
    ctx: &mut SyncContext<'_, P, T, F>,
    season_number: u32,
    season: &mut HostSeason,
) where
    P: CatalogProvider + ?Sized,
    T: HttpTransport + ?Sized,
    F: FnMut(SyncEvent),
{
    log::debug!("Updating episodes for season {season_number}");

    let episodes = match ctx.catalog.fetch_episodes(ctx.remote_id, season_number) {
        Ok(episodes) => episodes,
        Err(e) => {
            log::error!("Episodes update error: {e}");
            ctx.emit(SyncEvent::EpisodesFailed {
                season_number,
                reason: e.to_string(),
            });
            return;
        }
    };

    let known = season.episode_numbers();

    for record in episodes {
        let episode_number = record.episode_number;

        if !known.contains(&episode_number) {
            ctx.emit(SyncEvent::EpisodeSkipped {
                season_number,
                episode_number,
            });
            continue;
        }

        let Some(episode) = season.episode_mut(episode_number) else {
            continue;
        };

        let title = apply_episode_fields(&record, episode);
        ctx.attach(
            record.thumb_url.as_deref(),
            &mut episode.thumbs,
            ArtworkKind::EpisodeThumb,
        );
        ctx.episodes_updated += 1;

        log::debug!("Updated S{season_number}E{episode_number}: {title}");
        ctx.emit(SyncEvent::EpisodeUpdated {
            season_number,
            episode_number,
            title,
        });
    }
}

/// Writes the scalar fields of an episode and returns the title written.
fn apply_episode_fields(record: &EpisodeRecord, episode: &mut HostEpisode) -> String {
    let title = compose_episode_title(
        record.episode_number,
        record.title.as_deref(),
        record.part_name.as_deref(),
    );

    episode.title = Some(title.clone());
    episode.summary = Some(record.summary.clone().unwrap_or_default());

    if let Some(date) = record.air_date.as_deref().and_then(parse_air_date) {
        episode.originally_available_at = Some(date);
    }

    if let Some(millis) = record.duration_minutes.and_then(duration_millis) {
        episode.duration = Some(millis);
    }

    title
}
