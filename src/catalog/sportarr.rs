/// Sportarr catalog client implementation.
use super::sportarr_types::{
    SportarrEpisode, SportarrEpisodesResponse, SportarrSearchHit, SportarrSearchResponse,
    SportarrSeason, SportarrSeasonsResponse, SportarrSeries,
};
use super::{
    CatalogError, CatalogProvider, EpisodeRecord, SearchHit, SearchHits, SeasonRecord,
    SeriesRecord,
};
use crate::transport::HttpTransport;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Path prefix of the metadata API below the base URL
const API_PATH: [&str; 3] = ["api", "metadata", "plex"];

/// Catalog client for the Sportarr metadata API.
///
/// Requests go through the injected transport; responses are decoded into
/// wire types and converted to records with defaults applied.
pub struct SportarrCatalog<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> SportarrCatalog<T> {
    /// Creates a catalog client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// The transport used for catalog requests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds `{base}/api/metadata/plex/{segments...}`, percent-encoding
    /// each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CatalogError::InvalidData(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::InvalidData(format!("Base URL '{}' cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(API_PATH)
            .extend(segments);

        Ok(url)
    }

    fn get_json<R: DeserializeOwned>(&self, url: &Url) -> Result<R, CatalogError> {
        log::debug!("Catalog request: {url}");

        let body = self.transport.get_text(url.as_str())?;

        serde_json::from_str(&body).map_err(|e| CatalogError::ParseError {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn convert_hit(value: serde_json::Value) -> Result<SearchHit, CatalogError> {
        let hit: SportarrSearchHit =
            serde_json::from_value(value).map_err(|e| CatalogError::InvalidData(e.to_string()))?;

        let remote_id = hit
            .id
            .map(|id| id.render())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::InvalidData("Search hit without an id".to_string()))?;

        Ok(SearchHit {
            remote_id,
            title: hit.title.unwrap_or_default(),
            year: hit.year.and_then(|y| y.render().parse().ok()),
        })
    }

    fn convert_series(remote_id: &str, series: SportarrSeries) -> SeriesRecord {
        SeriesRecord {
            remote_id: remote_id.to_string(),
            title: series.title,
            summary: series.summary,
            year: series.year.map(|y| y.render()).and_then(non_empty),
            studio: series.studio,
            content_rating: series.content_rating,
            genres: series.genres.unwrap_or_default(),
            poster_url: series.poster_url.and_then(non_empty),
            banner_url: series.banner_url.and_then(non_empty),
            fanart_url: series.fanart_url.and_then(non_empty),
        }
    }

    fn convert_season(value: serde_json::Value) -> Option<SeasonRecord> {
        let season: SportarrSeason = decode_entry(value, "season")?;

        let Some(number) = season.season_number else {
            log::debug!("Dropping season without a season number");
            return None;
        };
        let Some(season_number) = number.as_u32() else {
            log::warn!("Dropping season with invalid season number '{}'", number.render());
            return None;
        };

        Some(SeasonRecord {
            season_number,
            title: season.title,
            summary: season.summary,
            poster_url: season.poster_url.and_then(non_empty),
        })
    }

    fn convert_episode(value: serde_json::Value) -> Option<EpisodeRecord> {
        let episode: SportarrEpisode = decode_entry(value, "episode")?;

        let Some(number) = episode.episode_number else {
            log::debug!("Dropping episode without an episode number");
            return None;
        };
        let Some(episode_number) = number.as_u32() else {
            log::warn!("Dropping episode with invalid episode number '{}'", number.render());
            return None;
        };

        Some(EpisodeRecord {
            episode_number,
            title: episode.title,
            part_name: episode.part_name.filter(|part| !part.is_empty()),
            summary: episode.summary,
            air_date: episode.air_date.and_then(non_empty),
            duration_minutes: episode.duration_minutes.and_then(|d| d.as_f64()),
            thumb_url: episode.thumb_url.and_then(non_empty),
        })
    }
}

impl<T: HttpTransport> CatalogProvider for SportarrCatalog<T> {
    fn search(&self, title: &str, year: Option<i32>) -> Result<SearchHits, CatalogError> {
        let mut url = self.endpoint(&["search"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("title", title);
            if let Some(year) = year {
                query.append_pair("year", &year.to_string());
            }
        }

        let response: SportarrSearchResponse = self.get_json(&url)?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_hit)
            .collect())
    }

    fn fetch_series(&self, remote_id: &str) -> Result<Option<SeriesRecord>, CatalogError> {
        let url = self.endpoint(&["series", remote_id])?;

        // Decode loosely first: `null` and `{}` both mean "no record"
        let value: serde_json::Value = self.get_json(&url)?;
        let is_empty = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_empty {
            return Ok(None);
        }

        let series: SportarrSeries =
            serde_json::from_value(value).map_err(|e| CatalogError::ParseError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(Self::convert_series(remote_id, series)))
    }

    fn fetch_seasons(&self, remote_id: &str) -> Result<Vec<SeasonRecord>, CatalogError> {
        let url = self.endpoint(&["series", remote_id, "seasons"])?;
        let response: SportarrSeasonsResponse = self.get_json(&url)?;

        Ok(response
            .seasons
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::convert_season)
            .collect())
    }

    fn fetch_episodes(
        &self,
        remote_id: &str,
        season_number: u32,
    ) -> Result<Vec<EpisodeRecord>, CatalogError> {
        let season = season_number.to_string();
        let url = self.endpoint(&["series", remote_id, "season", &season, "episodes"])?;
        let response: SportarrEpisodesResponse = self.get_json(&url)?;

        Ok(response
            .episodes
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::convert_episode)
            .collect())
    }
}

/// Decodes one list entry, dropping it with a warning if it doesn't fit.
fn decode_entry<R: DeserializeOwned>(value: serde_json::Value, kind: &str) -> Option<R> {
    match serde_json::from_value(value) {
        Ok(entry) => Some(entry),
        Err(e) => {
            log::warn!("Dropping malformed {kind}: {e}");
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
