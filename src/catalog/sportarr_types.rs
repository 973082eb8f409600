/// Sportarr catalog API response types for deserialization.
///
/// These structures mirror the JSON response format of the
/// `/api/metadata/plex` endpoints. Every field is optional on the wire;
/// defaults are applied when converting to records.
use serde::Deserialize;

/// The top-level response from the search endpoint.
///
/// Hits are kept as raw JSON so that one malformed hit does not discard
/// the hits before it.
#[derive(Debug, Deserialize)]
pub(super) struct SportarrSearchResponse {
    pub results: Option<Vec<serde_json::Value>>,
}

/// A single search hit.
#[derive(Debug, Deserialize)]
pub(super) struct SportarrSearchHit {
    pub id: Option<NumberOrText>,
    pub title: Option<String>,
    pub year: Option<NumberOrText>,
}

/// The series endpoint body.
#[derive(Debug, Deserialize)]
pub(super) struct SportarrSeries {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub year: Option<NumberOrText>,
    pub studio: Option<String>,
    pub content_rating: Option<String>,
    pub genres: Option<Vec<String>>,
    pub poster_url: Option<String>,
    pub banner_url: Option<String>,
    pub fanart_url: Option<String>,
}

/// The seasons endpoint body.
///
/// Seasons are decoded one at a time so a malformed entry only drops itself.
#[derive(Debug, Deserialize)]
pub(super) struct SportarrSeasonsResponse {
    pub seasons: Option<Vec<serde_json::Value>>,
}

/// A single season (for sports catalogs usually one per calendar year).
#[derive(Debug, Deserialize)]
pub(super) struct SportarrSeason {
    pub season_number: Option<NumberOrText>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub poster_url: Option<String>,
}

/// The episodes endpoint body.
#[derive(Debug, Deserialize)]
pub(super) struct SportarrEpisodesResponse {
    pub episodes: Option<Vec<serde_json::Value>>,
}

/// A single episode (one event, or one part of a multi-part event).
#[derive(Debug, Deserialize)]
pub(super) struct SportarrEpisode {
    pub episode_number: Option<NumberOrText>,
    pub title: Option<String>,
    /// Card name for multi-part events, e.g. "Prelims"
    pub part_name: Option<String>,
    pub summary: Option<String>,
    pub air_date: Option<String>,
    pub duration_minutes: Option<NumberOrText>,
    pub thumb_url: Option<String>,
}

/// Ids, numbers and durations are sent as JSON numbers by some catalog
/// versions and as strings by others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    /// Renders the value the way it appears in URLs and date strings.
    pub fn render(&self) -> String {
        match self {
            NumberOrText::Integer(n) => n.to_string(),
            NumberOrText::Float(f) => f.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }

    /// The value as a season or episode number, if it is a whole,
    /// non-negative number that fits.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            NumberOrText::Integer(n) => u32::try_from(*n).ok(),
            NumberOrText::Float(f) => {
                let whole = f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f);
                whole.then_some(*f as u32)
            }
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }

    /// The value as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Integer(n) => Some(*n as f64),
            NumberOrText::Float(f) => Some(*f),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}
