//! Series-level field mapping

use super::dates::release_date;
use super::{ArtworkKind, SyncContext, SyncEvent};
use crate::catalog::{CatalogError, CatalogProvider, SeriesRecord};
use crate::host::HostSeries;
use crate::transport::HttpTransport;

/// Fetches the series record and writes it into `host`.
///
/// A missing record leaves every series field as it was and is not an error;
/// the update carries on with seasons. Only a failed request is returned.
pub(super) fn sync_series<P, T, F>(
    ctx: &mut SyncContext<'_, P, T, F>,
    host: &mut HostSeries,
) -> Result<(), CatalogError>
where
    P: CatalogProvider + ?Sized,
    T: HttpTransport + ?Sized,
    F: FnMut(SyncEvent),
{
    let Some(record) = ctx.catalog.fetch_series(ctx.remote_id)? else {
        log::warn!("No series record for ID: {}", ctx.remote_id);
        ctx.emit(SyncEvent::SeriesMissing {
            remote_id: ctx.remote_id.to_string(),
        });
        return Ok(());
    };

    apply_series_fields(&record, host);

    ctx.attach(record.poster_url.as_deref(), &mut host.posters, ArtworkKind::Poster);
    ctx.attach(record.banner_url.as_deref(), &mut host.banners, ArtworkKind::Banner);
    ctx.attach(record.fanart_url.as_deref(), &mut host.art, ArtworkKind::Fanart);

    ctx.emit(SyncEvent::SeriesUpdated {
        remote_id: record.remote_id,
        title: record.title,
    });

    Ok(())
}

/// Overwrites the scalar fields and the genre set of `host`.
fn apply_series_fields(record: &SeriesRecord, host: &mut HostSeries) {
    host.title = record.title.clone();
    host.summary = record.summary.clone();
    host.studio = record.studio.clone();
    host.content_rating = record.content_rating.clone();

    // An unparseable year keeps the previous date
    match record.year.as_deref() {
        None => host.originally_available_at = None,
        Some(year) => {
            if let Some(date) = release_date(year) {
                host.originally_available_at = Some(date);
            }
        }
    }

    host.genres.clear();
    host.genres.extend(record.genres.iter().cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> SeriesRecord {
        SeriesRecord {
            remote_id: "ufc".to_string(),
            title: Some("UFC".to_string()),
            summary: Some("Mixed martial arts".to_string()),
            year: Some("1993".to_string()),
            studio: Some("Zuffa".to_string()),
            content_rating: Some("TV-14".to_string()),
            genres: vec!["MMA".to_string(), "Sports".to_string(), "MMA".to_string()],
            ..SeriesRecord::default()
        }
    }

    #[test]
    fn test_fields_are_overwritten() {
        let mut host = HostSeries::new();
        host.title = Some("Old".to_string());

        apply_series_fields(&record(), &mut host);

        assert_eq!(host.title.as_deref(), Some("UFC"));
        assert_eq!(host.summary.as_deref(), Some("Mixed martial arts"));
        assert_eq!(host.studio.as_deref(), Some("Zuffa"));
        assert_eq!(host.content_rating.as_deref(), Some("TV-14"));
        assert_eq!(host.originally_available_at, NaiveDate::from_ymd_opt(1993, 1, 1));
        assert_eq!(host.genres.len(), 2);
    }

    #[test]
    fn test_genres_are_replaced_not_merged() {
        let mut host = HostSeries::new();
        host.genres.insert("Boxing".to_string());

        apply_series_fields(&record(), &mut host);

        assert!(!host.genres.contains("Boxing"));
        assert!(host.genres.contains("MMA"));
    }

    #[test]
    fn test_year_handling() {
        let previous = NaiveDate::from_ymd_opt(2000, 1, 1);

        let mut host = HostSeries::new();
        host.originally_available_at = previous;
        let mut bad_year = record();
        bad_year.year = Some("TBD".to_string());
        apply_series_fields(&bad_year, &mut host);
        assert_eq!(host.originally_available_at, previous);

        let mut no_year = record();
        no_year.year = None;
        apply_series_fields(&no_year, &mut host);
        assert_eq!(host.originally_available_at, None);
    }
}
