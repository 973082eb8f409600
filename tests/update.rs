mod common;

use chrono::NaiveDate;
use common::{FakeTransport, agent, api_url};
use sportarr_agent::{ArtworkKind, HostSeries, SyncEvent};

const SERIES: &str = r#"{
    "title": "UFC",
    "summary": "Ultimate Fighting Championship events",
    "year": 1993,
    "studio": "Zuffa",
    "content_rating": "TV-14",
    "genres": ["MMA", "Sports"],
    "poster_url": "https://img.test/ufc/poster.png",
    "banner_url": "https://img.test/ufc/banner.png",
    "fanart_url": "https://img.test/ufc/fanart.png"
}"#;

const SEASONS: &str = r#"{"seasons": [
    {"season_number": 2023, "summary": "The 2023 calendar"},
    {"season_number": 2024, "title": "2024 Season", "poster_url": "https://img.test/ufc/2024.png"},
    {"season_number": 2025, "title": "2025 Season"}
]}"#;

const EPISODES_2023: &str = r#"{"episodes": [
    {"episode_number": 1, "title": "UFC 284", "air_date": "2023-02-12"}
]}"#;

const EPISODES_2024: &str = r#"{"episodes": [
    {"episode_number": 1, "title": "UFC 300", "part_name": "Prelims",
     "summary": "Preliminary card", "air_date": "2024-04-13T22:00:00Z",
     "duration_minutes": 120, "thumb_url": "https://img.test/ufc/300-prelims.png"},
    {"episode_number": 2, "title": "UFC 300", "part_name": "Main Card",
     "duration_minutes": 45, "thumb_url": "https://img.test/ufc/300-main.png"},
    {"episode_number": 3, "title": "UFC 301"}
]}"#;

const IMAGES: [&str; 6] = [
    "https://img.test/ufc/poster.png",
    "https://img.test/ufc/banner.png",
    "https://img.test/ufc/fanart.png",
    "https://img.test/ufc/2024.png",
    "https://img.test/ufc/300-prelims.png",
    "https://img.test/ufc/300-main.png",
];

/// Catalog with one series, three seasons and every image available
fn catalog() -> FakeTransport {
    let transport = FakeTransport::new()
        .json("series/ufc", SERIES)
        .json("series/ufc/seasons", SEASONS)
        .json("series/ufc/season/2023/episodes", EPISODES_2023)
        .json("series/ufc/season/2024/episodes", EPISODES_2024);
    IMAGES.iter().fold(transport, |t, url| t.image(url))
}

/// Library that knows seasons 2023 (episode 1) and 2024 (episodes 1 and 2)
fn library() -> HostSeries {
    let mut series = HostSeries::new();
    series.add_season(2023).add_episode(1);
    let season = series.add_season(2024);
    season.add_episode(1);
    season.add_episode(2);
    series
}

fn collect_events(
    agent: &sportarr_agent::SportarrAgent<FakeTransport>,
    remote_id: &str,
    host: &mut HostSeries,
) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    agent.update_with_progress(remote_id, host, |event| events.push(event));
    events
}

#[test]
fn test_series_fields_are_written() {
    let agent = agent(catalog());
    let mut host = library();

    agent.update("ufc", &mut host);

    assert_eq!(host.title.as_deref(), Some("UFC"));
    assert_eq!(host.summary.as_deref(), Some("Ultimate Fighting Championship events"));
    assert_eq!(host.studio.as_deref(), Some("Zuffa"));
    assert_eq!(host.content_rating.as_deref(), Some("TV-14"));
    assert_eq!(host.originally_available_at, NaiveDate::from_ymd_opt(1993, 1, 1));
    assert_eq!(
        host.genres.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["MMA", "Sports"]
    );
    assert!(host.posters.contains("https://img.test/ufc/poster.png"));
    assert!(host.banners.contains("https://img.test/ufc/banner.png"));
    assert!(host.art.contains("https://img.test/ufc/fanart.png"));
}

#[test]
fn test_seasons_and_episodes_are_written() {
    let agent = agent(catalog());
    let mut host = library();

    agent.update("ufc", &mut host);

    let season_2023 = host.season(2023).unwrap();
    assert_eq!(season_2023.title.as_deref(), Some("Season 2023"));
    assert_eq!(season_2023.summary.as_deref(), Some("The 2023 calendar"));
    let episode = season_2023.episode(1).unwrap();
    assert_eq!(episode.title.as_deref(), Some("UFC 284"));
    assert_eq!(episode.originally_available_at, NaiveDate::from_ymd_opt(2023, 2, 12));
    assert_eq!(episode.duration, None);

    let season_2024 = host.season(2024).unwrap();
    assert_eq!(season_2024.title.as_deref(), Some("2024 Season"));
    assert_eq!(season_2024.summary.as_deref(), Some(""));
    assert!(season_2024.posters.contains("https://img.test/ufc/2024.png"));

    let prelims = season_2024.episode(1).unwrap();
    assert_eq!(prelims.title.as_deref(), Some("UFC 300 - Prelims"));
    assert_eq!(prelims.summary.as_deref(), Some("Preliminary card"));
    assert_eq!(prelims.originally_available_at, NaiveDate::from_ymd_opt(2024, 4, 13));
    assert_eq!(prelims.duration, Some(7_200_000));
    assert!(prelims.thumbs.contains("https://img.test/ufc/300-prelims.png"));

    let main_card = season_2024.episode(2).unwrap();
    assert_eq!(main_card.title.as_deref(), Some("UFC 300 - Main Card"));
    assert_eq!(main_card.duration, Some(2_700_000));
}

#[test]
fn test_unknown_seasons_and_episodes_are_never_created_or_fetched() {
    let agent = agent(catalog());
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    assert_eq!(host.season_numbers().into_iter().collect::<Vec<_>>(), vec![2023, 2024]);
    assert_eq!(
        host.season(2024).unwrap().episode_numbers().into_iter().collect::<Vec<_>>(),
        vec![1, 2]
    );

    let transport = agent.catalog().transport();
    assert!(!transport.was_requested(&api_url("series/ufc/season/2025/episodes")));

    assert!(events.contains(&SyncEvent::SeasonSkipped { season_number: 2025 }));
    assert!(events.contains(&SyncEvent::EpisodeSkipped {
        season_number: 2024,
        episode_number: 3
    }));
    assert_eq!(
        events.last(),
        Some(&SyncEvent::Complete {
            seasons_updated: 2,
            episodes_updated: 3
        })
    );
}

#[test]
fn test_requests_follow_series_season_episode_order() {
    let agent = agent(catalog());
    let mut host = library();

    agent.update("ufc", &mut host);

    let requests = agent.catalog().transport().requests();
    let position = |url: &str| requests.iter().position(|r| r == url).unwrap();

    assert!(position(&api_url("series/ufc")) < position(&api_url("series/ufc/seasons")));
    assert!(
        position(&api_url("series/ufc/seasons"))
            < position(&api_url("series/ufc/season/2023/episodes"))
    );
    assert!(
        position("https://img.test/ufc/2024.png")
            < position(&api_url("series/ufc/season/2024/episodes"))
    );
    // One request per list, never one per season or episode
    assert_eq!(requests.iter().filter(|r| r.ends_with("/seasons")).count(), 1);
}

#[test]
fn test_broken_poster_does_not_stop_other_images() {
    let transport = catalog().status("https://img.test/ufc/poster.png", 500);
    let agent = agent(transport);
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    assert!(host.posters.is_empty());
    assert!(host.banners.contains("https://img.test/ufc/banner.png"));
    assert!(host.art.contains("https://img.test/ufc/fanart.png"));
    let season = host.season(2024).unwrap();
    assert!(season.posters.contains("https://img.test/ufc/2024.png"));
    assert!(season.episode(1).unwrap().thumbs.contains("https://img.test/ufc/300-prelims.png"));
    assert!(season.episode(2).unwrap().thumbs.contains("https://img.test/ufc/300-main.png"));

    // Scalar fields are unaffected too
    assert_eq!(host.title.as_deref(), Some("UFC"));
    assert!(events.contains(&SyncEvent::ImageFailed {
        kind: ArtworkKind::Poster,
        url: "https://img.test/ufc/poster.png".to_string()
    }));
    assert!(matches!(events.last(), Some(SyncEvent::Complete { .. })));
}

#[test]
fn test_non_image_body_is_not_attached() {
    let transport = catalog().bytes("https://img.test/ufc/banner.png", b"<html>404</html>");
    let agent = agent(transport);
    let mut host = library();

    agent.update("ufc", &mut host);

    assert!(host.banners.is_empty());
    assert!(host.posters.contains("https://img.test/ufc/poster.png"));
}

#[test]
fn test_update_is_idempotent() {
    let agent = agent(catalog());
    let mut host = library();

    agent.update("ufc", &mut host);
    let first = host.clone();
    agent.update("ufc", &mut host);

    assert_eq!(host, first);
    assert_eq!(host.genres.len(), 2);
    assert_eq!(host.posters.len(), 1);
    assert_eq!(host.season(2024).unwrap().episode(1).unwrap().thumbs.len(), 1);
}

#[test]
fn test_genres_removed_remotely_are_removed_locally() {
    let mut host = library();
    host.genres.insert("Boxing".to_string());

    let agent = agent(catalog());
    agent.update("ufc", &mut host);

    assert!(!host.genres.contains("Boxing"));
}

#[test]
fn test_missing_series_record_still_syncs_seasons() {
    let transport = catalog().json("series/ufc", "null");
    let agent = agent(transport);
    let mut host = library();
    host.title = Some("Local title".to_string());

    let events = collect_events(&agent, "ufc", &mut host);

    assert_eq!(host.title.as_deref(), Some("Local title"));
    assert!(host.posters.is_empty());
    assert_eq!(host.season(2024).unwrap().title.as_deref(), Some("2024 Season"));
    assert_eq!(events[0], SyncEvent::SeriesMissing { remote_id: "ufc".to_string() });
    assert!(matches!(events.last(), Some(SyncEvent::Complete { .. })));
}

#[test]
fn test_series_request_failure_aborts_without_panicking() {
    let transport = catalog().api_status("series/ufc", 500);
    let agent = agent(transport);
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    assert_eq!(host, library());
    assert!(!agent.catalog().transport().was_requested(&api_url("series/ufc/seasons")));
    assert!(matches!(events.last(), Some(SyncEvent::Aborted { .. })));
}

#[test]
fn test_season_list_failure_keeps_series_fields() {
    let transport = catalog().json("series/ufc/seasons", "not json");
    let agent = agent(transport);
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    assert_eq!(host.title.as_deref(), Some("UFC"));
    assert!(host.posters.contains("https://img.test/ufc/poster.png"));
    assert_eq!(host.season(2024).unwrap().title, None);
    assert!(matches!(events.last(), Some(SyncEvent::Aborted { .. })));
}

#[test]
fn test_episode_list_failure_is_contained_to_its_season() {
    let transport = catalog().api_status("series/ufc/season/2023/episodes", 502);
    let agent = agent(transport);
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    let season_2023 = host.season(2023).unwrap();
    assert_eq!(season_2023.title.as_deref(), Some("Season 2023"));
    assert_eq!(season_2023.episode(1).unwrap().title, None);

    let season_2024 = host.season(2024).unwrap();
    assert_eq!(
        season_2024.episode(2).unwrap().title.as_deref(),
        Some("UFC 300 - Main Card")
    );
    assert!(events.iter().any(|e| matches!(
        e,
        SyncEvent::EpisodesFailed {
            season_number: 2023,
            ..
        }
    )));
    assert!(matches!(events.last(), Some(SyncEvent::Complete { .. })));
}

#[test]
fn test_malformed_entries_do_not_discard_their_siblings() {
    let transport = catalog()
        .json(
            "series/ufc/seasons",
            r#"{"seasons": [
                {"season_number": 2024, "title": "2024 Season"},
                {"season_number": "2023", "title": "2023 Season"},
                {"season_number": -1, "title": "Specials"},
                {"season_number": 2025, "title": ["not", "text"]}
            ]}"#,
        )
        .json(
            "series/ufc/season/2024/episodes",
            r#"{"episodes": [
                {"episode_number": 1, "title": "UFC 300"},
                {"episode_number": 2, "title": "UFC 300", "part_name": "Main Card", "duration_minutes": "45"},
                {"episode_number": 3, "title": {"bad": true}}
            ]}"#,
        );
    let agent = agent(transport);
    let mut host = library();

    let events = collect_events(&agent, "ufc", &mut host);

    assert_eq!(host.season(2024).unwrap().title.as_deref(), Some("2024 Season"));
    assert_eq!(host.season(2023).unwrap().title.as_deref(), Some("2023 Season"));

    let season_2024 = host.season(2024).unwrap();
    assert_eq!(season_2024.episode(1).unwrap().title.as_deref(), Some("UFC 300"));
    let main_card = season_2024.episode(2).unwrap();
    assert_eq!(main_card.title.as_deref(), Some("UFC 300 - Main Card"));
    assert_eq!(main_card.duration, Some(2_700_000));

    assert!(!events.iter().any(|e| matches!(e, SyncEvent::EpisodesFailed { .. })));
    assert!(matches!(events.last(), Some(SyncEvent::Complete { .. })));
}
