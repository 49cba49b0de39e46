use asteroid_explorer::api::AstroSource;
use asteroid_explorer::error::{ApiError, ExportError};
use asteroid_explorer::handlers::{self, FUTURE_PICTURE_MESSAGE, PICTURE_ERROR_MESSAGE};
use asteroid_explorer::models::{AsteroidFeed, AsteroidObservation, DailyPicture};
use chrono::NaiveDate;
use std::sync::Mutex;

/// Canned upstream that records the dates it was asked for.
#[derive(Default)]
struct StubSource {
    feed: Option<AsteroidFeed>,
    picture: Option<DailyPicture>,
    calls: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl AstroSource for StubSource {
    async fn fetch_asteroids(&self, start: NaiveDate, end: NaiveDate) -> Result<AsteroidFeed, ApiError> {
        self.calls.lock().unwrap().push((start, end));
        self.feed
            .clone()
            .ok_or_else(|| ApiError::MalformedResponse("no near_earth_objects in response".to_string()))
    }

    async fn fetch_daily_picture(&self, date: NaiveDate) -> Result<DailyPicture, ApiError> {
        self.calls.lock().unwrap().push((date, date));
        self.picture
            .clone()
            .ok_or_else(|| ApiError::MalformedResponse("picture response is not an object".to_string()))
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn observation(name: &str, hazardous: bool) -> AsteroidObservation {
    AsteroidObservation {
        id: name.to_string(),
        name: name.to_string(),
        estimated_diameter_km: 0.1,
        is_potentially_hazardous: hazardous,
        close_approach_date: Some(d(2024, 3, 2)),
        miss_distance_km: 5_000_000.0,
        orbiting_body: Some("Earth".to_string()),
    }
}

fn feed(observations: Vec<AsteroidObservation>, skipped: usize) -> AsteroidFeed {
    AsteroidFeed { observations, skipped }
}

fn picture(title: &str, date: Option<NaiveDate>) -> DailyPicture {
    DailyPicture {
        title: title.to_string(),
        date,
        media_type: "image".to_string(),
        url: Some("https://apod.nasa.gov/apod/image/x.jpg".to_string()),
        ..DailyPicture::placeholder(d(2000, 1, 1))
    }
}

#[tokio::test]
async fn list_fetches_clamped_range() {
    let source = StubSource {
        feed: Some(feed(vec![observation("a", true), observation("b", false)], 1)),
        ..Default::default()
    };

    let view = handlers::list_asteroids(&source, Some(d(2024, 3, 1)), Some(d(2024, 3, 20)), d(2024, 1, 1)).await;

    assert_eq!(source.calls.lock().unwrap().as_slice(), &[(d(2024, 3, 1), d(2024, 3, 8))]);
    assert_eq!(view.observations.len(), 2);
    assert_eq!(view.hazardous_count(), 1);
    assert_eq!(view.skipped, 1);
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn list_defaults_to_week_from_today() {
    let source = StubSource {
        feed: Some(AsteroidFeed::default()),
        ..Default::default()
    };

    let view = handlers::list_asteroids(&source, None, None, d(2024, 6, 10)).await;
    assert_eq!((view.range.start, view.range.end), (d(2024, 6, 10), d(2024, 6, 17)));
    assert!(view.observations.is_empty());
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn list_failure_renders_empty_with_message() {
    let source = StubSource::default();

    let view = handlers::list_asteroids(&source, Some(d(2024, 3, 10)), Some(d(2024, 3, 5)), d(2024, 1, 1)).await;

    assert!(view.observations.is_empty());
    assert_eq!(view.range.end, d(2024, 3, 10));
    let error = view.error.unwrap();
    assert!(error.starts_with("Error fetching asteroid data:"), "{error}");
}

#[tokio::test]
async fn export_names_file_after_range() {
    let source = StubSource {
        feed: Some(feed(vec![observation("a", true)], 0)),
        ..Default::default()
    };

    let artifact = handlers::export_asteroids(&source, Some(d(2024, 3, 1)), None, d(2024, 1, 1))
        .await
        .unwrap();

    assert_eq!(artifact.filename, "Asteroids_20240301_20240308.xlsx");
    assert_eq!(
        artifact.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(!artifact.bytes.is_empty());
}

#[tokio::test]
async fn export_failure_keeps_range_for_redirect() {
    let source = StubSource::default();

    let failure = handlers::export_asteroids(&source, Some(d(2024, 3, 1)), Some(d(2024, 3, 3)), d(2024, 1, 1))
        .await
        .unwrap_err();

    assert_eq!((failure.range.start, failure.range.end), (d(2024, 3, 1), d(2024, 3, 3)));
    assert!(failure.message.starts_with("Error exporting asteroid data:"));
    assert!(matches!(failure.source, ExportError::Fetch(ApiError::MalformedResponse(_))));
}

#[tokio::test]
async fn picture_defaults_to_today_and_fills_missing_date() {
    let source = StubSource {
        picture: Some(picture("Galaxy", None)),
        ..Default::default()
    };

    let view = handlers::show_picture(&source, None, d(2024, 5, 5)).await;

    assert_eq!(view.date, d(2024, 5, 5));
    assert_eq!(view.picture.date, Some(d(2024, 5, 5)));
    assert_eq!(view.picture.title, "Galaxy");
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn future_picture_falls_back_to_today() {
    let source = StubSource {
        picture: Some(picture("Today", Some(d(2024, 5, 5)))),
        ..Default::default()
    };

    let view = handlers::show_picture(&source, Some(d(2030, 1, 1)), d(2024, 5, 5)).await;

    assert_eq!(source.calls.lock().unwrap().as_slice(), &[(d(2024, 5, 5), d(2024, 5, 5))]);
    assert_eq!(view.error.as_deref(), Some(FUTURE_PICTURE_MESSAGE));
    assert_eq!(view.picture.title, "Today");
}

#[tokio::test]
async fn picture_failure_shows_placeholder() {
    let source = StubSource::default();

    let view = handlers::show_picture(&source, Some(d(2023, 7, 4)), d(2024, 5, 5)).await;

    assert_eq!(view.error.as_deref(), Some(PICTURE_ERROR_MESSAGE));
    assert_eq!(view.picture, DailyPicture::placeholder(d(2023, 7, 4)));
}
