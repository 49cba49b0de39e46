//! The three user actions: list asteroids, export asteroids, show the picture
//! of the day.
//!
//! Each action takes optional dates, issues its upstream calls in sequence and
//! always produces something displayable. Fetch failures become an empty view
//! with a message instead of an error.

use crate::api::AstroSource;
use crate::error::ExportError;
use crate::export::{self, ExportArtifact};
use crate::models::{AsteroidObservation, DailyPicture};
use crate::range::DateRange;
use chrono::NaiveDate;
use tracing::{error, warn};

pub const FUTURE_PICTURE_MESSAGE: &str = "Cannot view APOD for future dates. Please select a date up to today.";
pub const PICTURE_ERROR_MESSAGE: &str =
    "An error occurred while fetching the Astronomy Picture of the Day. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidsView {
    pub range: DateRange,
    pub observations: Vec<AsteroidObservation>,
    pub skipped: usize,
    pub error: Option<String>,
}

impl AsteroidsView {
    pub fn hazardous_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_potentially_hazardous).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PictureView {
    pub date: NaiveDate,
    pub picture: DailyPicture,
    pub error: Option<String>,
}

/// A failed export. The caller goes back to the list for `range` and shows
/// `message` there.
#[derive(Debug)]
pub struct ExportFailure {
    pub range: DateRange,
    pub message: String,
    pub source: ExportError,
}

impl ExportFailure {
    pub fn new(range: DateRange, source: ExportError) -> Self {
        error!("Export for {} failed: {}", range, source);
        Self {
            range,
            message: format!("Error exporting asteroid data: {}", source),
            source,
        }
    }
}

pub async fn list_asteroids<S: AstroSource>(
    source: &S,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> AsteroidsView {
    let range = DateRange::normalize(start, end, today);

    match source.fetch_asteroids(range.start, range.end).await {
        Ok(feed) => AsteroidsView {
            range,
            observations: feed.observations,
            skipped: feed.skipped,
            error: None,
        },
        Err(e) => AsteroidsView {
            range,
            observations: Vec::new(),
            skipped: 0,
            error: Some(format!("Error fetching asteroid data: {}", e)),
        },
    }
}

pub async fn export_asteroids<S: AstroSource>(
    source: &S,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<ExportArtifact, ExportFailure> {
    let range = DateRange::normalize(start, end, today);

    let exported = match source.fetch_asteroids(range.start, range.end).await {
        Ok(feed) => export::export_asteroids_to_spreadsheet(&feed.observations, &range),
        Err(e) => Err(ExportError::from(e)),
    };

    exported.map_err(|e| ExportFailure::new(range, e))
}

pub async fn show_picture<S: AstroSource>(source: &S, date: Option<NaiveDate>, today: NaiveDate) -> PictureView {
    let mut error = None;
    let mut date = date.unwrap_or(today);
    if date > today {
        warn!("Picture requested for future date {}, using {}", date, today);
        error = Some(FUTURE_PICTURE_MESSAGE.to_string());
        date = today;
    }

    match source.fetch_daily_picture(date).await {
        Ok(mut picture) => {
            picture.date.get_or_insert(date);
            PictureView { date, picture, error }
        }
        Err(e) => {
            error!("Error in picture action: {}", e);
            PictureView {
                date,
                picture: DailyPicture::placeholder(date),
                error: Some(PICTURE_ERROR_MESSAGE.to_string()),
            }
        }
    }
}
