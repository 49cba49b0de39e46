use crate::decode::{self, DEFAULT_DIAMETER_KM, DEFAULT_HAZARDOUS, DEFAULT_MISS_DISTANCE_KM, DEFAULT_TEXT};
use crate::error::FieldError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One near-Earth object close approach, flattened from a feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidObservation {
    pub id: String,
    pub name: String,
    pub estimated_diameter_km: f64,
    pub is_potentially_hazardous: bool,
    pub close_approach_date: Option<NaiveDate>,
    pub miss_distance_km: f64,
    pub orbiting_body: Option<String>,
}

/// The astronomy picture of the day for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPicture {
    pub copyright: Option<String>,
    pub date: Option<NaiveDate>,
    pub explanation: Option<String>,
    pub hd_url: Option<String>,
    pub media_type: String,
    pub service_version: String,
    pub title: String,
    pub url: Option<String>,
}

/// Result of one feed request. `skipped` counts entries that failed to decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsteroidFeed {
    pub observations: Vec<AsteroidObservation>,
    pub skipped: usize,
}

// Decode one entry of the `near_earth_objects` arrays. Missing fields take the
// defaults from `decode`; a present but undecodable field rejects the entry.
impl TryFrom<&Value> for AsteroidObservation {
    type Error = FieldError;

    fn try_from(data: &Value) -> Result<Self, Self::Error> {
        Ok(Self {
            id: decode::text(data, decode::NEO_ID)?.unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            name: decode::text(data, decode::NEO_NAME)?
                .unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            estimated_diameter_km: decode::number(data, decode::NEO_DIAMETER_MAX_KM)?
                .unwrap_or(DEFAULT_DIAMETER_KM),
            is_potentially_hazardous: decode::flag(data, decode::NEO_HAZARDOUS)?
                .unwrap_or(DEFAULT_HAZARDOUS),
            // The feed can list many approach events per body; only the first
            // one is surfaced.
            close_approach_date: decode::date(data, decode::NEO_APPROACH_DATE)?,
            miss_distance_km: decode::number(data, decode::NEO_MISS_DISTANCE_KM)?
                .unwrap_or(DEFAULT_MISS_DISTANCE_KM),
            orbiting_body: decode::text(data, decode::NEO_ORBITING_BODY)?,
        })
    }
}

// Every picture field is optional. A field of the wrong type is logged and
// treated as absent so the rest of the picture still shows.
impl From<&Value> for DailyPicture {
    fn from(data: &Value) -> Self {
        let field = |pointer: &'static str| -> Option<String> {
            decode::text(data, pointer).unwrap_or_else(|e| {
                warn!("Ignoring picture field: {}", e);
                None
            })
        };
        let text_or_default = |pointer: &'static str| field(pointer).unwrap_or_else(|| DEFAULT_TEXT.to_string());

        Self {
            copyright: field(decode::APOD_COPYRIGHT),
            // An unreadable date is left for the caller to fill in.
            date: decode::date(data, decode::APOD_DATE).unwrap_or_else(|e| {
                warn!("Ignoring picture field: {}", e);
                None
            }),
            explanation: field(decode::APOD_EXPLANATION),
            hd_url: field(decode::APOD_HD_URL),
            media_type: text_or_default(decode::APOD_MEDIA_TYPE),
            service_version: text_or_default(decode::APOD_SERVICE_VERSION),
            title: text_or_default(decode::APOD_TITLE),
            url: field(decode::APOD_URL),
        }
    }
}

impl DailyPicture {
    /// An empty picture shown when the upstream request failed.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            copyright: None,
            date: Some(date),
            explanation: None,
            hd_url: None,
            media_type: DEFAULT_TEXT.to_string(),
            service_version: DEFAULT_TEXT.to_string(),
            title: DEFAULT_TEXT.to_string(),
            url: None,
        }
    }

    pub fn is_other_media(&self) -> bool {
        self.media_type.eq_ignore_ascii_case("other")
    }

    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_feed_entry_decodes() {
        let entry = json!({
            "id": "2465633",
            "name": "465633 (2009 JR5)",
            "estimated_diameter": { "kilometers": { "estimated_diameter_max": 0.482 } },
            "is_potentially_hazardous_asteroid": true,
            "close_approach_data": [
                {
                    "close_approach_date": "2024-03-10",
                    "miss_distance": { "kilometers": "45290298.225725659" },
                    "orbiting_body": "Earth"
                },
                {
                    "close_approach_date": "2031-09-01",
                    "miss_distance": { "kilometers": "1.0" },
                    "orbiting_body": "Mars"
                }
            ]
        });

        let obs = AsteroidObservation::try_from(&entry).unwrap();
        assert_eq!(obs.id, "2465633");
        assert_eq!(obs.name, "465633 (2009 JR5)");
        assert_eq!(obs.estimated_diameter_km, 0.482);
        assert!(obs.is_potentially_hazardous);
        assert_eq!(obs.close_approach_date, NaiveDate::from_ymd_opt(2024, 3, 10));
        assert!((obs.miss_distance_km - 45_290_298.225_725_66).abs() < 1e-3);
        assert_eq!(obs.orbiting_body.as_deref(), Some("Earth"));
    }

    #[test]
    fn empty_feed_entry_takes_defaults() {
        let obs = AsteroidObservation::try_from(&json!({})).unwrap();
        assert_eq!(obs.id, "");
        assert_eq!(obs.estimated_diameter_km, 0.0);
        assert!(!obs.is_potentially_hazardous);
        assert_eq!(obs.close_approach_date, None);
        assert_eq!(obs.miss_distance_km, 0.0);
        assert_eq!(obs.orbiting_body, None);
    }

    #[test]
    fn bad_miss_distance_rejects_entry() {
        let entry = json!({
            "name": "bad",
            "close_approach_data": [{ "miss_distance": { "kilometers": "n/a" } }]
        });
        assert!(AsteroidObservation::try_from(&entry).is_err());
    }

    #[test]
    fn picture_with_unreadable_date_keeps_other_fields() {
        let data = json!({
            "date": "not a date",
            "title": "Pillars",
            "media_type": "image",
            "url": "https://apod.nasa.gov/apod/image/pillars.jpg"
        });
        let pic = DailyPicture::from(&data);
        assert_eq!(pic.date, None);
        assert_eq!(pic.title, "Pillars");
        assert!(pic.has_url());
        assert_eq!(pic.copyright, None);
        assert_eq!(pic.service_version, "");
    }

    #[test]
    fn wrong_typed_picture_field_is_dropped() {
        let data = json!({
            "title": "Pillars",
            "media_type": "image",
            "url": "https://apod.nasa.gov/apod/image/pillars.jpg",
            "copyright": { "name": "A" },
            "service_version": ["v1"]
        });
        let pic = DailyPicture::from(&data);
        assert_eq!(pic.copyright, None);
        assert_eq!(pic.service_version, "");
        assert_eq!(pic.title, "Pillars");
        assert!(pic.has_url());
    }

    #[test]
    fn other_media_is_case_insensitive() {
        let mut pic = DailyPicture::placeholder(NaiveDate::from_ymd_opt(2023, 7, 4).unwrap());
        pic.media_type = "OTHER".to_string();
        assert!(pic.is_other_media());
        pic.url = Some(String::new());
        assert!(!pic.has_url());
    }
}
