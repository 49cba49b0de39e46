use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{AsteroidFeed, AsteroidObservation, DailyPicture};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, error, info, warn};

const FEED_PATH: &str = "/neo/rest/v1/feed";
const APOD_PATH: &str = "/planetary/apod";
const APOD_ARCHIVE_URL: &str = "https://apod.nasa.gov/apod";
const QUERY_DATE: &str = "%Y-%m-%d";

/// The two upstream lookups the views depend on.
pub trait AstroSource {
    fn fetch_asteroids(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<AsteroidFeed, ApiError>> + Send;

    fn fetch_daily_picture(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DailyPicture, ApiError>> + Send;
}

/// NASA API client. One instance is shared by every request so connections
/// are reused; it holds no per-request state.
pub struct AstroClient {
    client: Client,
    base_url: String,
    api_key: String,
    probe_media_url: bool,
}

impl AstroClient {
    // No timeout is set: a stalled upstream stalls the request that hit it.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key.clone(),
            probe_media_url: config.probe_media_url,
        })
    }

    pub fn feed_request(&self, start: NaiveDate, end: NaiveDate) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, FEED_PATH))
            .query(&[
                ("start_date", start.format(QUERY_DATE).to_string()),
                ("end_date", end.format(QUERY_DATE).to_string()),
                ("api_key", self.api_key.clone()),
            ])
    }

    pub fn picture_request(&self, date: NaiveDate) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, APOD_PATH))
            .query(&[
                ("date", date.format(QUERY_DATE).to_string()),
                ("api_key", self.api_key.clone()),
            ])
    }

    async fn get_json(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let body = request.send().await?.error_for_status()?.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(serde_json::from_str(&body)?)
    }

    async fn load_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<AsteroidFeed, ApiError> {
        let body = self.get_json(self.feed_request(start, end)).await?;
        parse_feed(&body)
    }

    async fn load_picture(&self, date: NaiveDate) -> Result<DailyPicture, ApiError> {
        let body = self.get_json(self.picture_request(date)).await?;
        parse_daily_picture(&body, date)
    }

    /// Best-effort GET of the resolved media URL. The outcome is only logged.
    async fn probe(&self, url: &str) {
        match self.client.get(url).send().await {
            Ok(res) => info!("Media URL check for {}: {}", url, res.status()),
            Err(e) => warn!("Media URL check for {} failed: {}", url, e),
        }
    }
}

impl AstroSource for AstroClient {
    async fn fetch_asteroids(&self, start: NaiveDate, end: NaiveDate) -> Result<AsteroidFeed, ApiError> {
        info!("Fetching asteroid feed {}{} for {} to {}", self.base_url, FEED_PATH, start, end);

        match self.load_feed(start, end).await {
            Ok(feed) => {
                info!("Feed returned {} observations", feed.observations.len());
                Ok(feed)
            }
            Err(e) => {
                error!("Error fetching asteroids: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_daily_picture(&self, date: NaiveDate) -> Result<DailyPicture, ApiError> {
        info!("Fetching picture of the day {}{} for {}", self.base_url, APOD_PATH, date);

        let picture = match self.load_picture(date).await {
            Ok(p) => p,
            Err(e) => {
                error!("Error fetching picture of the day: {}", e);
                return Err(e);
            }
        };
        debug!(
            "Picture '{}' media_type={} url={:?} hd_url={:?}",
            picture.title, picture.media_type, picture.url, picture.hd_url
        );

        if self.probe_media_url {
            if let Some(url) = picture.url.as_deref().filter(|u| !u.is_empty()) {
                self.probe(url).await;
            }
        }

        Ok(picture)
    }
}

/// Flattens a feed response into observations.
///
/// `near_earth_objects` must be present; an empty map is a valid empty feed.
/// Entries that fail to decode are logged and counted in `skipped`.
pub fn parse_feed(body: &Value) -> Result<AsteroidFeed, ApiError> {
    let by_date = body
        .get("near_earth_objects")
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::MalformedResponse("no near_earth_objects in response".to_string()))?;

    if let Some(count) = body.get("element_count").and_then(Value::as_u64) {
        debug!("Feed reports element_count={}", count);
    }

    let mut feed = AsteroidFeed::default();
    for (day, entries) in by_date {
        let Some(entries) = entries.as_array() else {
            warn!("Feed entry for {} is not a list, ignoring", day);
            continue;
        };

        for entry in entries {
            match AsteroidObservation::try_from(entry) {
                Ok(obs) => feed.observations.push(obs),
                Err(e) => {
                    warn!("Error processing asteroid on {}: {}", day, e);
                    feed.skipped += 1;
                }
            }
        }
    }

    if feed.skipped > 0 {
        warn!("Skipped {} undecodable feed entries", feed.skipped);
    }
    Ok(feed)
}

/// Decodes a picture-of-the-day response for the `requested` date.
///
/// For media type "other" without a URL, the URL falls back to the APOD
/// archive page of the requested date.
pub fn parse_daily_picture(body: &Value, requested: NaiveDate) -> Result<DailyPicture, ApiError> {
    if !body.is_object() {
        return Err(ApiError::MalformedResponse("picture response is not an object".to_string()));
    }

    let mut picture = DailyPicture::from(body);

    if picture.is_other_media() && !picture.has_url() {
        picture.url = Some(archive_url(requested));
    }
    Ok(picture)
}

/// `https://apod.nasa.gov/apod/apYYMMDD.html`
pub fn archive_url(date: NaiveDate) -> String {
    format!("{}/ap{}.html", APOD_ARCHIVE_URL, date.format("%y%m%d"))
}
