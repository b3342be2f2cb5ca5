use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::extract::{self, TEMPERATURE_PARAMETER};
use crate::model::{Coordinate, TemperatureSeries};

use super::{ResolverError, TemperatureProvider, truncate_body};

const POWER_BASE_URL: &str = "https://power.larc.nasa.gov/api";
const DEFAULT_COMMUNITY: &str = "SB";

/// NASA POWER temporal-point API client.
///
/// Daily data typically lags 1-2 days behind, so both windows end
/// yesterday: the daily lookup reaches 7 days back to find the most
/// recent populated slot, the hourly lookup 2 days to cover a full day
/// of points.
#[derive(Debug, Clone)]
pub struct PowerProvider {
    http: Client,
    base_url: String,
    community: String,
}

impl PowerProvider {
    pub fn new() -> Self {
        Self::with_base_url(POWER_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            community: DEFAULT_COMMUNITY.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut provider = match &config.base_url {
            Some(base_url) => Self::with_base_url(base_url.clone()),
            None => Self::new(),
        };
        provider.community = config.community.clone();
        provider
    }

    /// 7-day daily window ending yesterday, as compact date codes.
    fn daily_window(today: NaiveDate) -> (String, String) {
        let end = today - Duration::days(1);
        let start = end - Duration::days(6);
        (compact_date(start), compact_date(end))
    }

    /// 2-day hourly window ending yesterday.
    fn hourly_window(today: NaiveDate) -> (String, String) {
        let end = today - Duration::days(1);
        let start = end - Duration::days(1);
        (compact_date(start), compact_date(end))
    }

    async fn fetch(
        &self,
        cadence: &str,
        coord: Coordinate,
        start: &str,
        end: &str,
    ) -> Result<String, ResolverError> {
        let url = format!("{}/temporal/{}/point", self.base_url, cadence);
        let latitude = coord.latitude.to_string();
        let longitude = coord.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("parameters", TEMPERATURE_PARAMETER),
                ("community", self.community.as_str()),
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("start", start),
                ("end", end),
                ("format", "JSON"),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ResolverError::Http {
                status,
                excerpt: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

impl Default for PowerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemperatureProvider for PowerProvider {
    async fn resolve_current(&self, coord: Coordinate) -> Result<Option<f64>, ResolverError> {
        let (start, end) = Self::daily_window(Utc::now().date_naive());
        let body = self.fetch("daily", coord, &start, &end).await?;

        // Past the HTTP check, every failure mode is an absence: remote
        // gaps are common and must not be treated as fatal.
        let doc: Value = match serde_json::from_str(&body) {
            Ok(doc) => doc,
            Err(err) => {
                warn!("Daily response was not valid JSON: {err}");
                return Ok(None);
            }
        };

        let fill = extract::fill_value(&doc);
        let result = extract::scalar_from_daily(&doc, TEMPERATURE_PARAMETER, fill);
        match result {
            Some(celsius) => debug!(celsius, "Resolved current temperature"),
            None => warn!("No temperature candidate survived extraction"),
        }
        Ok(result)
    }

    async fn resolve_hourly(&self, coord: Coordinate) -> Option<TemperatureSeries> {
        let (start, end) = Self::hourly_window(Utc::now().date_naive());
        let body = match self.fetch("hourly", coord, &start, &end).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Hourly lookup failed: {err}");
                return None;
            }
        };

        let doc: Value = match serde_json::from_str(&body) {
            Ok(doc) => doc,
            Err(err) => {
                warn!("Hourly response was not valid JSON: {err}");
                return None;
            }
        };

        let fill = extract::fill_value(&doc);
        let series = extract::hourly_from_doc(&doc, TEMPERATURE_PARAMETER, fill, Utc::now());
        if series.is_none() {
            warn!("No hourly series found in response");
        }
        series
    }
}

fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
