//! Open-Meteo forecast client
//!
//! Fetches hourly + daily forecasts and current conditions from the
//! Open-Meteo API and normalizes the parallel-array payload into the
//! record types in [`crate::data`]. Parsing is strict: any structural
//! inconsistency in the payload is rejected at this boundary instead of
//! propagating loosely-typed data inward.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{CurrentSnapshot, DailyRecord, ForecastBundle, HourlyRecord, TimePoint};

/// Base URL for the Open-Meteo API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Per-request timeout applied to the HTTP client
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Hourly fields requested from the provider
const HOURLY_FIELDS: &str = "temperature_2m,precipitation,weathercode,windspeed_10m";

/// Daily fields requested from the provider
const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

/// Smallest forecast horizon the UI offers
pub const MIN_HORIZON_DAYS: u8 = 3;
/// Largest forecast horizon the UI offers
pub const MAX_HORIZON_DAYS: u8 = 10;

/// Errors that can occur when fetching or normalizing a forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Network failure, timeout, non-2xx status, or an unreadable body
    #[error("forecast request failed: {0}")]
    FetchFailed(#[from] reqwest::Error),

    /// Structurally inconsistent payload: mismatched array lengths,
    /// missing required fields, or unparseable timestamps
    #[error("malformed forecast response: {0}")]
    MalformedResponse(String),
}

/// The fetch seam the cache depends on
///
/// Implemented by [`ForecastClient`] for real requests and by stubs in
/// tests, so the cache layer never needs network access to be exercised.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch a complete forecast bundle for one location and horizon
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        horizon_days: u8,
    ) -> Result<ForecastBundle, ForecastError>;
}

/// Client for fetching forecast data from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    timezone: Tz,
}

impl ForecastClient {
    /// Create a new client rendering forecasts in the given timezone
    ///
    /// # Errors
    /// Returns [`ForecastError::FetchFailed`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(timezone: Tz) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, timezone })
    }

    /// The timezone forecasts are requested and rendered in
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Fetch the forecast bundle for the given coordinates
    ///
    /// Issues exactly one request; `horizon_days` is expected to be within
    /// 3..=10, which the CLI boundary enforces. No retries are performed;
    /// callers that want a retry policy layer it on top.
    ///
    /// # Errors
    /// * [`ForecastError::FetchFailed`] on network/timeout/status/body
    ///   failures
    /// * [`ForecastError::MalformedResponse`] when the payload is
    ///   structurally inconsistent
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        horizon_days: u8,
    ) -> Result<ForecastBundle, ForecastError> {
        tracing::debug!(lat, lon, horizon_days, "requesting forecast");

        let response = self
            .client
            .get(OPEN_METEO_BASE_URL)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", self.timezone.name().to_string()),
                ("forecast_days", horizon_days.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        self.parse_response(payload)
    }

    /// Normalize a raw provider payload into a [`ForecastBundle`]
    fn parse_response(&self, payload: serde_json::Value) -> Result<ForecastBundle, ForecastError> {
        let raw: RawForecastResponse = serde_json::from_value(payload)
            .map_err(|e| ForecastError::MalformedResponse(e.to_string()))?;

        let offset = raw.utc_offset_seconds;

        let hourly = match &raw.hourly {
            Some(section) => parse_hourly(section, offset, self.timezone)?,
            None => Vec::new(),
        };
        let daily = match &raw.daily {
            Some(section) => parse_daily(section, offset, self.timezone)?,
            None => Vec::new(),
        };
        let current = raw
            .current_weather
            .as_ref()
            .map(|section| parse_current(section, offset, self.timezone))
            .transpose()?;

        Ok(ForecastBundle {
            hourly,
            daily,
            current,
        })
    }
}

#[async_trait]
impl ForecastProvider for ForecastClient {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        horizon_days: u8,
    ) -> Result<ForecastBundle, ForecastError> {
        self.fetch_forecast(lat, lon, horizon_days).await
    }
}

/// Zip the hourly parallel arrays into one record per index
///
/// Rejects the section if any value array disagrees with the timestamp
/// array's length; never truncates or pads.
fn parse_hourly(
    raw: &RawHourly,
    utc_offset_seconds: Option<i32>,
    tz: Tz,
) -> Result<Vec<HourlyRecord>, ForecastError> {
    let len = raw.time.len();

    if raw.temperature_2m.len() != len
        || raw.precipitation.len() != len
        || raw.weathercode.len() != len
        || raw.windspeed_10m.len() != len
    {
        return Err(ForecastError::MalformedResponse(
            "hourly arrays have mismatched lengths".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let local = parse_local_datetime(&raw.time[i])?;
        records.push(HourlyRecord {
            time: to_time_point(local, utc_offset_seconds, tz)?,
            temperature: raw.temperature_2m[i],
            precipitation: raw.precipitation[i],
            weather_code: raw.weathercode[i],
            wind_speed: raw.windspeed_10m[i],
        });
    }

    Ok(records)
}

/// Zip the daily parallel arrays into one record per index
fn parse_daily(
    raw: &RawDaily,
    utc_offset_seconds: Option<i32>,
    tz: Tz,
) -> Result<Vec<DailyRecord>, ForecastError> {
    let len = raw.time.len();

    if raw.weathercode.len() != len
        || raw.temperature_2m_max.len() != len
        || raw.temperature_2m_min.len() != len
        || raw.precipitation_sum.len() != len
        || raw.windspeed_10m_max.len() != len
    {
        return Err(ForecastError::MalformedResponse(
            "daily arrays have mismatched lengths".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let date = parse_local_date(&raw.time[i])?;
        records.push(DailyRecord {
            date: to_time_point(date.and_time(NaiveTime::MIN), utc_offset_seconds, tz)?,
            weather_code: raw.weathercode[i],
            temp_max: raw.temperature_2m_max[i],
            temp_min: raw.temperature_2m_min[i],
            precipitation_sum: raw.precipitation_sum[i],
            wind_speed_max: raw.windspeed_10m_max[i],
        });
    }

    Ok(records)
}

/// Normalize the optional current-conditions block
fn parse_current(
    raw: &RawCurrentWeather,
    utc_offset_seconds: Option<i32>,
    tz: Tz,
) -> Result<CurrentSnapshot, ForecastError> {
    let local = parse_local_datetime(&raw.time)?;

    Ok(CurrentSnapshot {
        temperature: raw.temperature,
        weather_code: raw.weathercode,
        wind_speed: raw.windspeed,
        observed_at: to_time_point(local, utc_offset_seconds, tz)?,
    })
}

/// Attach an explicit offset to a provider-local naive timestamp
///
/// The response's `utc_offset_seconds` wins when present: it is the
/// offset the provider actually applied to the local timestamps. Only
/// when the provider omits it is the configured timezone imputed, per
/// timestamp; ambiguous local times resolve to the earliest mapping.
fn to_time_point(
    local: NaiveDateTime,
    utc_offset_seconds: Option<i32>,
    tz: Tz,
) -> Result<TimePoint, ForecastError> {
    match utc_offset_seconds {
        Some(secs) => {
            let offset = FixedOffset::east_opt(secs).ok_or_else(|| {
                ForecastError::MalformedResponse(format!(
                    "utc_offset_seconds {} out of range",
                    secs
                ))
            })?;
            offset.from_local_datetime(&local).single().ok_or_else(|| {
                ForecastError::MalformedResponse(format!("unresolvable local time {}", local))
            })
        }
        None => tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| {
                ForecastError::MalformedResponse(format!(
                    "local time {} does not exist in {}",
                    local, tz
                ))
            }),
    }
}

/// Parse a datetime string in the provider's format (e.g., "2025-07-15T05:30")
fn parse_local_datetime(datetime_str: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M").map_err(|_| {
        ForecastError::MalformedResponse(format!("invalid timestamp '{}'", datetime_str))
    })
}

/// Parse a date string in the provider's format (e.g., "2025-07-15")
fn parse_local_date(date_str: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ForecastError::MalformedResponse(format!("invalid date '{}'", date_str)))
}

/// Open-Meteo API response structure
///
/// Sections are optional: an absent section normalizes to an empty
/// series, which callers must handle as a valid state, not an error.
#[derive(Debug, Deserialize)]
struct RawForecastResponse {
    utc_offset_seconds: Option<i32>,
    hourly: Option<RawHourly>,
    daily: Option<RawDaily>,
    current_weather: Option<RawCurrentWeather>,
}

/// Hourly parallel arrays from Open-Meteo
#[derive(Debug, Deserialize)]
struct RawHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    precipitation: Vec<f64>,
    weathercode: Vec<u8>,
    windspeed_10m: Vec<f64>,
}

/// Daily parallel arrays from Open-Meteo
#[derive(Debug, Deserialize)]
struct RawDaily {
    time: Vec<String>,
    weathercode: Vec<u8>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
    windspeed_10m_max: Vec<f64>,
}

/// Current conditions block from Open-Meteo
#[derive(Debug, Deserialize)]
struct RawCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: u8,
    time: String,
}
