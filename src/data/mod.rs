//! Core data models for the skycast forecast pipeline
//!
//! This module contains the normalized, time-indexed record types that the
//! rest of the application consumes, along with the fetcher, the static
//! city table, and the weather-code catalog.

pub mod city;
pub mod codes;
pub mod forecast;

pub use city::{all_cities, get_city_by_id, City};
pub use codes::describe_weather_code;
#[allow(unused_imports)]
pub use forecast::{ForecastClient, ForecastError, ForecastProvider};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An absolute instant carrying an explicit UTC offset.
///
/// Every timestamp in the pipeline is offset-aware; naive datetimes never
/// leave the parsing boundary in `forecast`.
pub type TimePoint = DateTime<FixedOffset>;

/// One hour of forecast data
///
/// Records within a bundle are ordered ascending by `time` and unique per
/// `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Start of the forecast hour
    pub time: TimePoint,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// WMO weather code
    pub weather_code: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
}

/// One day of forecast data
///
/// `date` is local midnight of the forecast day. Records are ordered
/// ascending and unique per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Local midnight of the forecast day
    pub date: TimePoint,
    /// WMO weather code
    pub weather_code: u8,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Total precipitation in mm
    pub precipitation_sum: f64,
    /// Maximum wind speed in km/h
    pub wind_speed_max: f64,
}

/// Current conditions at the forecast location
///
/// Only present when the provider returned a current-conditions block;
/// its absence is a valid state distinct from "not yet fetched".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    /// Air temperature in Celsius
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// When the conditions were observed
    pub observed_at: TimePoint,
}

/// A complete forecast for one location and horizon
///
/// Built atomically by a single fetch and replaced wholesale on refresh;
/// the cache hands out shared read-only views, never mutable access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    /// Hourly records, ascending by time
    pub hourly: Vec<HourlyRecord>,
    /// Daily records, ascending by date
    pub daily: Vec<DailyRecord>,
    /// Current conditions, if the provider supplied them
    pub current: Option<CurrentSnapshot>,
}
