//! Command-line interface parsing for skycast
//!
//! This module handles parsing of CLI arguments using clap, including
//! resolution of the --city shortcut against the built-in city table.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use chrono_tz::Tz;
use thiserror::Error;

use crate::data::forecast::{MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};
use crate::data::get_city_by_id;

/// Timezone assumed for free-form coordinates given without a city
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified city id is not in the built-in table
    #[error("Unknown city: '{0}'. Valid cities: mumbai, delhi, kolkata, chennai, bengaluru, hyderabad, pune, ahmedabad, jaipur")]
    UnknownCity(String),

    /// Neither a city nor a full coordinate pair was supplied
    #[error("Specify a location with --city <ID> or with --lat and --lon")]
    MissingLocation,
}

/// Skycast - view weather forecasts and predict temperatures
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Open-Meteo weather forecasts and temperature prediction")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a built-in city or a coordinate pair
    Forecast {
        /// City id from the built-in list (e.g. "mumbai")
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude, for locations outside the built-in list
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude, for locations outside the built-in list
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Forecast horizon in days
        #[arg(long, default_value_t = 7,
              value_parser = clap::value_parser!(u8).range(MIN_HORIZON_DAYS as i64..=MAX_HORIZON_DAYS as i64))]
        days: u8,

        /// Number of upcoming hours to list
        #[arg(long, default_value_t = 8)]
        hours: usize,
    },

    /// Predict maximum temperature from precipitation, minimum temperature and wind speed
    Predict {
        /// Path to the serialized feature scaler artifact
        #[arg(long)]
        scaler: PathBuf,

        /// Path to the serialized regression model artifact
        #[arg(long)]
        model: PathBuf,

        /// Precipitation in mm
        precipitation: f64,

        /// Minimum temperature in Celsius
        temp_min: f64,

        /// Wind speed in m/s
        wind: f64,
    },
}

/// A fully resolved forecast location
#[derive(Debug, Clone)]
pub struct ForecastTarget {
    /// Display label for the location
    pub label: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Timezone the forecast is requested and rendered in
    pub timezone: Tz,
}

/// Resolve CLI location arguments into a concrete target
///
/// # Errors
/// * [`CliError::UnknownCity`] when the city id is not in the table
/// * [`CliError::MissingLocation`] when no location was supplied at all
pub fn resolve_target(
    city: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<ForecastTarget, CliError> {
    if let Some(id) = city {
        let city = get_city_by_id(id).ok_or_else(|| CliError::UnknownCity(id.to_string()))?;
        return Ok(ForecastTarget {
            label: city.name.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
            timezone: city.timezone,
        });
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(ForecastTarget {
            label: format!("{:.4}, {:.4}", lat, lon),
            latitude: lat,
            longitude: lon,
            timezone: DEFAULT_TIMEZONE,
        }),
        _ => Err(CliError::MissingLocation),
    }
}
