//! Skycast CLI - Open-Meteo forecasts and temperature prediction
//!
//! Thin presentation shell over the forecast pipeline: resolves a
//! location, pulls a bundle through the TTL cache, and prints windowed
//! views annotated with weather-code metadata.

use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::{Duration, Utc};
use clap::Parser;

use skycast::cache::{ForecastCache, DEFAULT_TTL_SECS};
use skycast::cli::{resolve_target, Cli, Command};
use skycast::data::{describe_weather_code, ForecastClient};
use skycast::inference::TemperaturePredictor;
use skycast::window::{first_n_days, next_hours};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Forecast {
            city,
            lat,
            lon,
            days,
            hours,
        } => run_forecast(city.as_deref(), lat, lon, days, hours).await,
        Command::Predict {
            scaler,
            model,
            precipitation,
            temp_min,
            wind,
        } => run_predict(&scaler, &model, precipitation, temp_min, wind),
    }
}

/// Fetch a forecast through the cache and print the windowed views
async fn run_forecast(
    city: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
    days: u8,
    hours: usize,
) -> Result<(), Box<dyn Error>> {
    let target = resolve_target(city, lat, lon)?;
    let client = ForecastClient::new(target.timezone)?;
    let cache = ForecastCache::new(client);

    let now = Utc::now().with_timezone(&target.timezone).fixed_offset();
    let bundle = cache
        .get_or_fetch(
            target.latitude,
            target.longitude,
            days,
            Duration::seconds(DEFAULT_TTL_SECS),
            now,
        )
        .await?;

    println!("{}", target.label);
    match &bundle.current {
        Some(current) => {
            let (symbol, label) = describe_weather_code(current.weather_code);
            println!(
                "{:.1}°  {} {} · Wind {:.0} km/h",
                current.temperature, symbol, label, current.wind_speed
            );
        }
        None => println!("No current conditions reported"),
    }

    let upcoming = next_hours(&bundle.hourly, now, hours);
    if upcoming.is_empty() {
        println!("\nNo hourly data");
    } else {
        println!("\nNext {} hours:", upcoming.len());
        for record in upcoming {
            let (symbol, _) = describe_weather_code(record.weather_code);
            println!(
                "  {}  {}  {:>5.1}°  {:>4.1} mm",
                record.time.format("%H:%M"),
                symbol,
                record.temperature,
                record.precipitation
            );
        }
    }

    let week = first_n_days(&bundle.daily, 7);
    if week.is_empty() {
        println!("\nNo daily data");
    } else {
        println!("\n7-day forecast:");
        for record in week {
            let (symbol, label) = describe_weather_code(record.weather_code);
            println!(
                "  {}  {}  {:<20}  {:.0}/{:.0}°",
                record.date.format("%a %d"),
                symbol,
                label,
                record.temp_max,
                record.temp_min
            );
        }
    }

    Ok(())
}

/// Load the two inference artifacts and print a single prediction
fn run_predict(
    scaler: &Path,
    model: &Path,
    precipitation: f64,
    temp_min: f64,
    wind: f64,
) -> Result<(), Box<dyn Error>> {
    let scaler_bytes = fs::read(scaler)?;
    let model_bytes = fs::read(model)?;
    let predictor = TemperaturePredictor::from_artifacts(&scaler_bytes, &model_bytes)?;

    let predicted = predictor.predict(precipitation, temp_min, wind);
    println!("Predicted maximum temperature: {:.2} °C", predicted);

    Ok(())
}
