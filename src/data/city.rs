//! Static city data for the forecast CLI
//!
//! This module contains the built-in list of selectable cities with their
//! geographic coordinates and IANA timezone. Arbitrary coordinates can
//! still be supplied on the command line; this table only covers the
//! named shortcuts.

use chrono_tz::Tz;

/// A selectable forecast location
///
/// Uses `&'static str` for string fields to allow static initialization
/// of the CITIES array.
#[derive(Debug, Clone, Copy)]
pub struct City {
    /// Unique identifier for the city
    pub id: &'static str,
    /// Human-readable name of the city
    pub name: &'static str,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// IANA timezone the city's forecast is rendered in
    pub timezone: Tz,
}

/// Static array of all built-in cities
pub static CITIES: [City; 9] = [
    City {
        id: "mumbai",
        name: "Mumbai",
        latitude: 19.0760,
        longitude: 72.8777,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "delhi",
        name: "Delhi",
        latitude: 28.6139,
        longitude: 77.2090,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "kolkata",
        name: "Kolkata",
        latitude: 22.5726,
        longitude: 88.3639,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "chennai",
        name: "Chennai",
        latitude: 13.0827,
        longitude: 80.2707,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "bengaluru",
        name: "Bengaluru",
        latitude: 12.9716,
        longitude: 77.5946,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "hyderabad",
        name: "Hyderabad",
        latitude: 17.3850,
        longitude: 78.4867,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "pune",
        name: "Pune",
        latitude: 18.5204,
        longitude: 73.8567,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "ahmedabad",
        name: "Ahmedabad",
        latitude: 23.0225,
        longitude: 72.5714,
        timezone: chrono_tz::Asia::Kolkata,
    },
    City {
        id: "jaipur",
        name: "Jaipur",
        latitude: 26.9124,
        longitude: 75.7873,
        timezone: chrono_tz::Asia::Kolkata,
    },
];

/// Get a city by its ID, case-insensitively
///
/// # Arguments
///
/// * `id` - The unique identifier for the city (e.g., "mumbai", "delhi")
///
/// # Returns
///
/// Returns `Some(&City)` if found, `None` otherwise
pub fn get_city_by_id(id: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.id.eq_ignore_ascii_case(id))
}

/// All built-in cities, in display order
pub fn all_cities() -> &'static [City] {
    &CITIES
}
