//! WMO weather code catalog
//!
//! Maps the small integer weather codes Open-Meteo returns to a display
//! symbol and label. The lookup is total: codes outside the table resolve
//! to a fixed sentinel instead of failing.

/// Display metadata returned for codes not present in the table.
pub const UNKNOWN_CODE: (&str, &str) = ("🌈", "Unknown");

/// Known WMO codes with their display symbol and label.
static WEATHER_CODES: [(u8, &str, &str); 18] = [
    (0, "☀️", "Clear"),
    (1, "🌤️", "Mainly clear"),
    (2, "⛅", "Partly cloudy"),
    (3, "☁️", "Overcast"),
    (45, "🌫️", "Fog"),
    (48, "🌫️", "Depositing rime fog"),
    (51, "🌦️", "Drizzle light"),
    (53, "🌧️", "Drizzle moderate"),
    (55, "🌧️", "Drizzle dense"),
    (61, "🌧️", "Rain light"),
    (63, "🌧️", "Rain moderate"),
    (65, "🌧️", "Rain heavy"),
    (71, "❄️", "Snow light"),
    (73, "❄️", "Snow moderate"),
    (75, "❄️", "Snow heavy"),
    (80, "🌦️", "Rain showers"),
    (81, "🌧️", "Heavy showers"),
    (95, "⛈️", "Thunderstorm"),
];

/// Look up the display symbol and label for a WMO weather code.
///
/// Total over all of `u8`: unknown codes return [`UNKNOWN_CODE`]. No side
/// effects, no failure mode.
pub fn describe_weather_code(code: u8) -> (&'static str, &'static str) {
    WEATHER_CODES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, symbol, label)| (*symbol, *label))
        .unwrap_or(UNKNOWN_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_code_has_exact_metadata() {
        let expected: [(u8, &str, &str); 18] = [
            (0, "☀️", "Clear"),
            (1, "🌤️", "Mainly clear"),
            (2, "⛅", "Partly cloudy"),
            (3, "☁️", "Overcast"),
            (45, "🌫️", "Fog"),
            (48, "🌫️", "Depositing rime fog"),
            (51, "🌦️", "Drizzle light"),
            (53, "🌧️", "Drizzle moderate"),
            (55, "🌧️", "Drizzle dense"),
            (61, "🌧️", "Rain light"),
            (63, "🌧️", "Rain moderate"),
            (65, "🌧️", "Rain heavy"),
            (71, "❄️", "Snow light"),
            (73, "❄️", "Snow moderate"),
            (75, "❄️", "Snow heavy"),
            (80, "🌦️", "Rain showers"),
            (81, "🌧️", "Heavy showers"),
            (95, "⛈️", "Thunderstorm"),
        ];

        for (code, symbol, label) in expected {
            assert_eq!(
                describe_weather_code(code),
                (symbol, label),
                "wrong metadata for code {}",
                code
            );
        }
    }

    #[test]
    fn test_absent_codes_return_sentinel() {
        // 99 is a valid WMO code deliberately absent from the table
        assert_eq!(describe_weather_code(99), UNKNOWN_CODE);
        assert_eq!(describe_weather_code(42), UNKNOWN_CODE);
        assert_eq!(describe_weather_code(255), UNKNOWN_CODE);
    }

    #[test]
    fn test_lookup_is_total_and_nonempty() {
        for code in 0..=u8::MAX {
            let (symbol, label) = describe_weather_code(code);
            assert!(!symbol.is_empty());
            assert!(!label.is_empty());
        }
    }
}
