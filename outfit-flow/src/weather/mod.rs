//! Weather lookup for the location the user picked.
//!
//! Every provider is infallible from the caller's point of view: transport
//! failures, bad statuses, missing credentials and unparseable content all
//! degrade to a [`FallbackTable`] entry.

pub mod extract;
pub mod fallback;
#[cfg(feature = "http")]
pub mod openweather;
#[cfg(feature = "http")]
pub mod tavily;

use async_trait::async_trait;
use tracing::warn;

use crate::state::{Weather, WeatherSource};

pub use extract::{extract_condition, extract_temperature, fahrenheit_to_celsius};
pub use fallback::FallbackTable;
#[cfg(feature = "http")]
pub use openweather::OpenWeatherMap;
#[cfg(feature = "http")]
pub use tavily::TavilyWeather;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather for `location`; never fails.
    async fn lookup(&self, location: &str) -> Weather;

    /// Locations the provider has table data for
    fn known_locations(&self) -> Vec<&'static str>;
}

/// Provider that only ever answers from the static table
#[derive(Debug, Clone)]
pub struct StaticWeather {
    table: FallbackTable,
}

impl StaticWeather {
    pub fn new(table: FallbackTable) -> Self {
        Self { table }
    }
}

impl Default for StaticWeather {
    fn default() -> Self {
        Self::new(FallbackTable::search())
    }
}

#[async_trait]
impl WeatherProvider for StaticWeather {
    async fn lookup(&self, location: &str) -> Weather {
        self.table.lookup(location)
    }

    fn known_locations(&self) -> Vec<&'static str> {
        self.table.locations()
    }
}

/// Build a reading from search snippets, filling whatever could not be
/// extracted from the fallback entry.
pub fn weather_from_text(text: &str, location: &str, table: &FallbackTable) -> Weather {
    let temperature = extract_temperature(text);
    let condition = extract_condition(text);

    if temperature.is_none() || condition.is_none() {
        warn!(
            location = %location,
            temperature_found = temperature.is_some(),
            condition_found = condition.is_some(),
            "Couldn't extract complete weather data from search results, using fallback data"
        );
    }

    let fallback = table.lookup(location);
    Weather::live(
        temperature.unwrap_or(fallback.temperature_c),
        condition.unwrap_or(fallback.condition),
        WeatherSource::Search,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_uses_default_for_unknown_city() {
        let provider = StaticWeather::default();
        let weather = provider.lookup("UnknownCity").await;
        assert_eq!(weather.temperature_c, 27.0);
        assert_eq!(weather.condition, "Moderate");
        assert_eq!(weather.source, WeatherSource::Fallback);
    }

    #[test]
    fn full_extraction_ignores_table() {
        let weather = weather_from_text("Sunny skies, 31°C", "Mumbai", &FallbackTable::search());
        assert_eq!(weather.temperature_c, 31.0);
        assert_eq!(weather.condition, "Sunny");
        assert_eq!(weather.source, WeatherSource::Search);
        assert!(weather.fetched_at.is_some());
    }

    #[test]
    fn missing_condition_comes_from_table() {
        let weather = weather_from_text("Reading: 22°C", "Shimla", &FallbackTable::search());
        assert_eq!(weather.temperature_c, 22.0);
        assert_eq!(weather.condition, "Cool and Misty");
    }

    #[test]
    fn missing_temperature_comes_from_table() {
        let weather = weather_from_text("Overcast all day", "Delhi", &FallbackTable::search());
        assert_eq!(weather.temperature_c, 35.0);
        assert_eq!(weather.condition, "Overcast");
    }

    #[test]
    fn nothing_extracted_uses_whole_entry() {
        let weather = weather_from_text("", "Nowhere", &FallbackTable::search());
        assert_eq!(weather.temperature_c, 27.0);
        assert_eq!(weather.condition, "Moderate");
        assert_eq!(weather.source, WeatherSource::Search);
    }
}
