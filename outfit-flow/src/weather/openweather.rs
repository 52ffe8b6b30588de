use anyhow::{Context as _, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use super::{FallbackTable, WeatherProvider};
use crate::state::{Weather, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: Option<f64>,
}

/// Map a region name to the city the weather API knows it by.
pub fn city_for_location(location: &str) -> &str {
    match location {
        "Rajasthan" => "Jaipur",
        "Kerala" => "Kochi",
        other => other,
    }
}

/// Turn raw readings into a phrase like `Warm and Humid with Light rain`.
pub fn describe_conditions(temperature_c: f64, humidity: Option<f64>, description: &str) -> String {
    let feel = match temperature_c {
        t if t > 35.0 => "Very Hot",
        t if t > 30.0 => "Hot",
        t if t > 25.0 => "Warm",
        t if t > 20.0 => "Pleasant",
        t if t > 15.0 => "Cool",
        t if t > 10.0 => "Cold",
        _ => "Very Cold",
    };
    let moisture = match humidity {
        Some(h) if h > 80.0 => " and Humid",
        Some(h) if h < 30.0 => " and Dry",
        _ => "",
    };

    let mut chars = description.chars();
    let description: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };

    format!("{feel}{moisture} with {description}")
}

/// Weather from the OpenWeatherMap current-conditions endpoint
pub struct OpenWeatherMap {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    table: FallbackTable,
}

impl OpenWeatherMap {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            table: FallbackTable::direct_api(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, api_key: &str, location: &str) -> anyhow::Result<Weather> {
        let city = city_for_location(location);
        info!(location = %location, city = %city, "Fetching current weather");

        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .context("Weather API request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("Weather API error: {status}");
        }

        let current: CurrentWeather = response
            .json()
            .await
            .context("Failed to parse weather API response")?;

        let Some(entry) = current.weather.first() else {
            bail!("Weather API response has no weather entries");
        };
        let condition = describe_conditions(current.main.temp, current.main.humidity, &entry.description);

        Ok(Weather::live(current.main.temp, condition, WeatherSource::Api))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMap {
    async fn lookup(&self, location: &str) -> Weather {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OpenWeatherMap API key not set, using fallback data");
            return self.table.lookup(location);
        };

        match self.fetch(api_key, location).await {
            Ok(weather) => weather,
            Err(e) => {
                warn!(location = %location, error = %e, "Error fetching weather data, using fallback data");
                self.table.lookup(location)
            }
        }
    }

    fn known_locations(&self) -> Vec<&'static str> {
        self.table.locations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn describes_temperature_humidity_and_sky() {
        assert_eq!(
            describe_conditions(28.0, Some(85.0), "light rain"),
            "Warm and Humid with Light rain"
        );
        assert_eq!(describe_conditions(36.5, Some(20.0), "clear sky"), "Very Hot and Dry with Clear sky");
        assert_eq!(describe_conditions(12.0, None, "mist"), "Cold with Mist");
        assert_eq!(describe_conditions(5.0, Some(50.0), "snow"), "Very Cold with Snow");
    }

    #[test]
    fn regions_map_to_cities() {
        assert_eq!(city_for_location("Rajasthan"), "Jaipur");
        assert_eq!(city_for_location("Kerala"), "Kochi");
        assert_eq!(city_for_location("Delhi"), "Delhi");
        assert_eq!(city_for_location("Lisbon"), "Lisbon");
    }

    #[tokio::test]
    async fn reads_current_conditions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Jaipur"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [{"main": "Clear", "description": "clear sky"}],
                "main": {"temp": 38.2, "humidity": 18}
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherMap::new(Some("key".to_string())).with_base_url(server.uri());
        let weather = provider.lookup("Rajasthan").await;

        assert_eq!(weather.temperature_c, 38.2);
        assert_eq!(weather.condition, "Very Hot and Dry with Clear sky");
        assert_eq!(weather.source, WeatherSource::Api);
    }

    #[tokio::test]
    async fn failures_use_direct_api_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = OpenWeatherMap::new(Some("key".to_string())).with_base_url(server.uri());
        // Pune exists only in the search table, so the default entry is used here
        let weather = provider.lookup("Pune").await;
        assert_eq!(weather.condition, "Moderate");
        assert_eq!(weather.source, WeatherSource::Fallback);

        let provider = OpenWeatherMap::new(None);
        assert_eq!(provider.lookup("Kerala").await.condition, "Tropical and Humid");
    }

    #[tokio::test]
    async fn empty_weather_list_uses_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [],
                "main": {"temp": 31.0, "humidity": 70}
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherMap::new(Some("key".to_string())).with_base_url(server.uri());
        let weather = provider.lookup("Chennai").await;

        assert_eq!(weather.temperature_c, 32.0);
        assert_eq!(weather.condition, "Hot and Humid");
        assert_eq!(weather.source, WeatherSource::Fallback);
    }
}
