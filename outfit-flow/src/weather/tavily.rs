use anyhow::{Context as _, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{FallbackTable, WeatherProvider, weather_from_text};
use crate::state::Weather;

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

const WEATHER_DOMAINS: [&str; 6] = [
    "weather.com",
    "accuweather.com",
    "weatherapi.com",
    "timeanddate.com",
    "bbc.com",
    "cnn.com",
];

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: String,
    search_depth: &'a str,
    include_domains: &'a [&'a str],
    include_answer: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    content: Option<String>,
}

impl SearchResponse {
    fn combined_content(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.content.as_deref())
            .fold(String::new(), |mut text, content| {
                text.push_str(content);
                text.push(' ');
                text
            })
    }
}

/// Weather from the Tavily search API, scraped out of result snippets
pub struct TavilyWeather {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    table: FallbackTable,
}

impl TavilyWeather {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            table: FallbackTable::search(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search(&self, api_key: &str, location: &str) -> anyhow::Result<String> {
        let query = format!("current weather in {location} temperature celsius");
        info!(query = %query, "Searching for weather");

        let payload = SearchRequest {
            query,
            search_depth: "advanced",
            include_domains: &WEATHER_DOMAINS,
            include_answer: true,
            max_results: 5,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .context("Tavily request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            bail!("Tavily API error. Status: {status}, Response: {body}");
        }

        let results: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;
        info!(results = results.results.len(), "Received response from Tavily");

        Ok(results.combined_content())
    }
}

#[async_trait]
impl WeatherProvider for TavilyWeather {
    async fn lookup(&self, location: &str) -> Weather {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Tavily API key not set, using fallback data");
            return self.table.lookup(location);
        };

        match self.search(api_key, location).await {
            Ok(text) => weather_from_text(&text, location, &self.table),
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
