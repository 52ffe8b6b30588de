use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::Result,
    state::{OutfitState, StateUpdate},
    task::{Task, TaskResult},
    weather::WeatherProvider,
};

/// Looks up the weather for the requested location
pub struct FetchWeatherTask {
    provider: Arc<dyn WeatherProvider>,
}

impl FetchWeatherTask {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Task for FetchWeatherTask {
    async fn run(&self, state: &OutfitState) -> Result<TaskResult> {
        let location = state.request.location.as_str();
        info!(task_id = %self.id(), location = %location, "Fetching weather");

        let weather = self.provider.lookup(location).await;
        let entry = format!(
            "Node: get_weather - Location: {location}, Weather: {} (Source: {})",
            weather.summary(),
            weather.source.as_str()
        );
        info!(
            location = %location,
            temperature_c = weather.temperature_c,
            condition = %weather.condition,
            source = weather.source.as_str(),
            "Weather resolved"
        );

        Ok(TaskResult::new_with_status(
            StateUpdate::new().weather(weather).log(entry),
            Some("Weather fetched, generating outfit".to_string()),
        ))
    }
}
