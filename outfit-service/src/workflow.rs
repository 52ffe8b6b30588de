use std::sync::Arc;

use outfit_flow::{
    FallbackTable, FlowRunner, InMemorySessionStorage, OpenRouterCompletion, StaticWeather,
    TextCompletion, WeatherProvider, Workflow,
    weather::{OpenWeatherMap, TavilyWeather},
};
use tracing::info;

use crate::config::{Settings, WeatherProviderKind, mask_key};

/// Weather provider selected by `WEATHER_PROVIDER`
pub fn create_weather_provider(settings: &Settings) -> Arc<dyn WeatherProvider> {
    match settings.weather_provider {
        WeatherProviderKind::Search => Arc::new(
            TavilyWeather::new(settings.tavily_api_key.clone()).with_base_url(&settings.tavily_base_url),
        ),
        WeatherProviderKind::Api => Arc::new(
            OpenWeatherMap::new(settings.openweather_api_key.clone())
                .with_base_url(&settings.openweather_base_url),
        ),
        WeatherProviderKind::Static => Arc::new(StaticWeather::new(FallbackTable::search())),
    }
}

/// OpenRouter completion; fails when the key is missing.
pub fn create_completion(settings: &Settings) -> anyhow::Result<Arc<dyn TextCompletion>> {
    let api_key = settings.openrouter_api_key()?;
    info!(api_key = %mask_key(api_key), model = %settings.model, "OpenRouter completion configured");
    Ok(Arc::new(OpenRouterCompletion::new(api_key, &settings.model)))
}

pub fn create_flow_runner(
    weather: Arc<dyn WeatherProvider>,
    completion: Arc<dyn TextCompletion>,
) -> outfit_flow::Result<FlowRunner> {
    let workflow = Arc::new(Workflow::standard(weather, completion)?);
    info!(workflow_id = %workflow.id, "Workflow ready");
    Ok(FlowRunner::new(workflow, Arc::new(InMemorySessionStorage::new())))
}
