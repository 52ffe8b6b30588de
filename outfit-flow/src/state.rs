use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};

/// Number of recommendations a session may generate unless configured otherwise
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// The five attributes collected from the user before the flow starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutfitRequest {
    pub height: String,
    pub gender: String,
    pub location: String,
    pub occasion: String,
    pub mood: String,
}

/// Where a weather reading came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Parsed, at least partially, from search result snippets
    Search,
    /// Read from a structured weather API
    Api,
    /// Static table entry
    Fallback,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::Search => "search",
            WeatherSource::Api => "api",
            WeatherSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    pub temperature_c: f64,
    pub condition: String,
    pub source: WeatherSource,
    /// Set for live readings only
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Weather {
    pub fn fallback(temperature_c: f64, condition: impl Into<String>) -> Self {
        Self {
            temperature_c,
            condition: condition.into(),
            source: WeatherSource::Fallback,
            fetched_at: None,
        }
    }

    pub fn live(temperature_c: f64, condition: impl Into<String>, source: WeatherSource) -> Self {
        Self {
            temperature_c,
            condition: condition.into(),
            source,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Human readable form used in prompts and log lines, e.g. `28°C, Humid and Cloudy`
    pub fn summary(&self) -> String {
        format!("{}°C, {}", self.temperature_c, self.condition)
    }
}

/// The record that flows through every step of a single recommendation session.
///
/// Nodes never mutate it directly: they read a snapshot and hand back a
/// [`StateUpdate`], which [`OutfitState::apply`] checks against the record's
/// invariants before merging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitState {
    pub request: OutfitRequest,
    pub weather: Option<Weather>,
    pub recommendation: String,
    /// 1..=10 once the user has rated, 0 while unrated
    pub rating: u8,
    pub attempts: u32,
    pub max_attempts: u32,
    pub log: Vec<String>,
    pub result_message: Option<String>,
}

impl OutfitState {
    pub fn new(request: OutfitRequest, max_attempts: u32) -> Self {
        Self {
            request,
            weather: None,
            recommendation: String::new(),
            rating: 0,
            attempts: 0,
            max_attempts,
            log: vec!["Starting new recommendation process...".to_string()],
            result_message: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.result_message.is_some()
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }

    /// Record the user's rating for the current recommendation.
    pub fn set_rating(&mut self, rating: i64) -> Result<()> {
        if self.is_finalized() {
            return Err(FlowError::Finalized);
        }
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (1..=10).contains(r))
            .ok_or(FlowError::InvalidRating(rating))?;

        self.rating = rating;
        self.log.push(format!("User rated previous outfit: {rating}"));
        Ok(())
    }

    /// Merge a node's update into the record.
    ///
    /// Either the whole update is applied or nothing is.
    pub fn apply(&mut self, update: StateUpdate) -> Result<()> {
        if self.is_finalized() {
            return Err(FlowError::Finalized);
        }
        if let Some(requested) = update.attempts {
            if requested < self.attempts {
                return Err(FlowError::AttemptsDecreased {
                    current: self.attempts,
                    requested,
                });
            }
        }
        if let Some(rating) = update.rating {
            if rating > 10 {
                return Err(FlowError::InvalidRating(rating.into()));
            }
        }

        if let Some(weather) = update.weather {
            self.weather = Some(weather);
        }
        if let Some(recommendation) = update.recommendation {
            self.recommendation = recommendation;
        }
        if let Some(attempts) = update.attempts {
            self.attempts = attempts;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        self.log.extend(update.log);
        if let Some(message) = update.result_message {
            self.result_message = Some(message);
        }
        Ok(())
    }
}

/// Partial update produced by a workflow node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub weather: Option<Weather>,
    pub recommendation: Option<String>,
    pub attempts: Option<u32>,
    pub rating: Option<u8>,
    pub result_message: Option<String>,
    /// Entries to append to the audit log, in order
    pub log: Vec<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn result_message(mut self, message: impl Into<String>) -> Self {
        self.result_message = Some(message.into());
        self
    }

    pub fn log(mut self, entry: impl Into<String>) -> Self {
        self.log.push(entry.into());
        self
    }

    pub fn logs(mut self, entries: impl IntoIterator<Item = String>) -> Self {
        self.log.extend(entries);
        self
    }
}

#[cfg(test)]
pub(crate) fn sample_request(location: &str) -> OutfitRequest {
    OutfitRequest {
        height: "5'10\"".to_string(),
        gender: "Male".to_string(),
        location: location.to_string(),
        occasion: "Party".to_string(),
        mood: "Confident".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_unrated_with_one_log_line() {
        let state = OutfitState::new(sample_request("Mumbai"), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(state.attempts, 0);
        assert_eq!(state.rating, 0);
        assert_eq!(state.log.len(), 1);
        assert!(!state.is_finalized());
    }

    #[test]
    fn apply_appends_log_in_order() {
        let mut state = OutfitState::new(sample_request("Mumbai"), 5);
        state
            .apply(StateUpdate::new().attempts(1).log("first").log("second"))
            .unwrap();
        assert_eq!(state.attempts, 1);
        assert_eq!(&state.log[1..], ["first", "second"]);
    }

    #[test]
    fn attempts_cannot_decrease() {
        let mut state = OutfitState::new(sample_request("Mumbai"), 5);
        state.apply(StateUpdate::new().attempts(2)).unwrap();

        let err = state
            .apply(StateUpdate::new().attempts(1).log("ignored"))
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::AttemptsDecreased {
                current: 2,
                requested: 1
            }
        );
        assert_eq!(state.attempts, 2);
        assert!(!state.log.iter().any(|l| l == "ignored"));
    }

    #[test]
    fn record_is_read_only_after_result() {
        let mut state = OutfitState::new(sample_request("Mumbai"), 5);
        state
            .apply(StateUpdate::new().result_message("done"))
            .unwrap();

        assert_eq!(
            state.apply(StateUpdate::new().log("late")),
            Err(FlowError::Finalized)
        );
        assert_eq!(state.set_rating(8), Err(FlowError::Finalized));
        assert_eq!(state.result_message.as_deref(), Some("done"));
    }

    #[test]
    fn rating_must_be_in_range() {
        let mut state = OutfitState::new(sample_request("Mumbai"), 5);
        assert_eq!(state.set_rating(0), Err(FlowError::InvalidRating(0)));
        assert_eq!(state.set_rating(11), Err(FlowError::InvalidRating(11)));
        assert_eq!(state.set_rating(-3), Err(FlowError::InvalidRating(-3)));

        state.set_rating(7).unwrap();
        assert_eq!(state.rating, 7);
        assert_eq!(state.log.last().unwrap(), "User rated previous outfit: 7");
    }

    #[test]
    fn weather_summary_formats_temperature_and_condition() {
        assert_eq!(
            Weather::fallback(28.0, "Humid and Cloudy").summary(),
            "28°C, Humid and Cloudy"
        );
        assert_eq!(Weather::fallback(25.5, "Clear").summary(), "25.5°C, Clear");
    }
}
