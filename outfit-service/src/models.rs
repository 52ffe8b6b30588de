use outfit_flow::{OutfitRequest, Session, Step, Weather};
use serde::{Deserialize, Serialize};

/// Body of `POST /outfit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOutfitRequest {
    pub height: String,
    pub gender: String,
    pub location: String,
    pub occasion: String,
    pub mood: String,
    pub max_attempts: Option<u32>,
}

impl CreateOutfitRequest {
    /// Name of the first blank field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("height", &self.height),
            ("gender", &self.gender),
            ("location", &self.location),
            ("occasion", &self.occasion),
            ("mood", &self.mood),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub fn into_request(self) -> OutfitRequest {
        OutfitRequest {
            height: self.height.trim().to_string(),
            gender: self.gender.trim().to_string(),
            location: self.location.trim().to_string(),
            occasion: self.occasion.trim().to_string(),
            mood: self.mood.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
}

/// Snapshot of a session, returned by every outfit endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub status: String,
    pub step: Step,
    pub status_message: Option<String>,
    pub recommendation: String,
    pub rating: u8,
    pub attempts: u32,
    pub max_attempts: u32,
    pub weather: Option<Weather>,
    pub log: Vec<String>,
    pub result_message: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let status = match session.step {
            Step::Done => "completed",
            Step::AwaitRating => "waiting_for_input",
            Step::FetchWeather | Step::Generate => "active",
        };
        let state = session.state;

        Self {
            session_id: session.id,
            status: status.to_string(),
            step: session.step,
            status_message: session.status_message,
            recommendation: state.recommendation,
            rating: state.rating,
            attempts: state.attempts,
            max_attempts: state.max_attempts,
            weather: state.weather,
            log: state.log,
            result_message: state.result_message,
        }
    }
}
