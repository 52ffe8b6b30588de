pub mod config;
pub mod logging;
pub mod models;
pub mod service;
pub mod terminal;
pub mod workflow;

pub use config::{Cli, Command, Settings};
pub use service::{AppState, build_router};
pub use workflow::{create_completion, create_flow_runner, create_weather_provider};
pub use models::*;
