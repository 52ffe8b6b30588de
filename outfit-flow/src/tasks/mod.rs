pub mod fetch_weather;
pub mod generate_outfit;
pub mod generate_result;

pub use fetch_weather::FetchWeatherTask;
pub use generate_outfit::{APOLOGY, GenerateOutfitTask, outfit_prompt};
pub use generate_result::{GenerateResultTask, compose_result};
