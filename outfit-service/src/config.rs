use clap::{Args, Parser, Subcommand, ValueEnum};
use outfit_flow::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, weather};

#[derive(Debug, Parser)]
#[command(name = "outfit-service", version, about = "Weather-aware outfit recommendations with a rating loop")]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Interactive session on the terminal
    Chat,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum WeatherProviderKind {
    /// Tavily web search with text extraction
    Search,
    /// OpenWeatherMap current weather
    Api,
    /// Static table only
    Static,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Runtime settings; every flag falls back to an environment variable.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    pub tavily_api_key: Option<String>,

    #[arg(long, env = "TAVILY_BASE_URL", default_value = weather::tavily::DEFAULT_BASE_URL)]
    pub tavily_base_url: String,

    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    #[arg(long, env = "OPENWEATHER_BASE_URL", default_value = weather::openweather::DEFAULT_BASE_URL)]
    pub openweather_base_url: String,

    #[arg(long, env = "WEATHER_PROVIDER", value_enum, default_value_t = WeatherProviderKind::Search)]
    pub weather_provider: WeatherProviderKind,

    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl Settings {
    /// The completion credential, the one setting startup cannot do without.
    pub fn openrouter_api_key(&self) -> anyhow::Result<&str> {
        self.openrouter_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OPENROUTER_API_KEY not set"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Mask a secret for logging, keeping the first and last two characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}*****{tail}")
}
