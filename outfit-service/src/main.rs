use clap::Parser;
use outfit_service::{
    AppState, Cli, Command, build_router, create_completion, create_flow_runner,
    create_weather_provider, logging::init_tracing, terminal::run_chat,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = cli.settings;
    init_tracing(settings.log_format);

    let completion = match create_completion(&settings) {
        Ok(completion) => completion,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let weather = create_weather_provider(&settings);
    info!(provider = ?settings.weather_provider, "Weather provider configured");
    let flow_runner = create_flow_runner(weather.clone(), completion)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Chat => run_chat(flow_runner, weather.known_locations(), settings.max_attempts).await,
        Command::Serve => {
            let app = build_router(AppState {
                flow_runner,
                weather,
                default_max_attempts: settings.max_attempts,
            });
            let listener = TcpListener::bind(settings.bind_address()).await?;
            let addr = listener.local_addr()?;

            info!("Outfit Recommendation Service starting on {}", addr);
            info!("Form available at http://{}/", addr);
            info!("Health check endpoint: http://{}/health", addr);
            info!("Recommendation endpoint: POST http://{}/outfit", addr);

            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
