use aladin_curator_api::{app::Application, Config};
use log::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> std::process::ExitCode {
    // Load configuration
    dotenv::dotenv().ok();

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default to info level if RUST_LOG is not set
                "aladin_curator_api=info,actix_web=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Loading configuration...");
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot start: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    // Create and run application
    let application = Application::new(&config);
    match application.run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
