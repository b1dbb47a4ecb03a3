use anyhow::Result;
use basic_chatbot::{web, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "basic_chatbot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Basic Chatbot");

    // Load configuration
    let config = Config::from_env()?;

    // Model is loaded on the first turn, not here
    let app_state = AppState::new(config)?;

    // Start web server
    web::start_server(app_state).await?;

    Ok(())
}
