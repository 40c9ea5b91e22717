use polling_dashboard::config::Config;
use polling_dashboard::services::poller::HttpFetcher;
use polling_dashboard::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let fetcher = HttpFetcher::new(config.fetch_timeout).expect("Failed to build HTTP client");
    let state = AppState::new(&config, Arc::new(fetcher)).expect("Failed to register metrics");
    tracing::info!(
        max_stored_responses = config.max_stored_responses,
        "Polling service ready"
    );

    let app = polling_dashboard::create_app(state, &config);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{}", address);
    axum::serve(listener, app).await.expect("Server error");
}
