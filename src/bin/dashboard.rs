use polling_dashboard::dashboard::{view, Dashboard, DashboardClient};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Terminal front end for a running polling service.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_dashboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_url = std::env::var("DASHBOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let client = DashboardClient::new(api_url).expect("Failed to build HTTP client");
    let dashboard = Dashboard::new(client);

    let ticker = dashboard.mount().await;

    if let Ok(endpoint) = std::env::var("POLL_ENDPOINT") {
        dashboard
            .edit_form(|form| {
                form.endpoint = endpoint;
                if let Ok(frequency) = std::env::var("POLL_FREQUENCY") {
                    form.frequency = frequency;
                }
                if let Ok(duration) = std::env::var("POLL_DURATION") {
                    form.duration = duration;
                }
            })
            .await;
        dashboard.start_polling().await;
    }

    let mut last_loop = None;
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let state = dashboard.snapshot().await;
        // New fetches landed since the last frame
        if last_loop.is_some_and(|seen| seen != state.status.current_loop) {
            dashboard.refresh_data().await;
        }
        last_loop = Some(state.status.current_loop);

        let state = dashboard.snapshot().await;
        print!("\x1b[2J\x1b[H{}", view::render_text(&state));
    }

    ticker.unmount();
}
