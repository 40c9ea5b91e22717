use polling_dashboard::dashboard::{
    ActionOutcome, Dashboard, DashboardClient, MessageKind, PollingApi, UiMessage,
};
use std::time::Duration;

use crate::common::{spawn_server, StubFetcher};

// =============================================================================
// INTEGRATION TESTS - DASHBOARD AGAINST A LIVE SERVER
// =============================================================================

fn dashboard_for(address: std::net::SocketAddr) -> Dashboard<DashboardClient> {
    let client = DashboardClient::new(format!("http://{}/api", address)).unwrap();
    Dashboard::new(client)
}

async fn wait_until_idle(dashboard: &Dashboard<DashboardClient>) {
    for _ in 0..100 {
        dashboard.check_status().await.unwrap();
        if !dashboard.snapshot().await.status.is_active {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("Polling job did not finish in time");
}

#[tokio::test]
async fn test_mount_on_empty_server() {
    let (address, _state) = spawn_server(StubFetcher::ok()).await;
    let dashboard = dashboard_for(address);

    let ticker = dashboard.mount().await;
    let state = dashboard.snapshot().await;

    assert_eq!(
        state.message,
        UiMessage::info("No data available. Start polling to collect responses.")
    );
    assert!(!state.status.is_active);
    assert!(state.can_start());
    assert!(!state.can_clear());
    assert!(ticker.is_running());
}

#[tokio::test]
async fn test_start_sends_clamped_values() {
    let (address, state) = spawn_server(StubFetcher::ok()).await;
    let dashboard = dashboard_for(address);
    dashboard
        .edit_form(|form| {
            form.endpoint = "https://lorem-api.com/api/lorem".to_string();
            form.frequency = "0".to_string();
            form.duration = "3".to_string();
        })
        .await;

    assert_eq!(dashboard.start_polling().await, ActionOutcome::Succeeded);

    let server_status = state.poller.status().await;
    assert_eq!(server_status.endpoint.as_deref(), Some("https://lorem-api.com/api/lorem"));
    assert_eq!(server_status.frequency, 1);
    assert_eq!(server_status.duration, 3);

    let local = dashboard.snapshot().await;
    assert_eq!(local.message, UiMessage::success("Started polling every 1s for 3s"));
    assert!(!local.loading);
}

#[tokio::test]
async fn test_start_with_oversized_duration_shows_server_error() {
    let (address, state) = spawn_server(StubFetcher::ok()).await;
    let dashboard = dashboard_for(address);
    dashboard
        .edit_form(|form| form.duration = "99999999999999999999999".to_string())
        .await;

    assert_eq!(dashboard.start_polling().await, ActionOutcome::Failed);

    let local = dashboard.snapshot().await;
    assert_eq!(
        local.message,
        UiMessage::error("duration must be between 1 and 31536000 seconds")
    );
    assert!(!state.poller.is_active().await);
}

#[tokio::test]
async fn test_start_disabled_while_active() {
    let fetcher = StubFetcher::ok();
    let (address, _state) = spawn_server(fetcher).await;
    let dashboard = dashboard_for(address);
    dashboard.edit_form(|form| form.duration = "30".to_string()).await;

    dashboard.start_polling().await;
    dashboard.check_status().await.unwrap();

    assert_eq!(dashboard.start_polling().await, ActionOutcome::Skipped);

    // A second view that has not seen the status yet reaches the server and gets its error
    let other = dashboard_for(address);
    assert_eq!(other.start_polling().await, ActionOutcome::Failed);
    let message = other.snapshot().await.message;
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.text, "Polling is already active");
}

#[tokio::test]
async fn test_stop_then_clear() {
    let (address, _state) = spawn_server(StubFetcher::ok()).await;
    let dashboard = dashboard_for(address);
    dashboard
        .edit_form(|form| {
            form.frequency = "1".to_string();
            form.duration = "60".to_string();
        })
        .await;

    dashboard.start_polling().await;
    dashboard.check_status().await.unwrap();
    assert!(dashboard.snapshot().await.can_stop());

    assert_eq!(dashboard.stop_polling().await, ActionOutcome::Succeeded);
    let state = dashboard.snapshot().await;
    assert_eq!(state.message, UiMessage::success("Polling stopped"));
    assert!(state.item_count() >= 1);

    wait_until_idle(&dashboard).await;
    assert_eq!(dashboard.clear_data().await, ActionOutcome::Succeeded);

    let state = dashboard.snapshot().await;
    assert_eq!(state.item_count(), 0);
    assert!(!state.can_clear());
    assert_eq!(state.message.kind, MessageKind::Success);
    assert!(state.message.text.starts_with("Cleared "));
}

#[tokio::test]
async fn test_refreshed_cards_follow_stored_order() {
    let (address, _state) = spawn_server(StubFetcher::ok()).await;
    let dashboard = dashboard_for(address);
    dashboard
        .edit_form(|form| {
            form.frequency = "1".to_string();
            form.duration = "2".to_string();
        })
        .await;

    dashboard.start_polling().await;
    wait_until_idle(&dashboard).await;
    assert_eq!(dashboard.refresh_data().await, ActionOutcome::Succeeded);

    let state = dashboard.snapshot().await;
    let cards = polling_dashboard::dashboard::view::cards(&state.items);
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "Run");
    assert_eq!(cards[0].id, "1");
    assert_eq!(cards[1].id, "2");
    assert_ne!(cards[0].time, "Invalid Date");
    assert!(state.message.is_empty());
}

#[tokio::test]
async fn test_client_reports_transport_failure() {
    // Nothing listens on this port once the listener is dropped
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = DashboardClient::new(format!("http://{}/api", address)).unwrap();
    let err = client.data().await.unwrap_err();
    assert_eq!(err.message_or("Failed to fetch data"), "Failed to fetch data");

    let dashboard = Dashboard::new(client);
    assert_eq!(dashboard.refresh_data().await, ActionOutcome::Failed);
    let state = dashboard.snapshot().await;
    assert_eq!(state.message, UiMessage::error("Failed to fetch data"));
    assert!(!state.loading);
}
