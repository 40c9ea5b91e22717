pub mod config;
pub mod dashboard;
pub mod modules;
pub mod services;

use axum::{middleware, response::Html, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::Config;
use modules::metrics::metrics_routes;
use modules::polling::polling_routes;
use services::metrics::{metrics_middleware, MetricsRegistry, PollingMetricsCollector};
use services::poller::{Fetcher, PollingService};
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;
use services::store::{InMemoryStore, ResponseStore};

pub struct AppState {
    pub poller: PollingService,
    pub store: Arc<dyn ResponseStore>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Arc<Self>, prometheus::Error> {
        Self::with_store(fetcher, Arc::new(InMemoryStore::new(config.max_stored_responses)))
    }

    /// Builds the state around any `ResponseStore` backend
    pub fn with_store(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ResponseStore>,
    ) -> Result<Arc<Self>, prometheus::Error> {
        let metrics = MetricsRegistry::new()?;
        let poller = PollingService::new(
            fetcher,
            store.clone(),
            PollingMetricsCollector::new(metrics.clone()),
        );

        Ok(Arc::new(Self {
            poller,
            store,
            metrics,
        }))
    }

    pub fn polling_metrics(&self) -> PollingMetricsCollector {
        PollingMetricsCollector::new(self.metrics.clone())
    }
}

pub fn create_app(state: Arc<AppState>, config: &Config) -> Router {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_second, config.rate_limit_burst);

    Router::new()
        .route("/", get(index))
        .nest("/api", polling_routes())
        .merge(metrics_routes())
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}
