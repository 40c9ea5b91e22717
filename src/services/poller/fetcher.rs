use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Body and status of a successful upstream fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPayload {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> Result<FetchedPayload, FetchError>;
}

/// Fetches polling targets over HTTP with `reqwest`
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("polling-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<FetchedPayload, FetchError> {
        let response = self.client.get(endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(FetchedPayload {
            status: status.as_u16(),
            body: parse_body(text),
        })
    }
}

/// JSON bodies are kept as-is, anything else is stored as a string
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
