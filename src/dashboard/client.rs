use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::form::PollingConfiguration;
use super::state::{FetchedItem, StatusUpdate};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}")]
    Server { status: u16, error: Option<String> },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Text for the dashboard message slot: the server's `error` field when it sent one.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                error: Some(error), ..
            } if !error.is_empty() => error.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Body of a successful `POST /api/start`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StartConfirmation {
    pub frequency: u64,
    pub duration: u64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// The `/api` contract the dashboard talks to
#[async_trait]
pub trait PollingApi: Send + Sync {
    async fn status(&self) -> Result<StatusUpdate, ClientError>;

    async fn start(&self, config: &PollingConfiguration) -> Result<StartConfirmation, ClientError>;

    async fn stop(&self) -> Result<ServerMessage, ClientError>;

    async fn data(&self) -> Result<Vec<FetchedItem>, ClientError>;

    async fn clear(&self) -> Result<ServerMessage, ClientError>;
}

/// `reqwest` implementation of [`PollingApi`]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// `base_url` is the API prefix, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PollingApi for DashboardClient {
    async fn status(&self) -> Result<StatusUpdate, ClientError> {
        let response = self.client.get(self.url("status")).send().await?;
        read_json(response).await
    }

    async fn start(&self, config: &PollingConfiguration) -> Result<StartConfirmation, ClientError> {
        let response = self
            .client
            .post(self.url("start"))
            .json(config)
            .send()
            .await?;
        read_json(response).await
    }

    async fn stop(&self) -> Result<ServerMessage, ClientError> {
        let response = self.client.post(self.url("stop")).send().await?;
        read_json(response).await
    }

    async fn data(&self) -> Result<Vec<FetchedItem>, ClientError> {
        let response = self.client.get(self.url("data")).send().await?;
        read_json(response).await
    }

    async fn clear(&self) -> Result<ServerMessage, ClientError> {
        let response = self.client.delete(self.url("clear")).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ClientError::Server {
            status: status.as_u16(),
            error: error_field(&body),
        });
    }

    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn error_field(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
