use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ProjectionError;
use crate::wire::{
    ChatRequestBody, ChatResponseBody, GapCheckRequestBody, GapCheckResponseBody,
    LifetimeRequestBody, SimulateRequestBody, SimulateResponseBody,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote side of the projection contract.
///
/// Implementations make exactly one attempt per call. Transport failures and
/// non-2xx statuses map to `RemoteUnavailable`, unparseable bodies to
/// `MalformedResponse`.
#[async_trait]
pub trait ProjectionBackend: Send + Sync {
    async fn simulate(
        &self,
        body: &SimulateRequestBody,
    ) -> Result<SimulateResponseBody, ProjectionError>;

    /// Returns the raw body; the `success` flag decides how it is parsed.
    async fn lifetime(
        &self,
        body: &LifetimeRequestBody,
    ) -> Result<serde_json::Value, ProjectionError>;

    async fn gap_check(
        &self,
        body: &GapCheckRequestBody,
    ) -> Result<GapCheckResponseBody, ProjectionError>;

    async fn chat(&self, body: &ChatRequestBody) -> Result<ChatResponseBody, ProjectionError>;
}

/// JSON-over-HTTP backend rooted at a base URL such as `http://127.0.0.1:8000`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProjectionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProjectionError::RemoteUnavailable(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProjectionError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProjectionError::RemoteUnavailable(format!(
                "{url} returned {status}"
            )));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ProjectionError::MalformedResponse(format!("{url} returned invalid JSON: {e}"))
        })
    }
}

#[async_trait]
impl ProjectionBackend for HttpBackend {
    async fn simulate(
        &self,
        body: &SimulateRequestBody,
    ) -> Result<SimulateResponseBody, ProjectionError> {
        self.post("/api/simulate", body).await
    }

    async fn lifetime(
        &self,
        body: &LifetimeRequestBody,
    ) -> Result<serde_json::Value, ProjectionError> {
        self.post("/api/lifetime", body).await
    }

    async fn gap_check(
        &self,
        body: &GapCheckRequestBody,
    ) -> Result<GapCheckResponseBody, ProjectionError> {
        self.post("/api/gap-check", body).await
    }

    async fn chat(&self, body: &ChatRequestBody) -> Result<ChatResponseBody, ProjectionError> {
        self.post("/api/chat", body).await
    }
}
