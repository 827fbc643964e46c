use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use watch_logging::watch_debug;

use crate::{ApiError, FailureKind, MutationRequest};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Applies to HTTP requests and to the websocket handshake.
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Pull and management calls against the backend's `/api` resources.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn keywords(&self, base_url: &str) -> Result<Vec<String>, ApiError>;

    async fn chats(&self, base_url: &str) -> Result<Vec<i64>, ApiError>;

    async fn mutate(&self, base_url: &str, request: &MutationRequest) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: EngineSettings,
}

impl ReqwestApi {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_body_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(ApiError::new(
                FailureKind::TooLarge { max_bytes },
                "response too large",
            ));
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge { max_bytes },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        watch_debug!("GET {} returned {} bytes", url, body.len());

        serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl BackendApi for ReqwestApi {
    async fn keywords(&self, base_url: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(&format!("{base_url}/api/keywords")).await
    }

    async fn chats(&self, base_url: &str) -> Result<Vec<i64>, ApiError> {
        self.get_json(&format!("{base_url}/api/chats")).await
    }

    async fn mutate(&self, base_url: &str, request: &MutationRequest) -> Result<(), ApiError> {
        let url = format!("{base_url}/api/{}", request.resource());
        let parsed = reqwest::Url::parse(&url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let body = serde_json::to_vec(&request.body())
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .request(request.method(), parsed)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
